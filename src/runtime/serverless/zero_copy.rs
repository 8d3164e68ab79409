//! Zero-copy hibernation system for ultra-fast actor state preservation
//! 
//! Provides memory-mapped storage and copy-on-write optimization for
//! sub-millisecond hibernation and restoration operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use std::ptr;
use serde::{Serialize, Deserialize};

use crate::types::Pid;
use super::hibernation::{HibernationError, HibernationResult};

/// Zero-copy hibernation manager
pub struct ZeroCopyHibernation {
    /// Memory-mapped hibernation storage
    storage: Arc<Mutex<MmapStorage>>,
    /// Virtual memory manager
    vm_manager: Arc<Mutex<VirtualMemoryManager>>,
    /// Copy-on-write manager
    cow_manager: Arc<Mutex<CowManager>>,
    /// Zero-copy statistics
    stats: Arc<RwLock<ZeroCopyStats>>,
    /// Configuration
    config: ZeroCopyConfig,
}

/// Memory-mapped storage for hibernation data
pub struct MmapStorage {
    /// Memory-mapped region
    mmap_region: MemoryMappedRegion,
    /// Allocation tracker
    allocations: HashMap<Pid, StorageAllocation>,
    /// Free space tracker
    free_blocks: Vec<FreeBlock>,
    /// Total size
    total_size: usize,
    /// Used size
    used_size: usize,
}

/// Memory-mapped region wrapper
#[derive(Debug)]
pub struct MemoryMappedRegion {
    /// Base pointer
    base_ptr: *mut u8,
    /// Region size
    size: usize,
    /// File descriptor (if file-backed)
    fd: Option<i32>,
    /// Protection flags
    protection: ProtectionFlags,
}

/// Memory protection flags
#[derive(Debug, Clone, Copy)]
pub struct ProtectionFlags {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

/// Storage allocation record
#[derive(Debug, Clone)]
pub struct StorageAllocation {
    /// Process ID
    pub pid: Pid,
    /// Offset in storage
    pub offset: usize,
    /// Size of allocation
    pub size: usize,
    /// Allocation timestamp
    pub allocated_at: Instant,
    /// Last access timestamp
    pub last_access: Instant,
    /// Compression info
    pub compression: Option<CompressionInfo>,
}

/// Free block in storage
#[derive(Debug, Clone)]
pub struct FreeBlock {
    /// Offset of free block
    pub offset: usize,
    /// Size of free block
    pub size: usize,
}

/// Virtual memory manager for process memory regions
pub struct VirtualMemoryManager {
    /// Process memory regions
    process_regions: HashMap<Pid, MemoryRegion>,
    /// Page size
    page_size: usize,
    /// Virtual address space tracker
    address_space: AddressSpaceTracker,
}

/// Memory region for a process
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    /// Base address
    pub base_addr: usize,
    /// Region size
    pub size: usize,
    /// Protection flags
    pub protection: ProtectionFlags,
    /// Backing storage (if any)
    pub backing_storage: Option<BackingStorage>,
}

/// Backing storage information
#[derive(Debug, Clone)]
pub struct BackingStorage {
    /// Storage type
    pub storage_type: StorageType,
    /// Offset in backing storage
    pub offset: usize,
    /// File descriptor (for file-backed storage)
    pub fd: Option<i32>,
}

/// Storage types
#[derive(Debug, Clone)]
pub enum StorageType {
    Anonymous,
    FileBacked { path: String },
    SharedMemory { name: String },
}

/// Address space tracker
#[derive(Debug)]
pub struct AddressSpaceTracker {
    /// Allocated ranges
    allocated_ranges: Vec<AddressRange>,
    /// Free ranges
    free_ranges: Vec<AddressRange>,
    /// Base address for allocations
    base_address: usize,
    /// Maximum address
    max_address: usize,
}

/// Address range
#[derive(Debug, Clone)]
pub struct AddressRange {
    /// Start address
    pub start: usize,
    /// End address
    pub end: usize,
}

/// Copy-on-write manager
pub struct CowManager {
    /// COW mappings
    cow_mappings: HashMap<Pid, CowMapping>,
    /// Page fault handler
    page_fault_handler: Arc<Mutex<PageFaultHandler>>,
}

/// Copy-on-write mapping
#[derive(Debug, Clone)]
pub struct CowMapping {
    /// Source memory region
    pub source_region: MemoryRegion,
    /// Target storage region
    pub target_region: StorageAllocation,
    /// COW pages
    pub cow_pages: Vec<CowPage>,
    /// Mapping timestamp
    pub created_at: Instant,
}

/// Copy-on-write page
#[derive(Debug, Clone)]
pub struct CowPage {
    /// Page address
    pub address: usize,
    /// Page size
    pub size: usize,
    /// Is page dirty (modified)
    pub dirty: bool,
    /// Original data location
    pub original_location: usize,
    /// Copy location (if copied)
    pub copy_location: Option<usize>,
}

/// Page fault handler for COW
pub struct PageFaultHandler {
    /// Fault statistics
    fault_stats: PageFaultStats,
}

/// Page fault statistics
#[derive(Debug, Default, Clone)]
pub struct PageFaultStats {
    /// Total page faults
    pub total_faults: u64,
    /// COW faults
    pub cow_faults: u64,
    /// Average fault handling time
    pub avg_fault_time: Duration,
}

/// Compression information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionInfo {
    /// Algorithm used
    pub algorithm: CompressionAlgorithm,
    /// Original size
    pub original_size: usize,
    /// Compressed size
    pub compressed_size: usize,
    /// Compression ratio
    pub ratio: f64,
}

/// Compression algorithms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    None,
    Lz4,
    Zstd,
    Snappy,
    Brotli,
}

/// Zero-copy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZeroCopyConfig {
    /// Enable zero-copy hibernation
    pub enabled: bool,
    /// Storage size (bytes)
    pub storage_size: usize,
    /// Enable compression
    pub compression_enabled: bool,
    /// Compression algorithm
    pub compression_algorithm: CompressionAlgorithm,
    /// Enable copy-on-write
    pub cow_enabled: bool,
    /// Page size for COW
    pub page_size: usize,
    /// Maximum COW pages per process
    pub max_cow_pages: usize,
}

impl Default for ZeroCopyConfig {
    fn default() -> Self {
        ZeroCopyConfig {
            enabled: true,
            storage_size: 1024 * 1024 * 1024, // 1GB
            compression_enabled: true,
            compression_algorithm: CompressionAlgorithm::Lz4,
            cow_enabled: true,
            page_size: 4096, // 4KB pages
            max_cow_pages: 1024,
        }
    }
}

/// Zero-copy statistics
#[derive(Debug, Default, Clone)]
pub struct ZeroCopyStats {
    /// Total hibernations
    pub hibernations: u64,
    /// Total restorations
    pub restorations: u64,
    /// Zero-copy hibernations
    pub zero_copy_hibernations: u64,
    /// Zero-copy restorations
    pub zero_copy_restorations: u64,
    /// Total hibernation time
    pub hibernation_time_total: Duration,
    /// Total restoration time
    pub restoration_time_total: Duration,
    /// Bytes saved through zero-copy
    pub bytes_saved: u64,
    /// COW page faults
    pub cow_faults: u64,
    /// Compression ratio average
    pub avg_compression_ratio: f64,
}

impl ZeroCopyHibernation {
    /// Create a new zero-copy hibernation manager
    pub fn new(config: ZeroCopyConfig) -> HibernationResult<Self> {
        let storage = MmapStorage::new(config.storage_size)?;
        let vm_manager = VirtualMemoryManager::new(config.page_size)?;
        let cow_manager = CowManager::new()?;
        
        Ok(ZeroCopyHibernation {
            storage: Arc::new(Mutex::new(storage)),
            vm_manager: Arc::new(Mutex::new(vm_manager)),
            cow_manager: Arc::new(Mutex::new(cow_manager)),
            stats: Arc::new(RwLock::new(ZeroCopyStats::default())),
            config,
        })
    }
    
    /// Hibernate actor using zero-copy techniques
    pub fn hibernate_zero_copy(&self, pid: Pid, memory_size: usize) -> HibernationResult<()> {
        if !self.config.enabled {
            return Err(HibernationError::PolicyViolation("Zero-copy disabled".to_string()));
        }
        
        let start = Instant::now();
        
        // Get process memory region
        let memory_region = {
            let vm_manager = self.vm_manager.lock().unwrap();
            vm_manager.get_process_memory(pid)?
        };
        
        // Allocate storage region
        let storage_allocation = {
            let mut storage = self.storage.lock().unwrap();
            storage.allocate_region(pid, memory_size)?
        };
        
        if self.config.cow_enabled {
            // Create copy-on-write mapping
            let mut cow_manager = self.cow_manager.lock().unwrap();
            cow_manager.create_cow_mapping(pid, memory_region.clone(), storage_allocation)?;

            // Mark pages as copy-on-write
            self.mark_pages_cow(&memory_region)?;
        } else {
            // Direct memory copy
            self.copy_memory_direct(&memory_region, &storage_allocation)?;
        }
        
        // Update statistics
        {
            let mut stats = self.stats.write().unwrap();
            stats.hibernations += 1;
            stats.zero_copy_hibernations += 1;
            stats.hibernation_time_total += start.elapsed();
        }
        
        Ok(())
    }
    
    /// Restore actor using zero-copy techniques
    pub fn restore_zero_copy(&self, pid: Pid) -> HibernationResult<MemoryRegion> {
        let start = Instant::now();
        
        // Get storage allocation
        let storage_allocation = {
            let storage = self.storage.lock().unwrap();
            storage.get_allocation(pid)?
        };
        
        // Allocate new memory region
        let memory_region = {
            let mut vm_manager = self.vm_manager.lock().unwrap();
            vm_manager.allocate_process_memory(pid, storage_allocation.size)?
        };
        
        if self.config.cow_enabled {
            // Map storage directly to process memory
            self.map_storage_to_memory(&storage_allocation, &memory_region)?;
        } else {
            // Direct memory copy
            self.copy_storage_to_memory(&storage_allocation, &memory_region)?;
        }
        
        // Update statistics
        {
            let mut stats = self.stats.write().unwrap();
            stats.restorations += 1;
            stats.zero_copy_restorations += 1;
            stats.restoration_time_total += start.elapsed();
        }
        
        Ok(memory_region)
    }
    
    /// Mark memory pages as copy-on-write
    fn mark_pages_cow(&self, memory_region: &MemoryRegion) -> HibernationResult<()> {
        // This would use mprotect to mark pages as read-only
        // When a write occurs, a page fault will trigger COW
        // For now, this is a placeholder implementation for cross-platform compatibility
        #[cfg(unix)]
        unsafe {
            let result = libc::mprotect(
                memory_region.base_addr as *mut libc::c_void,
                memory_region.size,
                libc::PROT_READ
            );

            if result != 0 {
                return Err(HibernationError::MemorySnapshot(
                    "Failed to mark pages as COW".to_string()
                ));
            }
        }

        #[cfg(not(unix))]
        {
            // Placeholder for Windows/other platforms
            let _ = memory_region;
        }

        Ok(())
    }
    
    /// Copy memory directly (fallback when COW is disabled)
    fn copy_memory_direct(&self, memory_region: &MemoryRegion, storage: &StorageAllocation) -> HibernationResult<()> {
        let storage_guard = self.storage.lock().unwrap();
        let storage_ptr = storage_guard.get_ptr(storage.offset)?;
        
        unsafe {
            ptr::copy_nonoverlapping(
                memory_region.base_addr as *const u8,
                storage_ptr,
                memory_region.size
            );
        }
        
        Ok(())
    }
    
    /// Map storage directly to memory (zero-copy restoration)
    fn map_storage_to_memory(&self, storage: &StorageAllocation, memory_region: &MemoryRegion) -> HibernationResult<()> {
        // This would use mmap to map storage directly to process memory
        // For now, this is a placeholder implementation
        Ok(())
    }
    
    /// Copy storage to memory (fallback)
    fn copy_storage_to_memory(&self, storage: &StorageAllocation, memory_region: &MemoryRegion) -> HibernationResult<()> {
        let storage_guard = self.storage.lock().unwrap();
        let storage_ptr = storage_guard.get_ptr(storage.offset)?;
        
        unsafe {
            ptr::copy_nonoverlapping(
                storage_ptr,
                memory_region.base_addr as *mut u8,
                memory_region.size
            );
        }
        
        Ok(())
    }
    
    /// Get zero-copy statistics
    pub fn get_stats(&self) -> ZeroCopyStats {
        self.stats.read().unwrap().clone()
    }

    /// Get zero-copy configuration
    pub fn get_config(&self) -> &ZeroCopyConfig {
        &self.config
    }
}

impl MmapStorage {
    /// Create a new memory-mapped storage
    pub fn new(size: usize) -> HibernationResult<Self> {
        let mmap_region = MemoryMappedRegion::new(size, None)?;

        Ok(MmapStorage {
            mmap_region,
            allocations: HashMap::new(),
            free_blocks: vec![FreeBlock { offset: 0, size }],
            total_size: size,
            used_size: 0,
        })
    }

    /// Allocate a region in storage
    pub fn allocate_region(&mut self, pid: Pid, size: usize) -> HibernationResult<StorageAllocation> {
        // Find a suitable free block
        let block_index = self.free_blocks.iter()
            .position(|block| block.size >= size)
            .ok_or_else(|| HibernationError::Storage("No suitable free block found".to_string()))?;

        let block = self.free_blocks.remove(block_index);
        let allocation = StorageAllocation {
            pid,
            offset: block.offset,
            size,
            allocated_at: Instant::now(),
            last_access: Instant::now(),
            compression: None,
        };

        // If block is larger than needed, create a new free block
        if block.size > size {
            let remaining_block = FreeBlock {
                offset: block.offset + size,
                size: block.size - size,
            };
            self.free_blocks.push(remaining_block);
        }

        self.allocations.insert(pid, allocation.clone());
        self.used_size += size;

        Ok(allocation)
    }

    /// Get allocation for a process
    pub fn get_allocation(&self, pid: Pid) -> HibernationResult<StorageAllocation> {
        self.allocations.get(&pid)
            .cloned()
            .ok_or(HibernationError::ActorNotFound(pid))
    }

    /// Get pointer to storage location
    pub fn get_ptr(&self, offset: usize) -> HibernationResult<*mut u8> {
        if offset >= self.total_size {
            return Err(HibernationError::Storage("Offset out of bounds".to_string()));
        }

        unsafe {
            Ok(self.mmap_region.base_ptr.add(offset))
        }
    }

    /// Deallocate a region
    pub fn deallocate_region(&mut self, pid: Pid) -> HibernationResult<()> {
        let allocation = self.allocations.remove(&pid)
            .ok_or(HibernationError::ActorNotFound(pid))?;

        // Add back to free blocks
        let free_block = FreeBlock {
            offset: allocation.offset,
            size: allocation.size,
        };
        self.free_blocks.push(free_block);
        self.used_size -= allocation.size;

        // Coalesce adjacent free blocks
        self.coalesce_free_blocks();

        Ok(())
    }

    /// Coalesce adjacent free blocks
    fn coalesce_free_blocks(&mut self) {
        self.free_blocks.sort_by_key(|block| block.offset);

        let mut i = 0;
        while i < self.free_blocks.len() - 1 {
            let current = &self.free_blocks[i];
            let next = &self.free_blocks[i + 1];

            if current.offset + current.size == next.offset {
                // Merge blocks
                let merged_block = FreeBlock {
                    offset: current.offset,
                    size: current.size + next.size,
                };
                self.free_blocks[i] = merged_block;
                self.free_blocks.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}

impl MemoryMappedRegion {
    /// Create a new memory-mapped region
    pub fn new(size: usize, fd: Option<i32>) -> HibernationResult<Self> {
        let protection = ProtectionFlags {
            read: true,
            write: true,
            execute: false,
        };

        // Cross-platform memory allocation
        #[cfg(unix)]
        let base_ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                fd.unwrap_or(-1),
                0
            ) as *mut u8
        };

        #[cfg(not(unix))]
        let base_ptr = {
            // Use regular heap allocation for non-Unix platforms
            let layout = std::alloc::Layout::from_size_align(size, 8)
                .map_err(|_| HibernationError::Storage("Invalid layout".to_string()))?;
            unsafe { std::alloc::alloc(layout) }
        };

        #[cfg(unix)]
        if base_ptr == libc::MAP_FAILED as *mut u8 {
            return Err(HibernationError::Storage("mmap failed".to_string()));
        }

        #[cfg(not(unix))]
        if base_ptr.is_null() {
            return Err(HibernationError::Storage("Memory allocation failed".to_string()));
        }

        Ok(MemoryMappedRegion {
            base_ptr,
            size,
            fd,
            protection,
        })
    }
}

impl Drop for MemoryMappedRegion {
    fn drop(&mut self) {
        unsafe {
            #[cfg(unix)]
            {
                libc::munmap(self.base_ptr as *mut libc::c_void, self.size);
            }

            #[cfg(not(unix))]
            {
                // Use regular deallocation for non-Unix platforms
                let layout = std::alloc::Layout::from_size_align_unchecked(self.size, 8);
                std::alloc::dealloc(self.base_ptr, layout);
            }
        }
    }
}

impl VirtualMemoryManager {
    /// Create a new virtual memory manager
    pub fn new(page_size: usize) -> HibernationResult<Self> {
        let address_space = AddressSpaceTracker::new(0x1000_0000, 0x7fff_ffff_ffff);

        Ok(VirtualMemoryManager {
            process_regions: HashMap::new(),
            page_size,
            address_space,
        })
    }

    /// Get process memory region
    pub fn get_process_memory(&self, pid: Pid) -> HibernationResult<MemoryRegion> {
        self.process_regions.get(&pid)
            .cloned()
            .ok_or(HibernationError::ActorNotFound(pid))
    }

    /// Allocate process memory
    pub fn allocate_process_memory(&mut self, pid: Pid, size: usize) -> HibernationResult<MemoryRegion> {
        let base_addr = self.address_space.allocate_range(size)?;

        let region = MemoryRegion {
            base_addr,
            size,
            protection: ProtectionFlags {
                read: true,
                write: true,
                execute: false,
            },
            backing_storage: None,
        };

        self.process_regions.insert(pid, region.clone());

        Ok(region)
    }
}

impl AddressSpaceTracker {
    /// Create a new address space tracker
    pub fn new(base_address: usize, max_address: usize) -> Self {
        let free_ranges = vec![AddressRange {
            start: base_address,
            end: max_address,
        }];

        AddressSpaceTracker {
            allocated_ranges: Vec::new(),
            free_ranges,
            base_address,
            max_address,
        }
    }

    /// Allocate an address range
    pub fn allocate_range(&mut self, size: usize) -> HibernationResult<usize> {
        // Find a suitable free range
        let range_index = self.free_ranges.iter()
            .position(|range| range.end - range.start >= size)
            .ok_or_else(|| HibernationError::Storage("No suitable address range found".to_string()))?;

        let range = self.free_ranges.remove(range_index);
        let allocated_start = range.start;
        let allocated_end = range.start + size;

        // Add to allocated ranges
        self.allocated_ranges.push(AddressRange {
            start: allocated_start,
            end: allocated_end,
        });

        // If range is larger than needed, create a new free range
        if range.end > allocated_end {
            let remaining_range = AddressRange {
                start: allocated_end,
                end: range.end,
            };
            self.free_ranges.push(remaining_range);
        }

        Ok(allocated_start)
    }
}

impl CowManager {
    /// Create a new copy-on-write manager
    pub fn new() -> HibernationResult<Self> {
        Ok(CowManager {
            cow_mappings: HashMap::new(),
            page_fault_handler: Arc::new(Mutex::new(PageFaultHandler::new())),
        })
    }

    /// Create a copy-on-write mapping
    pub fn create_cow_mapping(
        &mut self,
        pid: Pid,
        source_region: MemoryRegion,
        target_region: StorageAllocation,
    ) -> HibernationResult<()> {
        let cow_mapping = CowMapping {
            source_region: source_region.clone(),
            target_region,
            cow_pages: Vec::new(),
            created_at: Instant::now(),
        };

        self.cow_mappings.insert(pid, cow_mapping);

        Ok(())
    }
}

impl PageFaultHandler {
    /// Create a new page fault handler
    pub fn new() -> Self {
        PageFaultHandler {
            fault_stats: PageFaultStats::default(),
        }
    }
}
