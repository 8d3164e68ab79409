//! Cold start optimization for ultra-low latency serverless execution
//! 
//! Provides sub-millisecond cold start times through pre-warmed resource pools,
//! bytecode caching, and JIT compilation optimization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use serde::{Serialize, Deserialize};

use crate::types::Pid;
use crate::bytecode::program::BytecodeProgram;
use crate::jit::JitFunction;

/// Cold start optimization system
pub struct ColdStartOptimizer {
    /// Pre-warmed memory pools by actor type
    memory_pools: Arc<Mutex<HashMap<String, MemoryPool>>>,
    /// Pre-compiled bytecode cache
    bytecode_cache: Arc<Mutex<HashMap<String, CompiledBytecode>>>,
    /// JIT compilation cache
    jit_cache: Arc<Mutex<HashMap<String, JitFunction>>>,
    /// Cold start statistics
    stats: Arc<Mutex<ColdStartStats>>,
    /// Optimization configuration
    config: ColdStartConfig,
}

/// Memory pool for pre-allocated actor resources
#[derive(Debug, Clone)]
pub struct MemoryPool {
    /// Pre-allocated heap segments
    heap_segments: Vec<HeapSegment>,
    /// Pre-allocated stack segments
    stack_segments: Vec<StackSegment>,
    /// Available slot indices
    available_slots: std::collections::VecDeque<usize>,
    /// Pool capacity
    capacity: usize,
    /// Current usage
    used_slots: usize,
}

/// Heap memory segment
#[derive(Debug, Clone)]
pub struct HeapSegment {
    /// Memory data
    data: Vec<u8>,
    /// Segment size
    size: usize,
    /// Allocation offset
    offset: usize,
    /// Is segment in use
    in_use: bool,
}

/// Stack memory segment
#[derive(Debug, Clone)]
pub struct StackSegment {
    /// Stack data
    data: Vec<u8>,
    /// Stack size
    size: usize,
    /// Stack pointer
    stack_pointer: usize,
    /// Is segment in use
    in_use: bool,
}

/// Pre-compiled bytecode with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledBytecode {
    /// Actor type this bytecode is for
    pub actor_type: String,
    /// Compiled bytecode program
    pub program: BytecodeProgram,
    /// Hot path information
    pub hot_paths: Vec<HotPath>,
    /// Compilation timestamp
    pub compiled_at: std::time::SystemTime,
    /// Optimization level used
    pub optimization_level: u8,
}

/// Hot path information for JIT optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotPath {
    /// Function name
    pub name: String,
    /// Execution frequency
    pub frequency: u64,
    /// Average execution time
    pub avg_execution_time: Duration,
    /// Optimization priority
    pub priority: OptimizationPriority,
}

/// Optimization priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptimizationPriority {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

/// Cold start configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColdStartConfig {
    /// Enable pre-warming
    pub pre_warming_enabled: bool,
    /// Pre-warm pool sizes by actor type
    pub pre_warm_sizes: HashMap<String, usize>,
    /// Enable bytecode caching
    pub bytecode_cache_enabled: bool,
    /// Enable JIT caching
    pub jit_cache_enabled: bool,
    /// Maximum cache size (bytes)
    pub max_cache_size: usize,
    /// Cache eviction policy
    pub cache_eviction_policy: CacheEvictionPolicy,
    /// Hot path detection threshold
    pub hot_path_threshold: u64,
}

/// Cache eviction policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CacheEvictionPolicy {
    LRU,
    LFU,
    FIFO,
    Random,
}

impl Default for ColdStartConfig {
    fn default() -> Self {
        let mut pre_warm_sizes = HashMap::new();
        pre_warm_sizes.insert("web-handler".to_string(), 100);
        pre_warm_sizes.insert("api-processor".to_string(), 50);
        pre_warm_sizes.insert("data-processor".to_string(), 25);
        
        ColdStartConfig {
            pre_warming_enabled: true,
            pre_warm_sizes,
            bytecode_cache_enabled: true,
            jit_cache_enabled: true,
            max_cache_size: 512 * 1024 * 1024, // 512MB
            cache_eviction_policy: CacheEvictionPolicy::LRU,
            hot_path_threshold: 100,
        }
    }
}

/// Cold start statistics
#[derive(Debug, Default, Clone)]
pub struct ColdStartStats {
    /// Total cold starts
    pub cold_starts: u64,
    /// Total warm starts
    pub warm_starts: u64,
    /// Total cold start time
    pub cold_start_time_total: Duration,
    /// Total warm start time
    pub warm_start_time_total: Duration,
    /// Ultra-fast cold starts (< 1ms)
    pub ultra_fast_cold_starts: u64,
    /// Fast cold starts (< 10ms)
    pub fast_cold_starts: u64,
    /// Slow cold starts (> 10ms)
    pub slow_cold_starts: u64,
    /// Cache hits
    pub cache_hits: u64,
    /// Cache misses
    pub cache_misses: u64,
    /// Memory pool hits
    pub pool_hits: u64,
    /// Memory pool misses
    pub pool_misses: u64,
}

/// Cold start errors
#[derive(Debug, thiserror::Error)]
pub enum ColdStartError {
    #[error("Pool not found for actor type: {0}")]
    PoolNotFound(String),
    
    #[error("Pool exhausted for actor type: {0}")]
    PoolExhausted(String),
    
    #[error("Bytecode not found for actor type: {0}")]
    BytecodeNotFound(String),
    
    #[error("JIT compilation not found for actor type: {0}")]
    JitNotFound(String),
    
    #[error("Compilation error: {0}")]
    Compilation(String),
    
    #[error("Memory allocation error: {0}")]
    MemoryAllocation(String),
    
    #[error("Cache error: {0}")]
    Cache(String),
    
    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type ColdStartResult<T> = Result<T, ColdStartError>;

impl ColdStartOptimizer {
    /// Create a new cold start optimizer
    pub fn new(config: ColdStartConfig) -> ColdStartResult<Self> {
        Ok(ColdStartOptimizer {
            memory_pools: Arc::new(Mutex::new(HashMap::new())),
            bytecode_cache: Arc::new(Mutex::new(HashMap::new())),
            jit_cache: Arc::new(Mutex::new(HashMap::new())),
            stats: Arc::new(Mutex::new(ColdStartStats::default())),
            config,
        })
    }
    
    /// Pre-warm resources for an actor type
    pub fn pre_warm(&self, actor_type: &str) -> ColdStartResult<()> {
        if !self.config.pre_warming_enabled {
            return Ok(());
        }
        
        let pool_size = self.config.pre_warm_sizes.get(actor_type)
            .copied()
            .unwrap_or(10);
        
        // Pre-warm memory pool
        let mut pools = self.memory_pools.lock().unwrap();
        if !pools.contains_key(actor_type) {
            let pool = MemoryPool::pre_warmed(pool_size)?;
            pools.insert(actor_type.to_string(), pool);
        }
        
        // Pre-compile bytecode
        if self.config.bytecode_cache_enabled {
            let mut bytecode_cache = self.bytecode_cache.lock().unwrap();
            if !bytecode_cache.contains_key(actor_type) {
                let bytecode = self.compile_actor_bytecode(actor_type)?;
                bytecode_cache.insert(actor_type.to_string(), bytecode);
            }
        }
        
        // Pre-JIT compile hot paths
        if self.config.jit_cache_enabled {
            let mut jit_cache = self.jit_cache.lock().unwrap();
            if !jit_cache.contains_key(actor_type) {
                let compiled = self.jit_compile_actor(actor_type)?;
                jit_cache.insert(actor_type.to_string(), compiled);
            }
        }
        
        Ok(())
    }
    
    /// Perform instant wake with pre-warmed resources
    pub fn instant_wake(&self, pid: Pid, actor_type: &str) -> ColdStartResult<Duration> {
        let start = Instant::now();
        
        // Get pre-warmed memory pool
        let memory_pool = {
            let mut pools = self.memory_pools.lock().unwrap();
            pools.get_mut(actor_type)
                .ok_or_else(|| ColdStartError::PoolNotFound(actor_type.to_string()))?
                .allocate_actor_memory()?
        };
        
        // Get pre-compiled bytecode
        let bytecode = {
            let bytecode_cache = self.bytecode_cache.lock().unwrap();
            bytecode_cache.get(actor_type)
                .ok_or_else(|| ColdStartError::BytecodeNotFound(actor_type.to_string()))?
                .clone()
        };
        
        // Get pre-compiled JIT function
        let jit_function = {
            let jit_cache = self.jit_cache.lock().unwrap();
            jit_cache.get(actor_type)
                .ok_or_else(|| ColdStartError::JitNotFound(actor_type.to_string()))?
                .clone()
        };
        
        // Activate actor with pre-compiled resources
        self.activate_actor(pid, memory_pool, bytecode, jit_function)?;
        
        let wake_time = start.elapsed();
        
        // Update statistics
        {
            let mut stats = self.stats.lock().unwrap();
            stats.warm_starts += 1;
            stats.warm_start_time_total += wake_time;
            stats.cache_hits += 3; // Memory pool, bytecode, JIT
            
            if wake_time < Duration::from_millis(1) {
                stats.ultra_fast_cold_starts += 1;
            } else if wake_time < Duration::from_millis(10) {
                stats.fast_cold_starts += 1;
            } else {
                stats.slow_cold_starts += 1;
            }
        }
        
        Ok(wake_time)
    }
    
    /// Compile actor bytecode
    fn compile_actor_bytecode(&self, actor_type: &str) -> ColdStartResult<CompiledBytecode> {
        // This would compile the actor's source code to bytecode
        // For now, return a placeholder
        Ok(CompiledBytecode {
            actor_type: actor_type.to_string(),
            program: BytecodeProgram::new(format!("{}_bytecode", actor_type)),
            hot_paths: Vec::new(),
            compiled_at: std::time::SystemTime::now(),
            optimization_level: 2,
        })
    }
    
    /// JIT compile actor hot paths
    fn jit_compile_actor(&self, actor_type: &str) -> ColdStartResult<JitFunction> {
        // This would JIT compile the actor's hot paths
        // For now, return a placeholder
        use crate::types::EffectGrade;
        use crate::jit::JitMetadata;
        Ok(JitFunction::new(
            std::ptr::null(),
            0,
            EffectGrade::Pure,
            JitMetadata {
                bytecode_size: 0,
                native_size: 0,
                compile_time: std::time::Duration::ZERO,
                opt_level: 0,
                hot_spots: Vec::new(),
            }
        ))
    }
    
    /// Activate actor with pre-compiled resources
    fn activate_actor(
        &self,
        _pid: Pid,
        _memory_pool: (HeapSegment, StackSegment),
        _bytecode: CompiledBytecode,
        _jit_function: JitFunction,
    ) -> ColdStartResult<()> {
        // This would activate the actor with the provided resources
        Ok(())
    }
    
    /// Get cold start statistics
    pub fn get_stats(&self) -> ColdStartStats {
        self.stats.lock().unwrap().clone()
    }
}

impl MemoryPool {
    /// Create a pre-warmed memory pool
    pub fn pre_warmed(capacity: usize) -> ColdStartResult<Self> {
        let mut heap_segments = Vec::with_capacity(capacity);
        let mut stack_segments = Vec::with_capacity(capacity);

        // Pre-allocate heap segments
        for _ in 0..capacity {
            heap_segments.push(HeapSegment::new(64 * 1024)?); // 64KB each
        }

        // Pre-allocate stack segments
        for _ in 0..capacity {
            stack_segments.push(StackSegment::new(8 * 1024)?); // 8KB each
        }

        let available_slots = (0..capacity).collect();

        Ok(MemoryPool {
            heap_segments,
            stack_segments,
            available_slots,
            capacity,
            used_slots: 0,
        })
    }

    /// Allocate memory for an actor
    pub fn allocate_actor_memory(&mut self) -> ColdStartResult<(HeapSegment, StackSegment)> {
        let slot = self.available_slots.pop_front()
            .ok_or(ColdStartError::PoolExhausted("Memory pool exhausted".to_string()))?;

        let heap = self.heap_segments[slot].clone();
        let stack = self.stack_segments[slot].clone();

        self.used_slots += 1;

        Ok((heap, stack))
    }

    /// Deallocate actor memory
    pub fn deallocate_actor_memory(&mut self, slot: usize) -> ColdStartResult<()> {
        if slot >= self.capacity {
            return Err(ColdStartError::MemoryAllocation("Invalid slot index".to_string()));
        }

        self.available_slots.push_back(slot);
        self.heap_segments[slot].reset();
        self.stack_segments[slot].reset();
        self.used_slots -= 1;

        Ok(())
    }

    /// Get pool utilization percentage
    pub fn utilization(&self) -> f64 {
        (self.used_slots as f64 / self.capacity as f64) * 100.0
    }

    /// Get available slots
    pub fn available_slots(&self) -> usize {
        self.available_slots.len()
    }
}

impl HeapSegment {
    /// Create a new heap segment
    pub fn new(size: usize) -> ColdStartResult<Self> {
        Ok(HeapSegment {
            data: vec![0u8; size],
            size,
            offset: 0,
            in_use: false,
        })
    }

    /// Reset the heap segment
    pub fn reset(&mut self) {
        self.offset = 0;
        self.in_use = false;
        // Zero out the memory for security
        self.data.fill(0);
    }

    /// Allocate memory within the segment
    pub fn allocate(&mut self, size: usize) -> Option<&mut [u8]> {
        if self.offset + size <= self.size {
            let start = self.offset;
            self.offset += size;
            Some(&mut self.data[start..start + size])
        } else {
            None
        }
    }
}

impl StackSegment {
    /// Create a new stack segment
    pub fn new(size: usize) -> ColdStartResult<Self> {
        Ok(StackSegment {
            data: vec![0u8; size],
            size,
            stack_pointer: size, // Stack grows downward
            in_use: false,
        })
    }

    /// Reset the stack segment
    pub fn reset(&mut self) {
        self.stack_pointer = self.size;
        self.in_use = false;
        // Zero out the memory for security
        self.data.fill(0);
    }

    /// Push data onto the stack
    pub fn push(&mut self, data: &[u8]) -> Option<usize> {
        if self.stack_pointer >= data.len() {
            self.stack_pointer -= data.len();
            self.data[self.stack_pointer..self.stack_pointer + data.len()].copy_from_slice(data);
            Some(self.stack_pointer)
        } else {
            None
        }
    }

    /// Pop data from the stack
    pub fn pop(&mut self, size: usize) -> Option<&[u8]> {
        if self.stack_pointer + size <= self.size {
            let data = &self.data[self.stack_pointer..self.stack_pointer + size];
            self.stack_pointer += size;
            Some(data)
        } else {
            None
        }
    }
}

impl ColdStartStats {
    /// Calculate average cold start time
    pub fn average_cold_start_time(&self) -> Duration {
        if self.cold_starts > 0 {
            self.cold_start_time_total / self.cold_starts as u32
        } else {
            Duration::ZERO
        }
    }

    /// Calculate average warm start time
    pub fn average_warm_start_time(&self) -> Duration {
        if self.warm_starts > 0 {
            self.warm_start_time_total / self.warm_starts as u32
        } else {
            Duration::ZERO
        }
    }

    /// Calculate cache hit rate
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total > 0 {
            (self.cache_hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate pool hit rate
    pub fn pool_hit_rate(&self) -> f64 {
        let total = self.pool_hits + self.pool_misses;
        if total > 0 {
            (self.pool_hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate ultra-fast cold start percentage
    pub fn ultra_fast_percentage(&self) -> f64 {
        if self.cold_starts > 0 {
            (self.ultra_fast_cold_starts as f64 / self.cold_starts as f64) * 100.0
        } else {
            0.0
        }
    }
}
