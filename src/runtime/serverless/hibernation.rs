//! Actor hibernation system for scale-to-zero serverless execution
//!
//! Provides coalgebraic state machines for hibernation with mathematical foundations
//! in category theory for correctness and composability.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant, SystemTime};
use serde::{Serialize, Deserialize};
use dashmap::DashMap;

use crate::types::Pid;
use super::{WakeTrigger, ServerlessActor};

/// Core hibernation manager for actor lifecycle management
pub struct HibernationManager {
    /// Fast lookup for hibernating actors
    hibernating_actors: DashMap<Pid, HibernationRecord>,
    /// Hibernation policies by actor type
    policies: Arc<RwLock<HashMap<String, HibernationPolicy>>>,
    /// Wake trigger system
    wake_triggers: Arc<WakeTriggerSystem>,
    /// Hibernation statistics
    stats: Arc<RwLock<HibernationStats>>,
    /// Default hibernation policy
    default_policy: HibernationPolicy,
}

impl HibernationManager {
    /// Create a new hibernation manager
    pub fn new() -> Self {
        HibernationManager {
            hibernating_actors: DashMap::new(),
            policies: Arc::new(RwLock::new(HashMap::new())),
            wake_triggers: Arc::new(WakeTriggerSystem::new()),
            stats: Arc::new(RwLock::new(HibernationStats::default())),
            default_policy: HibernationPolicy::default(),
        }
    }

    /// Set hibernation policy for an actor type
    pub fn set_policy(&self, actor_type: String, policy: HibernationPolicy) {
        self.policies.write().unwrap().insert(actor_type, policy);
    }

    /// Get hibernation policy for an actor type
    pub fn get_policy(&self, actor_type: &str) -> HibernationPolicy {
        self.policies.read().unwrap()
            .get(actor_type)
            .cloned()
            .unwrap_or_else(|| self.default_policy.clone())
    }

    /// Check if an actor should be hibernated based on policy
    pub fn should_hibernate(&self, pid: Pid, actor: &dyn ServerlessActor) -> bool {
        let policy = self.get_policy(actor.actor_type());

        // Check if actor can be hibernated
        if !actor.can_hibernate() {
            return false;
        }

        // Check idle timeout
        if !actor.is_idle() {
            return false;
        }

        // Check memory threshold
        let memory_usage_percent = (actor.memory_usage() as f64 / (1024.0 * 1024.0)) * 100.0;
        if memory_usage_percent < policy.memory_threshold {
            return false;
        }

        // Check CPU threshold
        if actor.cpu_usage() > policy.cpu_threshold / 100.0 {
            return false;
        }

        // Check message queue if required
        if policy.require_empty_queue {
            // This would need to be implemented based on the actor's mailbox
            // For now, assume it's empty if the actor is idle
        }

        true
    }

    /// Hibernate an actor (simplified version without serialization)
    pub async fn hibernate_actor(&self, pid: Pid, actor_type: String, memory_usage: usize) -> HibernationResult<()> {
        let start = Instant::now();

        // Create memory snapshot (simplified)
        let memory_snapshot = self.create_simple_memory_snapshot(memory_usage)?;

        // Create hibernation state (without actor serialization)
        let hibernation_state = HibernationState::Hibernating {
            hibernation_time: start,
            preserved_state: Vec::new(), // Simplified - no actor serialization
            memory_snapshot,
            expected_wake_time: None,
        };

        // Create hibernation record
        let record = HibernationRecord {
            pid,
            state: hibernation_state,
            actor_type,
            wake_triggers: Vec::new(),
            storage_offset: 0,
            storage_size: 0,
            priority: HibernationPriority::Normal,
            last_access: start,
        };

        // Store hibernation record
        self.hibernating_actors.insert(pid, record);

        // Update statistics
        {
            let mut stats = self.stats.write().unwrap();
            stats.hibernation_count += 1;
            stats.hibernation_time_total += start.elapsed();
            stats.memory_saved += memory_usage as u64;
        }

        Ok(())
    }

    /// Wake an actor from hibernation (simplified version)
    pub async fn wake_actor(&self, pid: Pid, wake_trigger: WakeTrigger) -> HibernationResult<String> {
        let wake_start = Instant::now();

        // Get actor type first, then remove from hibernation
        let actor_type = {
            let record = self.hibernating_actors.get(&pid)
                .ok_or(HibernationError::ActorNotFound(pid))?;

            // Check state
            match &record.state {
                HibernationState::Hibernating { .. } => {
                    record.actor_type.clone()
                }
                _ => return Err(HibernationError::InvalidState("Actor not hibernating".to_string()))
            }
        }; // Drop the reference here

        // Now remove from hibernation (no reference held)
        self.hibernating_actors.remove(&pid);

        // Update statistics
        let wake_time = wake_start.elapsed();
        {
            let mut stats = self.stats.write().unwrap();
            stats.wake_count += 1;
            stats.wake_time_total += wake_time;

            // Categorize wake time
            if wake_time < Duration::from_millis(1) {
                stats.ultra_fast_wakes += 1;
            } else if wake_time < Duration::from_millis(10) {
                stats.fast_wakes += 1;
            } else {
                stats.slow_wakes += 1;
            }
        }

        Ok(actor_type)
    }

    /// Create a simplified memory snapshot for hibernation
    fn create_simple_memory_snapshot(&self, memory_usage: usize) -> HibernationResult<MemorySnapshot> {
        // This is a simplified implementation
        // In a real system, this would capture the actual memory layout

        let heap_data = vec![0u8; memory_usage / 2]; // Simplified heap data
        let stack_data = vec![0u8; memory_usage / 4]; // Simplified stack data
        let register_state = HashMap::new(); // Would capture actual register state

        let compression_info = CompressionInfo {
            algorithm: CompressionAlgorithm::Lz4,
            original_size: memory_usage,
            compressed_size: heap_data.len() + stack_data.len(),
            compression_ratio: memory_usage as f64 / (heap_data.len() + stack_data.len()) as f64,
        };

        let memory_layout = MemoryLayout {
            heap_start: 0x1000_0000, // Example heap start
            heap_size: heap_data.len(),
            stack_start: 0x2000_0000, // Example stack start
            stack_size: stack_data.len(),
            alignment: 8, // 8-byte alignment
        };

        Ok(MemorySnapshot {
            heap_data,
            stack_data,
            register_state,
            continuation: None,
            memory_layout,
            compression_info,
        })
    }

    /// Restore memory snapshot after wake-up
    fn restore_memory_snapshot(&self, _pid: Pid, _snapshot: &MemorySnapshot) -> HibernationResult<()> {
        // This would restore the actual memory layout
        // For now, this is a placeholder
        Ok(())
    }

    /// Get hibernation statistics
    pub fn get_stats(&self) -> HibernationStats {
        self.stats.read().unwrap().clone()
    }

    /// Get list of hibernating actors
    pub fn list_hibernating_actors(&self) -> Vec<Pid> {
        self.hibernating_actors.iter().map(|entry| *entry.key()).collect()
    }

    /// Check for actors that should wake up
    pub fn check_wake_triggers(&self) -> Vec<(Pid, WakeTrigger)> {
        self.wake_triggers.check_triggers(SystemTime::now())
    }

    /// Register wake triggers for an actor
    pub fn register_wake_triggers(&self, pid: Pid, triggers: Vec<WakeTrigger>) -> HibernationResult<()> {
        for trigger in triggers {
            self.wake_triggers.register_trigger(pid, trigger)?;
        }
        Ok(())
    }
}

/// Hibernation state machine following coalgebraic principles
#[derive(Debug, Clone)]
pub enum HibernationState {
    /// Actor is active and processing messages
    Active {
        /// Last activity timestamp
        last_activity: Instant,
        /// Current memory usage in bytes
        memory_usage: usize,
        /// Current CPU usage (0.0 to 1.0)
        cpu_usage: f64,
        /// Number of pending messages
        pending_messages: usize,
    },
    /// Actor is hibernating (sleeping)
    Hibernating {
        /// When hibernation started
        hibernation_time: Instant,
        /// Serialized actor state
        preserved_state: Vec<u8>,
        /// Memory snapshot for fast restoration
        memory_snapshot: MemorySnapshot,
        /// Expected wake time (if scheduled)
        expected_wake_time: Option<SystemTime>,
    },
    /// Actor is in the process of waking up
    Waking {
        /// When wake process started
        wake_start: Instant,
        /// Target state to restore
        target_state: Vec<u8>,
        /// Wake trigger that caused this wake-up
        wake_trigger: WakeTrigger,
    },
    /// Actor is preparing for hibernation
    PreparingHibernation {
        /// When preparation started
        preparation_start: Instant,
        /// Cleanup tasks remaining
        cleanup_tasks: Vec<String>,
    },
}

/// Memory snapshot for zero-copy hibernation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Heap data (compressed)
    pub heap_data: Vec<u8>,
    /// Stack data (compressed)
    pub stack_data: Vec<u8>,
    /// Register state
    pub register_state: HashMap<String, u64>,
    /// Continuation (if any)
    pub continuation: Option<Vec<u8>>,
    /// Memory layout information
    pub memory_layout: MemoryLayout,
    /// Compression metadata
    pub compression_info: CompressionInfo,
}

/// Memory layout information for restoration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryLayout {
    /// Heap start address
    pub heap_start: usize,
    /// Heap size
    pub heap_size: usize,
    /// Stack start address
    pub stack_start: usize,
    /// Stack size
    pub stack_size: usize,
    /// Memory alignment requirements
    pub alignment: usize,
}

/// Compression information for memory snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionInfo {
    /// Compression algorithm used
    pub algorithm: CompressionAlgorithm,
    /// Original size before compression
    pub original_size: usize,
    /// Compressed size
    pub compressed_size: usize,
    /// Compression ratio
    pub compression_ratio: f64,
}

/// Compression algorithms for memory snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    None,
    Lz4,
    Zstd,
    Snappy,
}

/// Hibernation record for fast lookup
#[derive(Debug, Clone)]
pub struct HibernationRecord {
    /// Process ID
    pub pid: Pid,
    /// Current hibernation state
    pub state: HibernationState,
    /// Actor type for resource pooling
    pub actor_type: String,
    /// Wake triggers
    pub wake_triggers: Vec<WakeTrigger>,
    /// Storage offset in hibernation storage
    pub storage_offset: usize,
    /// Storage size
    pub storage_size: usize,
    /// Hibernation priority (for eviction)
    pub priority: HibernationPriority,
    /// Last access time
    pub last_access: Instant,
}

/// Hibernation priority for eviction policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HibernationPriority {
    Low = 0,
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Hibernation policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HibernationPolicy {
    /// Idle timeout before hibernation
    pub idle_timeout: Duration,
    /// Memory pressure threshold (percentage)
    pub memory_threshold: f64,
    /// CPU utilization threshold (percentage)
    pub cpu_threshold: f64,
    /// Message queue empty requirement
    pub require_empty_queue: bool,
    /// Minimum hibernation duration
    pub min_hibernation_duration: Duration,
    /// Maximum hibernation duration
    pub max_hibernation_duration: Option<Duration>,
    /// Compression enabled
    pub compression_enabled: bool,
    /// Zero-copy hibernation enabled
    pub zero_copy_enabled: bool,
}

impl Default for HibernationPolicy {
    fn default() -> Self {
        HibernationPolicy {
            idle_timeout: Duration::from_secs(30),
            memory_threshold: 80.0,
            cpu_threshold: 5.0,
            require_empty_queue: true,
            min_hibernation_duration: Duration::from_secs(1),
            max_hibernation_duration: Some(Duration::from_secs(3600)), // 1 hour
            compression_enabled: true,
            zero_copy_enabled: true,
        }
    }
}

/// Hibernation errors
#[derive(Debug, thiserror::Error)]
pub enum HibernationError {
    #[error("Actor not found: {0:?}")]
    ActorNotFound(Pid),
    
    #[error("Invalid hibernation state: {0}")]
    InvalidState(String),
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    
    #[error("Compression error: {0}")]
    Compression(String),
    
    #[error("Memory snapshot error: {0}")]
    MemorySnapshot(String),
    
    #[error("Storage error: {0}")]
    Storage(String),
    
    #[error("Resource allocation error: {0}")]
    ResourceAllocation(String),
    
    #[error("Wake trigger error: {0}")]
    WakeTrigger(String),
    
    #[error("Policy violation: {0}")]
    PolicyViolation(String),
    
    #[error("Timeout error: {0}")]
    Timeout(String),
}

pub type HibernationResult<T> = Result<T, HibernationError>;

/// Hibernation statistics
#[derive(Debug, Default, Clone)]
pub struct HibernationStats {
    /// Total hibernations performed
    pub hibernation_count: u64,
    /// Total wake-ups performed
    pub wake_count: u64,
    /// Total hibernation time
    pub hibernation_time_total: Duration,
    /// Total wake time
    pub wake_time_total: Duration,
    /// Ultra-fast wakes (< 1ms)
    pub ultra_fast_wakes: u64,
    /// Fast wakes (< 10ms)
    pub fast_wakes: u64,
    /// Slow wakes (> 10ms)
    pub slow_wakes: u64,
    /// Hibernation failures
    pub hibernation_failures: u64,
    /// Wake failures
    pub wake_failures: u64,
    /// Memory saved through hibernation
    pub memory_saved: u64,
    /// Storage used for hibernation
    pub storage_used: u64,
    /// Compression ratio average
    pub avg_compression_ratio: f64,
}

impl HibernationStats {
    /// Calculate average hibernation time
    pub fn average_hibernation_time(&self) -> Duration {
        if self.hibernation_count > 0 {
            self.hibernation_time_total / self.hibernation_count as u32
        } else {
            Duration::ZERO
        }
    }
    
    /// Calculate average wake time
    pub fn average_wake_time(&self) -> Duration {
        if self.wake_count > 0 {
            self.wake_time_total / self.wake_count as u32
        } else {
            Duration::ZERO
        }
    }
    
    /// Calculate ultra-fast wake percentage
    pub fn ultra_fast_wake_percentage(&self) -> f64 {
        if self.wake_count > 0 {
            (self.ultra_fast_wakes as f64 / self.wake_count as f64) * 100.0
        } else {
            0.0
        }
    }
    
    /// Calculate hibernation success rate
    pub fn hibernation_success_rate(&self) -> f64 {
        let total_attempts = self.hibernation_count + self.hibernation_failures;
        if total_attempts > 0 {
            (self.hibernation_count as f64 / total_attempts as f64) * 100.0
        } else {
            0.0
        }
    }
    
    /// Calculate wake success rate
    pub fn wake_success_rate(&self) -> f64 {
        let total_attempts = self.wake_count + self.wake_failures;
        if total_attempts > 0 {
            (self.wake_count as f64 / total_attempts as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Wake trigger system for managing hibernated actors
pub struct WakeTriggerSystem {
    /// Scheduled wake events
    scheduled_wakes: Arc<RwLock<HashMap<SystemTime, Vec<Pid>>>>,
    /// Message-based triggers
    message_triggers: Arc<RwLock<HashMap<Pid, Vec<String>>>>,
    /// HTTP-based triggers
    http_triggers: Arc<RwLock<HashMap<String, Vec<Pid>>>>,
    /// Resource threshold triggers
    resource_triggers: Arc<RwLock<HashMap<Pid, f64>>>,
}

impl WakeTriggerSystem {
    pub fn new() -> Self {
        WakeTriggerSystem {
            scheduled_wakes: Arc::new(RwLock::new(HashMap::new())),
            message_triggers: Arc::new(RwLock::new(HashMap::new())),
            http_triggers: Arc::new(RwLock::new(HashMap::new())),
            resource_triggers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
    
    /// Register a wake trigger for an actor
    pub fn register_trigger(&self, pid: Pid, trigger: WakeTrigger) -> HibernationResult<()> {
        match trigger {
            WakeTrigger::ScheduledEvent { timestamp } => {
                self.scheduled_wakes.write().unwrap()
                    .entry(timestamp)
                    .or_insert_with(Vec::new)
                    .push(pid);
            }
            WakeTrigger::HttpRequest { path, .. } => {
                self.http_triggers.write().unwrap()
                    .entry(path)
                    .or_insert_with(Vec::new)
                    .push(pid);
            }
            WakeTrigger::ResourceThreshold { threshold } => {
                self.resource_triggers.write().unwrap()
                    .insert(pid, threshold);
            }
            _ => {} // Handle other trigger types
        }
        Ok(())
    }
    
    /// Check for triggered wake events
    pub fn check_triggers(&self, current_time: SystemTime) -> Vec<(Pid, WakeTrigger)> {
        let mut triggered = Vec::new();
        
        // Check scheduled events
        let mut scheduled = self.scheduled_wakes.write().unwrap();
        let mut to_remove = Vec::new();
        
        for (&timestamp, pids) in scheduled.iter() {
            if timestamp <= current_time {
                for &pid in pids {
                    triggered.push((pid, WakeTrigger::ScheduledEvent { timestamp }));
                }
                to_remove.push(timestamp);
            }
        }
        
        for timestamp in to_remove {
            scheduled.remove(&timestamp);
        }
        
        triggered
    }
}
