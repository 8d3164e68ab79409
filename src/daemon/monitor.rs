//! Actor monitoring and data collection
//!
//! Provides comprehensive monitoring capabilities for actors including
//! performance metrics, resource usage, and lifecycle tracking.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant, SystemTime};
use serde::{Serialize, Deserialize};

use crate::types::{Pid, RuntimeStats};
use crate::error::{ReamResult, ReamError};
use super::{ActorInfo, ActorStatus, SystemInfo};

/// Detailed actor metrics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorMetrics {
    /// Basic actor information
    pub info: ActorInfo,
    /// Performance metrics
    pub performance: PerformanceMetrics,
    /// Resource usage metrics
    pub resources: ResourceMetrics,
    /// Lifecycle events
    pub lifecycle: LifecycleMetrics,
    /// Error and fault metrics
    pub faults: FaultMetrics,
}

/// Performance-related metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Messages processed per second (current)
    pub current_message_rate: f64,
    /// Average message processing time (microseconds)
    pub avg_message_time: u64,
    /// Minimum message processing time (microseconds)
    pub min_message_time: u64,
    /// Maximum message processing time (microseconds)
    pub max_message_time: u64,
    /// 95th percentile message processing time (microseconds)
    pub p95_message_time: u64,
    /// 99th percentile message processing time (microseconds)
    pub p99_message_time: u64,
    /// CPU utilization percentage
    pub cpu_utilization: f64,
    /// Scheduler queue time (microseconds)
    pub queue_time: u64,
    /// Total execution time (microseconds)
    pub total_execution_time: u64,
    /// Idle time percentage
    pub idle_time_percent: f64,
}

/// Resource usage metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceMetrics {
    /// Current memory usage (bytes)
    pub memory_usage: usize,
    /// Peak memory usage (bytes)
    pub peak_memory_usage: usize,
    /// Memory allocations count
    pub memory_allocations: u64,
    /// Memory deallocations count
    pub memory_deallocations: u64,
    /// Heap size (bytes)
    pub heap_size: usize,
    /// Stack size (bytes)
    pub stack_size: usize,
    /// Mailbox size (number of messages)
    pub mailbox_size: usize,
    /// Maximum mailbox size reached
    pub max_mailbox_size: usize,
    /// File descriptors used
    pub file_descriptors: u32,
    /// Network connections
    pub network_connections: u32,
}

/// Lifecycle event tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleMetrics {
    /// Actor creation time
    pub created_at: SystemTime,
    /// Last restart time
    pub last_restart: Option<SystemTime>,
    /// Number of restarts
    pub restart_count: u32,
    /// Total uptime
    pub total_uptime: Duration,
    /// Time spent in each state
    pub state_durations: HashMap<ActorStatus, Duration>,
    /// State transition history (last 100 transitions)
    pub state_history: Vec<StateTransition>,
    /// Last activity timestamp
    pub last_activity: SystemTime,
    /// Activity periods (active/idle cycles)
    pub activity_periods: Vec<ActivityPeriod>,
}

/// State transition record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// Timestamp of transition
    pub timestamp: SystemTime,
    /// Previous state
    pub from_state: ActorStatus,
    /// New state
    pub to_state: ActorStatus,
    /// Reason for transition
    pub reason: String,
    /// Duration in previous state
    pub duration: Duration,
}

/// Activity period tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPeriod {
    /// Start time of period
    pub start: SystemTime,
    /// End time of period (None if ongoing)
    pub end: Option<SystemTime>,
    /// Whether this was an active or idle period
    pub active: bool,
    /// Number of messages processed during period
    pub messages_processed: u64,
}

/// Fault and error metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultMetrics {
    /// Total number of exceptions/errors
    pub total_exceptions: u64,
    /// Exceptions by type
    pub exception_types: HashMap<String, u64>,
    /// Recent exceptions (last 50)
    pub recent_exceptions: Vec<ExceptionRecord>,
    /// Crash count
    pub crash_count: u32,
    /// Last crash time
    pub last_crash: Option<SystemTime>,
    /// Recovery time after crashes (average)
    pub avg_recovery_time: Duration,
    /// Timeout events
    pub timeout_count: u64,
    /// Deadlock detections
    pub deadlock_count: u64,
    /// Memory leaks detected
    pub memory_leak_count: u64,
}

/// Exception/error record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionRecord {
    /// Timestamp of exception
    pub timestamp: SystemTime,
    /// Exception type/name
    pub exception_type: String,
    /// Error message
    pub message: String,
    /// Stack trace (if available)
    pub stack_trace: Option<String>,
    /// Context information
    pub context: HashMap<String, String>,
}

/// System-wide monitoring aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Basic system information
    pub system_info: SystemInfo,
    /// Aggregate performance metrics
    pub performance: SystemPerformanceMetrics,
    /// Resource utilization
    pub resources: SystemResourceMetrics,
    /// Health indicators
    pub health: SystemHealthMetrics,
}

/// System-wide performance metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPerformanceMetrics {
    /// Total messages per second across all actors
    pub total_message_rate: f64,
    /// Average system latency (microseconds)
    pub avg_system_latency: u64,
    /// Scheduler efficiency percentage
    pub scheduler_efficiency: f64,
    /// GC pause time percentage
    pub gc_pause_percent: f64,
    /// Throughput (operations per second)
    pub throughput: f64,
    /// Response time distribution
    pub response_time_distribution: HashMap<String, u64>, // percentiles
}

/// System resource metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemResourceMetrics {
    /// Total memory usage (bytes)
    pub total_memory: usize,
    /// Memory usage percentage
    pub memory_percent: f64,
    /// CPU usage percentage
    pub cpu_percent: f64,
    /// Load average (1, 5, 15 minutes)
    pub load_average: [f64; 3],
    /// Disk I/O statistics
    pub disk_io: DiskIoMetrics,
    /// Network I/O statistics
    pub network_io: NetworkIoMetrics,
    /// File descriptor usage
    pub fd_usage: u32,
    /// Thread count
    pub thread_count: u32,
}

/// Disk I/O metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskIoMetrics {
    /// Bytes read
    pub bytes_read: u64,
    /// Bytes written
    pub bytes_written: u64,
    /// Read operations
    pub read_ops: u64,
    /// Write operations
    pub write_ops: u64,
    /// Average read latency (microseconds)
    pub avg_read_latency: u64,
    /// Average write latency (microseconds)
    pub avg_write_latency: u64,
}

/// Network I/O metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkIoMetrics {
    /// Bytes received
    pub bytes_received: u64,
    /// Bytes sent
    pub bytes_sent: u64,
    /// Packets received
    pub packets_received: u64,
    /// Packets sent
    pub packets_sent: u64,
    /// Connection count
    pub connections: u32,
    /// Network errors
    pub errors: u64,
}

/// System health indicators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealthMetrics {
    /// Overall health score (0-100)
    pub health_score: f64,
    /// Number of healthy actors
    pub healthy_actors: usize,
    /// Number of unhealthy actors
    pub unhealthy_actors: usize,
    /// Critical alerts count
    pub critical_alerts: u32,
    /// Warning alerts count
    pub warning_alerts: u32,
    /// System stability score (0-100)
    pub stability_score: f64,
    /// Availability percentage
    pub availability_percent: f64,
    /// Mean time between failures (seconds)
    pub mtbf: f64,
    /// Mean time to recovery (seconds)
    pub mttr: f64,
}

/// Actor monitoring collector
pub struct ActorMonitor {
    /// Actor metrics storage
    metrics: Arc<RwLock<HashMap<Pid, ActorMetrics>>>,
    /// System metrics
    system_metrics: Arc<RwLock<SystemMetrics>>,
    /// Monitoring start time
    start_time: Instant,
    /// Collection interval
    collection_interval: Duration,
}

impl ActorMonitor {
    /// Create a new actor monitor
    pub fn new(collection_interval: Duration) -> Self {
        ActorMonitor {
            metrics: Arc::new(RwLock::new(HashMap::new())),
            system_metrics: Arc::new(RwLock::new(SystemMetrics::default())),
            start_time: Instant::now(),
            collection_interval,
        }
    }
    
    /// Start monitoring
    pub async fn start(&self) -> ReamResult<()> {
        let metrics = self.metrics.clone();
        let system_metrics = self.system_metrics.clone();
        let interval = self.collection_interval;
        
        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            
            loop {
                interval_timer.tick().await;
                
                // Collect actor metrics
                Self::collect_actor_metrics(&metrics).await;
                
                // Collect system metrics
                Self::collect_system_metrics(&system_metrics).await;
                
                // Perform health checks
                Self::perform_health_checks(&metrics, &system_metrics).await;
            }
        });
        
        Ok(())
    }
    
    /// Collect metrics for all actors
    async fn collect_actor_metrics(metrics: &Arc<RwLock<HashMap<Pid, ActorMetrics>>>) {
        // TODO: Implement actual metrics collection from runtime
    }
    
    /// Collect system-wide metrics
    async fn collect_system_metrics(system_metrics: &Arc<RwLock<SystemMetrics>>) {
        // TODO: Implement system metrics collection
    }
    
    /// Perform health checks
    async fn perform_health_checks(
        metrics: &Arc<RwLock<HashMap<Pid, ActorMetrics>>>,
        system_metrics: &Arc<RwLock<SystemMetrics>>,
    ) {
        // TODO: Implement health checking logic
    }
    
    /// Get actor metrics
    pub fn get_actor_metrics(&self, pid: Pid) -> Option<ActorMetrics> {
        let metrics = self.metrics.read().unwrap();
        metrics.get(&pid).cloned()
    }
    
    /// Get all actor metrics
    pub fn get_all_metrics(&self) -> HashMap<Pid, ActorMetrics> {
        let metrics = self.metrics.read().unwrap();
        metrics.clone()
    }
    
    /// Get system metrics
    pub fn get_system_metrics(&self) -> SystemMetrics {
        let system_metrics = self.system_metrics.read().unwrap();
        system_metrics.clone()
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        SystemMetrics {
            system_info: SystemInfo {
                runtime_stats: RuntimeStats {
                    process_count: 0,
                    running_processes: 0,
                    memory_usage: 0,
                    message_rate: 0.0,
                    scheduler_utilization: 0.0,
                    gc_collections: 0,
                },
                total_actors: 0,
                active_actors: 0,
                suspended_actors: 0,
                crashed_actors: 0,
                total_memory: 0,
                total_messages: 0,
                system_message_rate: 0.0,
                uptime: Duration::new(0, 0),
                cpu_usage: 0.0,
                memory_usage_percent: 0.0,
                load_average: 0.0,
            },
            performance: SystemPerformanceMetrics {
                total_message_rate: 0.0,
                avg_system_latency: 0,
                scheduler_efficiency: 0.0,
                gc_pause_percent: 0.0,
                throughput: 0.0,
                response_time_distribution: HashMap::new(),
            },
            resources: SystemResourceMetrics {
                total_memory: 0,
                memory_percent: 0.0,
                cpu_percent: 0.0,
                load_average: [0.0, 0.0, 0.0],
                disk_io: DiskIoMetrics {
                    bytes_read: 0,
                    bytes_written: 0,
                    read_ops: 0,
                    write_ops: 0,
                    avg_read_latency: 0,
                    avg_write_latency: 0,
                },
                network_io: NetworkIoMetrics {
                    bytes_received: 0,
                    bytes_sent: 0,
                    packets_received: 0,
                    packets_sent: 0,
                    connections: 0,
                    errors: 0,
                },
                fd_usage: 0,
                thread_count: 0,
            },
            health: SystemHealthMetrics {
                health_score: 100.0,
                healthy_actors: 0,
                unhealthy_actors: 0,
                critical_alerts: 0,
                warning_alerts: 0,
                stability_score: 100.0,
                availability_percent: 100.0,
                mtbf: 0.0,
                mttr: 0.0,
            },
        }
    }
}
