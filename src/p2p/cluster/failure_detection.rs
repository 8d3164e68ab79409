//! Failure detection for cluster nodes
//!
//! Implements failure detection mechanisms to identify failed or
//! unreachable nodes in the cluster.

use crate::p2p::{P2PResult, NodeId};
use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

/// Failure detector for cluster nodes
#[derive(Debug)]
pub struct FailureDetector {
    /// Configuration
    config: FailureDetectionConfig,
    /// Failed nodes
    failed_nodes: HashSet<NodeId>,
    /// Node heartbeat timestamps
    heartbeats: HashMap<NodeId, std::time::SystemTime>,
}

impl FailureDetector {
    /// Create a new failure detector
    pub fn new(config: FailureDetectionConfig) -> Self {
        Self {
            config,
            failed_nodes: HashSet::new(),
            heartbeats: HashMap::new(),
        }
    }

    /// Start the failure detector
    pub async fn start(&mut self) -> P2PResult<()> {
        Ok(())
    }

    /// Stop the failure detector
    pub async fn stop(&mut self) -> P2PResult<()> {
        Ok(())
    }

    /// Check if a node is alive
    pub async fn is_alive(&self, node_id: NodeId) -> bool {
        !self.failed_nodes.contains(&node_id)
    }

    /// Report a node failure
    pub async fn report_failure(&mut self, node_id: NodeId) -> P2PResult<()> {
        self.failed_nodes.insert(node_id);
        Ok(())
    }

    /// Get number of failed nodes
    pub async fn get_failed_node_count(&self) -> usize {
        self.failed_nodes.len()
    }

    /// Update heartbeat for a node
    pub async fn update_heartbeat(&mut self, node_id: NodeId) {
        self.heartbeats.insert(node_id, std::time::SystemTime::now());
        self.failed_nodes.remove(&node_id);
    }
}

/// Failure detection configuration
#[derive(Debug, Clone)]
pub struct FailureDetectionConfig {
    /// Timeout for considering a node failed
    pub failure_timeout: std::time::Duration,
    /// Heartbeat interval
    pub heartbeat_interval: std::time::Duration,
}

impl Default for FailureDetectionConfig {
    fn default() -> Self {
        Self {
            failure_timeout: std::time::Duration::from_secs(30),
            heartbeat_interval: std::time::Duration::from_secs(5),
        }
    }
}
