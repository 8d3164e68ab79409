//! Recovery mechanisms for cluster failures
//!
//! Implements recovery strategies for handling node failures,
//! network partitions, and cluster healing.

use crate::p2p::{P2PResult, NodeId};
use serde::{Deserialize, Serialize};

/// Recovery manager for cluster failures
#[derive(Debug)]
pub struct RecoveryManager {
    /// Configuration
    config: RecoveryConfig,
}

impl RecoveryManager {
    /// Create a new recovery manager
    pub fn new(config: RecoveryConfig) -> Self {
        Self { config }
    }

    /// Start the recovery manager
    pub async fn start(&mut self) -> P2PResult<()> {
        Ok(())
    }

    /// Stop the recovery manager
    pub async fn stop(&mut self) -> P2PResult<()> {
        Ok(())
    }

    /// Handle node failure
    pub async fn handle_node_failure(&mut self, _node_id: NodeId) -> P2PResult<()> {
        // Implement recovery logic
        Ok(())
    }
}

/// Recovery configuration
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Recovery timeout
    pub recovery_timeout: std::time::Duration,
    /// Maximum recovery attempts
    pub max_recovery_attempts: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            recovery_timeout: std::time::Duration::from_secs(60),
            max_recovery_attempts: 3,
        }
    }
}
