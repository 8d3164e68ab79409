//! Node discovery and cluster formation
//!
//! Implements Kademlia-based DHT for decentralized node discovery,
//! gossip protocols for cluster state propagation, and bootstrap
//! mechanisms for joining existing clusters.

pub mod dht;

pub use dht::*;

// Placeholder implementations for bootstrap and gossip
// These would be fully implemented in their respective files

/// Bootstrap manager for connecting to initial nodes
#[derive(Debug)]
pub struct BootstrapManager {
    config: BootstrapConfig,
    connected_nodes: Arc<RwLock<Vec<NodeInfo>>>,
}

impl BootstrapManager {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            connected_nodes: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn start(&mut self) -> P2PResult<()> { Ok(()) }
    pub async fn stop(&mut self) -> P2PResult<()> { Ok(()) }

    pub async fn connect_to_bootstrap_nodes(&mut self, nodes: Vec<NodeInfo>) -> P2PResult<()> {
        let mut connected = self.connected_nodes.write().await;
        connected.extend(nodes);
        Ok(())
    }

    pub async fn become_bootstrap_node(&mut self) -> P2PResult<()> { Ok(()) }
    pub async fn get_connected_nodes(&self) -> Vec<NodeInfo> {
        self.connected_nodes.read().await.clone()
    }
}

/// Gossip protocol for cluster state propagation
#[derive(Debug)]
pub struct GossipProtocol {
    local_node: NodeInfo,
    config: GossipConfig,
    cluster_members: Arc<RwLock<Vec<NodeInfo>>>,
    stats: Arc<RwLock<GossipStats>>,
}

impl GossipProtocol {
    pub fn new(local_node: NodeInfo, config: GossipConfig) -> Self {
        Self {
            local_node,
            config,
            cluster_members: Arc::new(RwLock::new(Vec::new())),
            stats: Arc::new(RwLock::new(GossipStats::default())),
        }
    }

    pub async fn start(&mut self) -> P2PResult<()> { Ok(()) }
    pub async fn stop(&mut self) -> P2PResult<()> { Ok(()) }
    pub async fn join_cluster(&mut self) -> P2PResult<()> { Ok(()) }
    pub async fn create_cluster(&mut self) -> P2PResult<()> { Ok(()) }
    pub async fn announce_presence(&mut self) -> P2PResult<()> { Ok(()) }

    pub async fn get_cluster_members(&self) -> Vec<NodeInfo> {
        self.cluster_members.read().await.clone()
    }

    pub async fn update_node_info(&mut self, node_info: NodeInfo) -> P2PResult<()> {
        let mut members = self.cluster_members.write().await;
        if let Some(pos) = members.iter().position(|n| n.node_id == node_info.node_id) {
            members[pos] = node_info;
        } else {
            members.push(node_info);
        }
        Ok(())
    }

    pub async fn remove_node(&mut self, node_id: NodeId) -> P2PResult<()> {
        let mut members = self.cluster_members.write().await;
        members.retain(|n| n.node_id != node_id);
        Ok(())
    }

    pub async fn get_stats(&self) -> GossipStats {
        self.stats.read().await.clone()
    }
}

/// Bootstrap configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub connection_timeout: std::time::Duration,
    pub retry_attempts: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            connection_timeout: std::time::Duration::from_secs(10),
            retry_attempts: 3,
        }
    }
}

/// Gossip configuration
#[derive(Debug, Clone)]
pub struct GossipConfig {
    pub gossip_interval: std::time::Duration,
    pub fanout: usize,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            gossip_interval: std::time::Duration::from_secs(1),
            fanout: 3,
        }
    }
}

/// Gossip statistics
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GossipStats {
    pub rounds_completed: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
}

use crate::p2p::{P2PResult, P2PError, DiscoveryError, NodeId, NodeInfo};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use serde::{Deserialize, Serialize};

/// Node discovery system
#[derive(Debug)]
pub struct NodeDiscovery {
    /// DHT for decentralized node discovery
    dht: Arc<RwLock<ReamDHT>>,
    /// Gossip protocol for cluster state
    gossip: Arc<RwLock<GossipProtocol>>,
    /// Bootstrap manager
    bootstrap: Arc<RwLock<BootstrapManager>>,
    /// Discovery configuration
    config: DiscoveryConfig,
    /// Discovery statistics
    stats: Arc<RwLock<DiscoveryStats>>,
}

impl NodeDiscovery {
    /// Create a new node discovery system
    pub async fn new(local_node: NodeInfo, config: DiscoveryConfig) -> P2PResult<Self> {
        let dht = Arc::new(RwLock::new(ReamDHT::new(local_node.clone(), config.dht_config.clone())));
        let gossip = Arc::new(RwLock::new(GossipProtocol::new(local_node.clone(), config.gossip_config.clone())));
        let bootstrap = Arc::new(RwLock::new(BootstrapManager::new(config.bootstrap_config.clone())));
        let stats = Arc::new(RwLock::new(DiscoveryStats::default()));

        Ok(Self {
            dht,
            gossip,
            bootstrap,
            config,
            stats,
        })
    }

    /// Start the discovery system
    pub async fn start(&self) -> P2PResult<()> {
        // Start DHT
        {
            let mut dht = self.dht.write().await;
            dht.start().await?;
        }

        // Start gossip protocol
        {
            let mut gossip = self.gossip.write().await;
            gossip.start().await?;
        }

        // Start bootstrap manager
        {
            let mut bootstrap = self.bootstrap.write().await;
            bootstrap.start().await?;
        }

        Ok(())
    }

    /// Stop the discovery system
    pub async fn stop(&self) -> P2PResult<()> {
        // Stop all components
        {
            let mut dht = self.dht.write().await;
            dht.stop().await?;
        }

        {
            let mut gossip = self.gossip.write().await;
            gossip.stop().await?;
        }

        {
            let mut bootstrap = self.bootstrap.write().await;
            bootstrap.stop().await?;
        }

        Ok(())
    }

    /// Join a cluster using bootstrap nodes
    pub async fn join_cluster(&self, bootstrap_nodes: Vec<NodeInfo>) -> P2PResult<()> {
        // Use bootstrap manager to connect to initial nodes
        {
            let mut bootstrap = self.bootstrap.write().await;
            bootstrap.connect_to_bootstrap_nodes(bootstrap_nodes).await?;
        }

        // Join DHT network
        {
            let mut dht = self.dht.write().await;
            let bootstrap_nodes = {
                let bootstrap = self.bootstrap.read().await;
                bootstrap.get_connected_nodes().await
            };
            dht.join_network(bootstrap_nodes).await?;
        }

        // Start participating in gossip
        {
            let mut gossip = self.gossip.write().await;
            gossip.join_cluster().await?;
        }

        self.stats.write().await.clusters_joined += 1;
        Ok(())
    }

    /// Create a new cluster (become bootstrap node)
    pub async fn create_cluster(&self) -> P2PResult<()> {
        // Initialize as bootstrap node
        {
            let mut bootstrap = self.bootstrap.write().await;
            bootstrap.become_bootstrap_node().await?;
        }

        // Initialize DHT as first node
        {
            let mut dht = self.dht.write().await;
            dht.initialize_network().await?;
        }

        // Start gossip as cluster founder
        {
            let mut gossip = self.gossip.write().await;
            gossip.create_cluster().await?;
        }

        self.stats.write().await.clusters_created += 1;
        Ok(())
    }

    /// Find nodes close to a given key
    pub async fn find_nodes(&self, key: &[u8], count: usize) -> P2PResult<Vec<NodeInfo>> {
        let dht = self.dht.read().await;
        dht.find_nodes(key, count).await
    }

    /// Announce node presence to the network
    pub async fn announce_presence(&self) -> P2PResult<()> {
        // Announce through DHT
        {
            let mut dht = self.dht.write().await;
            dht.announce_presence().await?;
        }

        // Announce through gossip
        {
            let mut gossip = self.gossip.write().await;
            gossip.announce_presence().await?;
        }

        Ok(())
    }

    /// Get list of known nodes
    pub async fn get_known_nodes(&self) -> Vec<NodeInfo> {
        let dht = self.dht.read().await;
        dht.get_known_nodes().await
    }

    /// Get cluster members from gossip
    pub async fn get_cluster_members(&self) -> Vec<NodeInfo> {
        let gossip = self.gossip.read().await;
        gossip.get_cluster_members().await
    }

    /// Update node information
    pub async fn update_node_info(&self, node_info: NodeInfo) -> P2PResult<()> {
        // Update in DHT
        {
            let mut dht = self.dht.write().await;
            dht.update_node_info(node_info.clone()).await?;
        }

        // Update in gossip
        {
            let mut gossip = self.gossip.write().await;
            gossip.update_node_info(node_info).await?;
        }

        Ok(())
    }

    /// Remove a node from discovery
    pub async fn remove_node(&self, node_id: NodeId) -> P2PResult<()> {
        // Remove from DHT
        {
            let mut dht = self.dht.write().await;
            dht.remove_node(node_id).await?;
        }

        // Remove from gossip
        {
            let mut gossip = self.gossip.write().await;
            gossip.remove_node(node_id).await?;
        }

        Ok(())
    }

    /// Get discovery statistics
    pub async fn get_stats(&self) -> DiscoveryStats {
        let mut stats = self.stats.read().await.clone();
        
        // Add DHT stats
        let dht_stats = {
            let dht = self.dht.read().await;
            dht.get_stats().await
        };
        stats.dht_lookups = dht_stats.lookups_performed;
        stats.dht_nodes = dht_stats.known_nodes;

        // Add gossip stats
        let gossip_stats = {
            let gossip = self.gossip.read().await;
            gossip.get_stats().await
        };
        stats.gossip_rounds = gossip_stats.rounds_completed;
        stats.gossip_messages = gossip_stats.messages_sent;

        stats
    }
}

/// Discovery configuration
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// DHT configuration
    pub dht_config: DHTConfig,
    /// Gossip configuration
    pub gossip_config: GossipConfig,
    /// Bootstrap configuration
    pub bootstrap_config: BootstrapConfig,
    /// Discovery intervals
    pub discovery_interval: std::time::Duration,
    /// Node announcement interval
    pub announcement_interval: std::time::Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            dht_config: DHTConfig::default(),
            gossip_config: GossipConfig::default(),
            bootstrap_config: BootstrapConfig::default(),
            discovery_interval: std::time::Duration::from_secs(30),
            announcement_interval: std::time::Duration::from_secs(60),
        }
    }
}

/// Discovery statistics
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DiscoveryStats {
    /// Number of clusters joined
    pub clusters_joined: u64,
    /// Number of clusters created
    pub clusters_created: u64,
    /// Number of nodes discovered
    pub nodes_discovered: u64,
    /// Number of failed discovery attempts
    pub discovery_failures: u64,
    /// DHT lookups performed
    pub dht_lookups: u64,
    /// Known nodes in DHT
    pub dht_nodes: usize,
    /// Gossip rounds completed
    pub gossip_rounds: u64,
    /// Gossip messages sent
    pub gossip_messages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[tokio::test]
    async fn test_discovery_creation() {
        let node_info = NodeInfo::new(
            NodeId::new(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap(),
        );
        let config = DiscoveryConfig::default();
        
        let result = NodeDiscovery::new(node_info, config).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_discovery_lifecycle() {
        let node_info = NodeInfo::new(
            NodeId::new(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap(),
        );
        let config = DiscoveryConfig::default();
        
        let discovery = NodeDiscovery::new(node_info, config).await.unwrap();
        
        assert!(discovery.start().await.is_ok());
        assert!(discovery.stop().await.is_ok());
    }

    #[tokio::test]
    async fn test_cluster_creation() {
        let node_info = NodeInfo::new(
            NodeId::new(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap(),
        );
        let config = DiscoveryConfig::default();
        
        let discovery = NodeDiscovery::new(node_info, config).await.unwrap();
        discovery.start().await.unwrap();
        
        let result = discovery.create_cluster().await;
        assert!(result.is_ok());
        
        let stats = discovery.get_stats().await;
        assert_eq!(stats.clusters_created, 1);
        
        discovery.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_node_announcement() {
        let node_info = NodeInfo::new(
            NodeId::new(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap(),
        );
        let config = DiscoveryConfig::default();
        
        let discovery = NodeDiscovery::new(node_info, config).await.unwrap();
        discovery.start().await.unwrap();
        discovery.create_cluster().await.unwrap();
        
        let result = discovery.announce_presence().await;
        assert!(result.is_ok());
        
        discovery.stop().await.unwrap();
    }
}
