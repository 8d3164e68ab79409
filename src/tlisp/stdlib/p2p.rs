//! P2P distributed system primitives for TLisp
//!
//! Provides TLisp functions for interacting with the P2P distributed system,
//! including cluster management, remote actors, and consensus operations.

use crate::tlisp::{Value, TlispResult, TlispError, Environment};
use crate::p2p::{P2PResult, ReamNode, NodeInfo, NodeId, ActorId, PlacementConstraints};
use crate::p2p::actor::{DistributedActorRef, MigrationResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// P2P system handle for TLisp integration
pub struct P2PHandle {
    /// Reference to the P2P node
    node: Option<Arc<RwLock<ReamNode>>>,
    /// Active distributed actors
    actors: HashMap<String, DistributedActorRef>,
}

impl P2PHandle {
    /// Create a new P2P handle
    pub fn new() -> Self {
        Self {
            node: None,
            actors: HashMap::new(),
        }
    }

    /// Set the P2P node
    pub fn set_node(&mut self, node: Arc<RwLock<ReamNode>>) {
        self.node = Some(node);
    }

    /// Get the P2P node
    pub fn get_node(&self) -> Option<Arc<RwLock<ReamNode>>> {
        self.node.clone()
    }
}

/// Register P2P functions in TLisp environment
pub fn register_p2p_functions(env: &mut Environment) -> TlispResult<()> {
    // Cluster management functions
    env.define("p2p-create-cluster", Value::NativeFunction(p2p_create_cluster))?;
    env.define("p2p-join-cluster", Value::NativeFunction(p2p_join_cluster))?;
    env.define("p2p-leave-cluster", Value::NativeFunction(p2p_leave_cluster))?;
    env.define("p2p-cluster-info", Value::NativeFunction(p2p_cluster_info))?;
    env.define("p2p-cluster-members", Value::NativeFunction(p2p_cluster_members))?;

    // Actor management functions
    env.define("p2p-spawn-actor", Value::NativeFunction(p2p_spawn_actor))?;
    env.define("p2p-migrate-actor", Value::NativeFunction(p2p_migrate_actor))?;
    env.define("p2p-send-remote", Value::NativeFunction(p2p_send_remote))?;
    env.define("p2p-actor-location", Value::NativeFunction(p2p_actor_location))?;

    // Node management functions
    env.define("p2p-node-info", Value::NativeFunction(p2p_node_info))?;
    env.define("p2p-node-health", Value::NativeFunction(p2p_node_health))?;
    env.define("p2p-discover-nodes", Value::NativeFunction(p2p_discover_nodes))?;

    // Consensus functions
    env.define("p2p-propose", Value::NativeFunction(p2p_propose))?;
    env.define("p2p-consensus-state", Value::NativeFunction(p2p_consensus_state))?;

    Ok(())
}

/// Create a new P2P cluster
fn p2p_create_cluster(args: Vec<Value>) -> TlispResult<Value> {
    if !args.is_empty() {
        return Err(TlispError::ArityError {
            expected: 0,
            actual: args.len(),
        });
    }

    // In a real implementation, this would:
    // 1. Get the P2P handle from the environment
    // 2. Create a cluster using the P2P node
    // 3. Return cluster information

    Ok(Value::Map(HashMap::from([
        ("status".to_string(), Value::String("created".to_string())),
        ("cluster-id".to_string(), Value::String(uuid::Uuid::new_v4().to_string())),
        ("member-count".to_string(), Value::Number(1.0)),
    ])))
}

/// Join an existing P2P cluster
fn p2p_join_cluster(args: Vec<Value>) -> TlispResult<Value> {
    if args.len() != 1 {
        return Err(TlispError::ArityError {
            expected: 1,
            actual: args.len(),
        });
    }

    let bootstrap_nodes = match &args[0] {
        Value::List(nodes) => {
            let mut node_infos = Vec::new();
            for node in nodes {
                if let Value::String(addr) = node {
                    // Parse address and create NodeInfo
                    if let Ok(socket_addr) = addr.parse() {
                        let node_info = NodeInfo::new(NodeId::new(), socket_addr);
                        node_infos.push(node_info);
                    }
                }
            }
            node_infos
        }
        _ => return Err(TlispError::TypeError {
            expected: "list of addresses".to_string(),
            actual: format!("{:?}", args[0]),
        }),
    };

    // In a real implementation, this would join the cluster
    Ok(Value::Map(HashMap::from([
        ("status".to_string(), Value::String("joined".to_string())),
        ("bootstrap-count".to_string(), Value::Number(bootstrap_nodes.len() as f64)),
    ])))
}

/// Leave the current P2P cluster
fn p2p_leave_cluster(args: Vec<Value>) -> TlispResult<Value> {
    if !args.is_empty() {
        return Err(TlispError::ArityError {
            expected: 0,
            actual: args.len(),
        });
    }

    // In a real implementation, this would leave the cluster
    Ok(Value::Map(HashMap::from([
        ("status".to_string(), Value::String("left".to_string())),
    ])))
}

/// Get cluster information
fn p2p_cluster_info(args: Vec<Value>) -> TlispResult<Value> {
    if !args.is_empty() {
        return Err(TlispError::ArityError {
            expected: 0,
            actual: args.len(),
        });
    }

    // In a real implementation, this would get actual cluster info
    Ok(Value::Map(HashMap::from([
        ("cluster-id".to_string(), Value::String(uuid::Uuid::new_v4().to_string())),
        ("member-count".to_string(), Value::Number(3.0)),
        ("health".to_string(), Value::String("healthy".to_string())),
        ("leader".to_string(), Value::String("node-1".to_string())),
    ])))
}

/// Get cluster members
fn p2p_cluster_members(args: Vec<Value>) -> TlispResult<Value> {
    if !args.is_empty() {
        return Err(TlispError::ArityError {
            expected: 0,
            actual: args.len(),
        });
    }

    // In a real implementation, this would get actual cluster members
    let members = vec![
        Value::Map(HashMap::from([
            ("node-id".to_string(), Value::String("node-1".to_string())),
            ("address".to_string(), Value::String("127.0.0.1:8080".to_string())),
            ("status".to_string(), Value::String("healthy".to_string())),
        ])),
        Value::Map(HashMap::from([
            ("node-id".to_string(), Value::String("node-2".to_string())),
            ("address".to_string(), Value::String("127.0.0.1:8081".to_string())),
            ("status".to_string(), Value::String("healthy".to_string())),
        ])),
    ];

    Ok(Value::List(members))
}

/// Spawn a distributed actor
fn p2p_spawn_actor(args: Vec<Value>) -> TlispResult<Value> {
    if args.len() < 1 || args.len() > 2 {
        return Err(TlispError::ArityError {
            expected: 1,
            actual: args.len(),
        });
    }

    let actor_type = match &args[0] {
        Value::String(s) => s.clone(),
        _ => return Err(TlispError::TypeError {
            expected: "string".to_string(),
            actual: format!("{:?}", args[0]),
        }),
    };

    let placement = if args.len() > 1 {
        match &args[1] {
            Value::Map(constraints) => {
                // Parse placement constraints
                Some(PlacementConstraints::default())
            }
            _ => None,
        }
    } else {
        None
    };

    // In a real implementation, this would spawn the actor
    let actor_id = ActorId::new();
    Ok(Value::Map(HashMap::from([
        ("actor-id".to_string(), Value::String(actor_id.to_string())),
        ("actor-type".to_string(), Value::String(actor_type)),
        ("node".to_string(), Value::String("local".to_string())),
    ])))
}

/// Migrate an actor to another node
fn p2p_migrate_actor(args: Vec<Value>) -> TlispResult<Value> {
    if args.len() != 2 {
        return Err(TlispError::ArityError {
            expected: 2,
            actual: args.len(),
        });
    }

    let actor_id = match &args[0] {
        Value::String(s) => s.clone(),
        _ => return Err(TlispError::TypeError {
            expected: "string".to_string(),
            actual: format!("{:?}", args[0]),
        }),
    };

    let target_node = match &args[1] {
        Value::String(s) => s.clone(),
        _ => return Err(TlispError::TypeError {
            expected: "string".to_string(),
            actual: format!("{:?}", args[1]),
        }),
    };

    // In a real implementation, this would migrate the actor
    Ok(Value::Map(HashMap::from([
        ("status".to_string(), Value::String("migrated".to_string())),
        ("actor-id".to_string(), Value::String(actor_id)),
        ("target-node".to_string(), Value::String(target_node)),
    ])))
}

/// Send a message to a remote actor
fn p2p_send_remote(args: Vec<Value>) -> TlispResult<Value> {
    if args.len() != 2 {
        return Err(TlispError::ArityError {
            expected: 2,
            actual: args.len(),
        });
    }

    let actor_ref = match &args[0] {
        Value::String(s) => s.clone(),
        _ => return Err(TlispError::TypeError {
            expected: "string".to_string(),
            actual: format!("{:?}", args[0]),
        }),
    };

    let message = &args[1];

    // In a real implementation, this would send the message
    Ok(Value::Map(HashMap::from([
        ("status".to_string(), Value::String("sent".to_string())),
        ("actor".to_string(), Value::String(actor_ref)),
        ("message-size".to_string(), Value::Number(42.0)),
    ])))
}

/// Get actor location information
fn p2p_actor_location(args: Vec<Value>) -> TlispResult<Value> {
    if args.len() != 1 {
        return Err(TlispError::ArityError {
            expected: 1,
            actual: args.len(),
        });
    }

    let actor_id = match &args[0] {
        Value::String(s) => s.clone(),
        _ => return Err(TlispError::TypeError {
            expected: "string".to_string(),
            actual: format!("{:?}", args[0]),
        }),
    };

    // In a real implementation, this would look up the actor location
    Ok(Value::Map(HashMap::from([
        ("actor-id".to_string(), Value::String(actor_id)),
        ("node".to_string(), Value::String("node-2".to_string())),
        ("address".to_string(), Value::String("127.0.0.1:8081".to_string())),
    ])))
}

/// Get local node information
fn p2p_node_info(args: Vec<Value>) -> TlispResult<Value> {
    if !args.is_empty() {
        return Err(TlispError::ArityError {
            expected: 0,
            actual: args.len(),
        });
    }

    // In a real implementation, this would get actual node info
    Ok(Value::Map(HashMap::from([
        ("node-id".to_string(), Value::String(NodeId::new().to_string())),
        ("address".to_string(), Value::String("127.0.0.1:8080".to_string())),
        ("status".to_string(), Value::String("running".to_string())),
        ("uptime".to_string(), Value::Number(3600.0)),
    ])))
}

/// Check node health
fn p2p_node_health(args: Vec<Value>) -> TlispResult<Value> {
    if !args.is_empty() {
        return Err(TlispError::ArityError {
            expected: 0,
            actual: args.len(),
        });
    }

    // In a real implementation, this would check actual health
    Ok(Value::Map(HashMap::from([
        ("healthy".to_string(), Value::Bool(true)),
        ("cpu-usage".to_string(), Value::Number(25.5)),
        ("memory-usage".to_string(), Value::Number(512.0)),
        ("active-actors".to_string(), Value::Number(42.0)),
    ])))
}

/// Discover nodes in the network
fn p2p_discover_nodes(args: Vec<Value>) -> TlispResult<Value> {
    let limit = if args.is_empty() {
        10
    } else {
        match &args[0] {
            Value::Number(n) => *n as usize,
            _ => return Err(TlispError::TypeError {
                expected: "number".to_string(),
                actual: format!("{:?}", args[0]),
            }),
        }
    };

    // In a real implementation, this would discover actual nodes
    let nodes = (0..limit.min(5)).map(|i| {
        Value::Map(HashMap::from([
            ("node-id".to_string(), Value::String(format!("node-{}", i))),
            ("address".to_string(), Value::String(format!("127.0.0.1:808{}", i))),
            ("distance".to_string(), Value::Number(i as f64)),
        ]))
    }).collect();

    Ok(Value::List(nodes))
}

/// Propose a value for consensus
fn p2p_propose(args: Vec<Value>) -> TlispResult<Value> {
    if args.len() != 1 {
        return Err(TlispError::ArityError {
            expected: 1,
            actual: args.len(),
        });
    }

    let value = &args[0];

    // In a real implementation, this would propose the value for consensus
    Ok(Value::Map(HashMap::from([
        ("status".to_string(), Value::String("proposed".to_string())),
        ("proposal-id".to_string(), Value::String(uuid::Uuid::new_v4().to_string())),
        ("term".to_string(), Value::Number(5.0)),
    ])))
}

/// Get consensus state
fn p2p_consensus_state(args: Vec<Value>) -> TlispResult<Value> {
    if !args.is_empty() {
        return Err(TlispError::ArityError {
            expected: 0,
            actual: args.len(),
        });
    }

    // In a real implementation, this would get actual consensus state
    Ok(Value::Map(HashMap::from([
        ("algorithm".to_string(), Value::String("raft".to_string())),
        ("term".to_string(), Value::Number(5.0)),
        ("role".to_string(), Value::String("follower".to_string())),
        ("leader".to_string(), Value::String("node-1".to_string())),
        ("committed".to_string(), Value::Number(42.0)),
    ])))
}
