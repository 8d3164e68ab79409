//! Cluster membership management
//!
//! Manages cluster membership, including joining, leaving,
//! and maintaining the member list.

// This file provides the detailed implementation that would be
// imported by the main cluster/mod.rs file. For now, the
// implementation is in mod.rs as a placeholder.

// Future implementation would include:
// - Gossip-based membership protocols
// - Membership state synchronization
// - Member health tracking
// - Dynamic membership changes
