use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identity of a worker node, as reported in its REGISTER line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Liveness classification of a node.
///
/// `Active -> Failed` happens only through the failure detector's timeout
/// rule; `Failed -> Active` only through a subsequent REGISTER or HEARTBEAT.
/// There is no terminal state: records are never removed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Failed,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Active => f.write_str("active"),
            NodeStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Represents a single member in the cluster.
///
/// `last_seen` is the epoch-seconds timestamp of the most recent REGISTER or
/// HEARTBEAT processed for this node. This is also the on-disk shape: the
/// snapshot file is a JSON object mapping node id to this record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRecord {
    pub status: NodeStatus,
    pub last_seen: u64,
}

impl NodeRecord {
    pub fn active_at(now: u64) -> Self {
        Self {
            status: NodeStatus::Active,
            last_seen: now,
        }
    }
}

/// Current wall-clock time as epoch seconds, the unit `last_seen` is kept in.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
