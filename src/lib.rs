//! Cluster Membership Coordinator Library
//!
//! This library crate defines the core modules of the membership system.
//! It serves as the foundation for the two binary executables
//! (`coordinator` and `worker`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`membership`**: The shared ground truth. A lock-guarded table mapping
//!   node ids to liveness records, plus the periodic failure detector that
//!   demotes silent nodes to `Failed`.
//! - **`server`**: The coordinator's network surface. Parses the line-oriented
//!   `REGISTER`/`HEARTBEAT` protocol and runs one handler task per accepted
//!   connection against the membership store.
//! - **`persistence`**: Snapshot save/load. Serializes the full membership
//!   table to a JSON file so a restarted (or promoted) coordinator can
//!   re-hydrate its view of the cluster.
//! - **`failover`**: The standby supervisor. Probes the active coordinator's
//!   listening endpoint and signals takeover once the probe fails.
//! - **`worker`**: The outbound client loop. Registers once per connection,
//!   heartbeats on a fixed period, and reconnects with fixed backoff forever.
//!
//! The `logging` module carries the small two-level append-to-file log the
//! operators rely on; components receive it as a capability rather than
//! reaching for a global.

pub mod failover;
pub mod logging;
pub mod membership;
pub mod persistence;
pub mod server;
pub mod worker;
