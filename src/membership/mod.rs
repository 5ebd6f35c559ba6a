//! Membership & Failure Detection Module
//!
//! The coordinator's ground truth: a lock-guarded table of node liveness
//! records, mutated by connection handlers on inbound REGISTER/HEARTBEAT
//! traffic and swept by a timeout-based failure detector.
//!
//! ## Core Mechanisms
//! - **Single Lock Discipline**: every table access goes through
//!   `MembershipStore`, which serializes mutations and hands out
//!   point-in-time copies for anything that does I/O.
//! - **Timeout Detection**: the `FailureDetector` runs on a fixed period and
//!   demotes nodes whose last heartbeat is strictly older than the timeout.
//!   Failed nodes stay in the table until traffic revives them.

pub mod detector;
pub mod store;
pub mod types;
