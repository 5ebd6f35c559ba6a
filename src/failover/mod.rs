//! Primary/Backup Failover
//!
//! A coordinator started in the backup role does nothing but probe the
//! active instance's listening endpoint. Once a probe fails it assumes the
//! active role for the rest of its life: it re-hydrates the membership table
//! from the last snapshot and starts its own listener on the same port.
//!
//! This is a liveness heuristic, not an election: a probe failure cannot
//! distinguish a crashed primary from a broken network path, and nothing
//! fences the old primary. Under partition both instances can end up active.

pub mod supervisor;

pub use supervisor::FailoverSupervisor;
