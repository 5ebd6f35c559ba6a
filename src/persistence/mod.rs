//! Snapshot Persistence
//!
//! Serializes the membership table to a JSON file so a restarted or promoted
//! coordinator starts from the last known cluster view instead of an empty
//! table. Writes are full overwrites driven by the failure detector's
//! display/persist cycle; loads happen once, before the listener accepts.

pub mod snapshot;

pub use snapshot::{PersistenceError, SnapshotStore};
