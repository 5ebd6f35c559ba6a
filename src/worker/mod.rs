//! Worker Client Module
//!
//! The outbound half of the protocol: a worker process holds one connection
//! to the coordinator, registers once per connection, and heartbeats on a
//! fixed period. Connection loss is never fatal; the client retries with a
//! fixed backoff forever and re-registers after every reconnect.

pub mod client;

pub use client::{WorkerClient, HEARTBEAT_INTERVAL, RETRY_INTERVAL};

#[cfg(test)]
mod tests;
