//! Coordinator Network Surface
//!
//! Accepts worker connections on a single TCP port and runs one handler task
//! per connection. Handlers parse the line-oriented protocol and mutate the
//! membership store; they never write back to the socket (the protocol has
//! no acknowledgements).

pub mod handlers;
pub mod protocol;

pub use handlers::{handle_connection, run_listener, DEFAULT_MAX_CONNECTIONS, DEFAULT_PORT};
pub use protocol::{parse_line, Command};
