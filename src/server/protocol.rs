//! Wire Protocol
//!
//! Plain text over TCP, one command per line, `\n`-terminated:
//!
//! ```text
//! REGISTER <node_id>
//! HEARTBEAT <node_id>
//! ```
//!
//! There is no acknowledgement and no framing beyond the newline. Anything
//! that is not one of the two verbs is logged by the handler and ignored.

/// A parsed protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register(String),
    Heartbeat(String),
}

impl Command {
    pub fn node_id(&self) -> &str {
        match self {
            Command::Register(id) | Command::Heartbeat(id) => id,
        }
    }
}

/// Parses one line into a command. Surrounding whitespace is trimmed first;
/// a missing or empty node id makes the line unrecognized rather than
/// registering a nameless node.
pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();

    if let Some(id) = line.strip_prefix("REGISTER ") {
        let id = id.trim();
        if !id.is_empty() {
            return Some(Command::Register(id.to_string()));
        }
    } else if let Some(id) = line.strip_prefix("HEARTBEAT ") {
        let id = id.trim();
        if !id.is_empty() {
            return Some(Command::Heartbeat(id.to_string()));
        }
    }

    None
}
