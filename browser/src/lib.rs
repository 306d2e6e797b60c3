//! Headless views over the catalog API.
//!
//! Each view is a state machine: `update` takes a message and may hand back a
//! task describing one API call; running the task yields the next message.
//! Requests carry a ticket and only the latest ticket of a view is applied.

pub mod albums;
pub mod bulk;
pub mod photo_paths;
pub mod photographs;
mod shell;

pub use bulk::{BulkOutcome, BulkPolicy, BulkReport};
pub use shell::{Message, Shell, Tab, Task};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Where hierarchy levels are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupingMode {
    /// Ask summary endpoints for counts, fetch items only for the shown level.
    #[default]
    Server,
    /// Fetch every item once and group in memory.
    Client,
}

#[derive(Debug, Error)]
#[error("unknown grouping mode: {0} (expected `server` or `client`)")]
pub struct ParseGroupingError(String);

impl FromStr for GroupingMode {
    type Err = ParseGroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(GroupingMode::Server),
            "client" => Ok(GroupingMode::Client),
            other => Err(ParseGroupingError(other.to_string())),
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingMode::Server => write!(f, "server"),
            GroupingMode::Client => write!(f, "client"),
        }
    }
}

/// Identifies one request issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Hands out tickets; only the most recent one is current.
#[derive(Debug, Default)]
pub struct Tickets {
    latest: u64,
}

impl Tickets {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// What a view currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Load<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    /// Loaded fine, nothing to show.
    Empty,
    Failed(String),
}

impl<T> Load<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(content) => Some(content),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Load::Ready(content) => Some(content),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Load::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Load::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Load::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Load::Empty)
    }
}
