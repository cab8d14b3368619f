//! Error types shared by the list, dictionary and cache layers.
//!
//! Every variant is a caller bug (an invalid argument). Lookups of absent
//! keys are not errors; they return `None`.

use thiserror::Error;

use crate::linked_list::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Handle does not refer to a live node in this list.
    #[error("invalid argument: {0:?} is not a node of this list")]
    UnknownNode(NodeId),
    /// Node is already linked and cannot be added again.
    #[error("invalid argument: {0:?} is already linked")]
    NodeLinked(NodeId),
    /// Node is detached and cannot be unlinked.
    #[error("invalid argument: {0:?} is not linked")]
    NodeDetached(NodeId),
    /// Cache capacity is zero.
    #[error("invalid argument: max length must be a positive integer, got {0}")]
    InvalidCapacity(usize),
}

impl Error {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::UnknownNode(_)
                | Self::NodeLinked(_)
                | Self::NodeDetached(_)
                | Self::InvalidCapacity(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
