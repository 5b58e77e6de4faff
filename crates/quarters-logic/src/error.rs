//! Error taxonomy shared by all allocator operations.

use thiserror::Error;

/// Failures returned by [`Allocator`](crate::allocator::Allocator)
/// operations.
///
/// Every failure aborts only the operation that raised it and leaves prior
/// state untouched. Duplicate room names are not represented here: they are
/// per-name [`RoomCreation::Duplicate`](crate::allocator::RoomCreation)
/// outcomes and never abort a creation batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// Input had the wrong shape, e.g. an empty room-name batch.
    #[error("list of room names can not be empty")]
    InvalidArgument,

    /// No room with the given name exists.
    #[error("no room named '{0}'")]
    RoomNotFound(String),

    /// No person with the given name exists among fellows or staff.
    #[error("no person named '{0}'")]
    PersonNotFound(String),

    /// The target room has no free space.
    #[error("room '{0}' is already full")]
    CapacityExceeded(String),

    /// The person's role cannot hold the target room kind.
    #[error("staff can not be allocated a living space")]
    InvalidTransfer,
}
