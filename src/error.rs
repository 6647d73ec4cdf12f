//! Error types for the `longmap` crate

/// Errors that could occur while building or filling a map
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MapError {
    /// The block is too small, or the overflow divisor too extreme, to hold at
    /// least one primary slot and one overflow slot.
    #[error(
        "A block of {size} bytes gives {primary_slots} primary and {overflow_slots} overflow \
         slots, at least one of each is needed"
    )]
    InvalidCapacity {
        size: u64,
        primary_slots: u64,
        overflow_slots: u64,
    },

    /// A colliding key needed an overflow slot and all of them are taken. The
    /// block has to be replaced by a larger one and refilled.
    #[error(
        "Out of overflow slots: {overflow_used} of {overflow_slots} in use \
         ({primary_slots} primary slots)"
    )]
    OutOfCapacity {
        primary_slots: u64,
        overflow_used: u64,
        overflow_slots: u64,
    },
}
