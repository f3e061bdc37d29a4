use thiserror::Error;

/// Errors returned when operating on a [`Table`](crate::Table).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// The requested key has no entry in the table.
    #[error("key not found")]
    KeyNotFound,

    /// A bucket index was requested outside `[0, bucket_count())`.
    #[error("bucket index {index} out of range (bucket_count = {bucket_count})")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The table's active logical bucket count at the time of the call.
        bucket_count: usize,
    },

    /// A bucket-array resize (split or merge) could not allocate memory.
    ///
    /// The table is left exactly as it was before the operation that
    /// triggered the resize: no nodes are lost or duplicated, and `i`, `p`,
    /// `bucket_count` and `capacity` are unchanged.
    #[error("allocation failure while resizing bucket array")]
    AllocationFailure,
}

/// Convenience alias matching the error type returned by [`Table`](crate::Table) operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
