//! Unified error type.

use crate::store::StoreError;

/// Infrastructure failures surfaced by the binaries.
///
/// Application-level failures (404, 502, ...) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type covers
/// binding a port, accepting connections and loading the record store.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("record store: {0}")]
    Store(#[from] StoreError),
}
