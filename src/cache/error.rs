/// Errors returned synchronously by cache operations.
///
/// Only validation can fail; every operation on a valid key and value succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("key is blank or absent")]
    InvalidKey,
    #[error("value is blank or absent")]
    InvalidValue,
}
