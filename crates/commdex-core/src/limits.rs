//! Defaults and input validation limits

/// Maximum number of matches returned for one search (500)
pub const MAX_SEARCH_RESULTS: usize = 500;

/// Default ingestion batch size (250)
pub const DEFAULT_BATCH_SIZE: usize = 250;

/// Default search service port
pub const DEFAULT_PORT: u16 = 8077;

/// Default fetch service host
pub const DEFAULT_FETCH_HOST: &str = "localhost";

/// Language advertised when none is configured
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    ZeroBatchSize,
    EmptyFetchHost,
    ZeroFetchPort,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroBatchSize => write!(f, "Batch size must be a positive integer"),
            Self::EmptyFetchHost => write!(f, "Fetch host cannot be empty"),
            Self::ZeroFetchPort => write!(f, "Fetch port must be non-zero"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate an ingestion batch size
pub fn validate_batch_size(size: usize) -> Result<std::num::NonZeroUsize, ValidationError> {
    std::num::NonZeroUsize::new(size).ok_or(ValidationError::ZeroBatchSize)
}

/// Validate a fetch service host and port
pub fn validate_fetch_endpoint(host: &str, port: u16) -> Result<(), ValidationError> {
    if host.trim().is_empty() {
        return Err(ValidationError::EmptyFetchHost);
    }
    if port == 0 {
        return Err(ValidationError::ZeroFetchPort);
    }
    Ok(())
}
