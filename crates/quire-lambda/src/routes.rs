use crate::error::ApiError;

pub mod generate;

/// Fallback for every method and path other than the generate endpoint.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
