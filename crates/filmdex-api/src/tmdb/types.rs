//! TMDB API response envelope types.

use serde::Deserialize;

use crate::http::ErrorEnvelope;

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

impl ErrorEnvelope for TmdbErrorResponse {
    fn summary(&self) -> String {
        format!(
            "code={}, message={}",
            self.status_code, self.status_message
        )
    }
}
