//! HTTP helpers shared by the provider clients and the page fetcher.

use anyhow::Result;

/// Characters of an error body quoted back in the error message
const ERROR_BODY_CHARS: usize = 300;

/// Extension trait for `reqwest::Response` to handle common error patterns.
#[async_trait::async_trait]
pub trait ResponseExt {
    /// Ensure the response status is successful, returning an error with details if not.
    ///
    /// # Errors
    ///
    /// Returns an error if the response status is not successful (2xx),
    /// including the status code and the start of the response body.
    async fn ensure_success(self, api_name: &str) -> Result<Self>
    where
        Self: Sized;
}

#[async_trait::async_trait]
impl ResponseExt for reqwest::Response {
    async fn ensure_success(self, api_name: &str) -> Result<Self> {
        let status = self.status();
        if !status.is_success() {
            let body = self.text().await.unwrap_or_default();
            anyhow::bail!("{api_name} API error ({status}): {}", error_excerpt(&body));
        }
        Ok(self)
    }
}

/// Collapse whitespace and cut long bodies (HTML error pages) down to size
fn error_excerpt(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= ERROR_BODY_CHARS {
        return flat;
    }
    let mut excerpt: String = flat.chars().take(ERROR_BODY_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}
