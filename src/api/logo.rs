//! HEAD-probe against a third-party logo image service.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::http_client::build_api_http_client;
use super::{ApiError, LogoProbe};

const SERVICE: &str = "logo";

/// Checks logo URLs with `HEAD`; only HTTP 200 counts as present.
pub struct HttpLogoProbe {
    client: Client,
}

impl HttpLogoProbe {
    /// # Errors
    ///
    /// Returns [`ApiError`] if HTTP client construction fails.
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            client: build_api_http_client(SERVICE)?,
        })
    }
}

impl std::fmt::Debug for HttpLogoProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLogoProbe").finish_non_exhaustive()
    }
}

#[async_trait]
impl LogoProbe for HttpLogoProbe {
    #[tracing::instrument(skip(self), fields(service = SERVICE))]
    async fn exists(&self, url: &str) -> Result<bool, ApiError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| ApiError::transport(SERVICE, &e))?;
        let status = response.status().as_u16();
        debug!(status, "Logo probe answered");
        Ok(status == 200)
    }
}
