use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{PomSource, RetrievalError};
use crate::models::{Coordinate, CoordinateError};

const USER_AGENT: &str = concat!("pom-licenses/", env!("CARGO_PKG_VERSION"));

/// A remote Maven repository such as Maven Central or Google's Maven repository.
pub struct MavenRepository {
    client: Client,
    base_url: String,
}

impl MavenRepository {
    /// `client` carries the per-request timeout; `base_url` is the repository root.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn pom_url(&self, coordinate: &Coordinate) -> Result<String, CoordinateError> {
        Ok(format!("{}/{}", self.base_url, coordinate.pom_path()?))
    }
}

#[async_trait]
impl PomSource for MavenRepository {
    async fn fetch_pom(&self, coordinate: &Coordinate) -> Result<String, RetrievalError> {
        let url = self.pom_url(coordinate)?;

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|err| RetrievalError::Transport(format!("{}: {}", url, err)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RetrievalError::NotFound(coordinate.to_string())),
            status if !status.is_success() => Err(RetrievalError::Transport(format!(
                "{} returned {}",
                url, status
            ))),
            _ => response
                .text()
                .await
                .map_err(|err| RetrievalError::Transport(format!("{}: {}", url, err))),
        }
    }
}
