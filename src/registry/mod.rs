//! Descriptor retrieval: turning a [`Coordinate`] into a parsed [`Descriptor`].
//!
//! - [`local`] — reads POMs from a Maven local repository on disk.
//! - [`remote`] — fetches POMs from Maven repositories over HTTP.
//!
//! Sources only return raw text. [`Retriever`] parses it and, when enabled,
//! memoizes the outcome per coordinate for the rest of the run. Concurrent
//! lookups of the same coordinate share one fetch.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::descriptor::{self, Descriptor};
use crate::models::{Coordinate, CoordinateError};

pub mod local;
pub mod remote;

/// Why a descriptor could not be obtained. The resolver treats every variant the same.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    #[error("{0} not found in any repository")]
    NotFound(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed descriptor: {0}")]
    Malformed(String),
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

impl From<CoordinateError> for RetrievalError {
    fn from(err: CoordinateError) -> Self {
        RetrievalError::InvalidCoordinate(err.to_string())
    }
}

/// Anything that can produce the raw POM text for a coordinate.
#[async_trait]
pub trait PomSource: Send + Sync {
    async fn fetch_pom(&self, coordinate: &Coordinate) -> Result<String, RetrievalError>;
}

/// Ordered list of sources; the first one that has the POM wins.
#[derive(Default)]
pub struct RepositoryChain {
    sources: Vec<Box<dyn PomSource>>,
}

impl RepositoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl PomSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl PomSource for RepositoryChain {
    async fn fetch_pom(&self, coordinate: &Coordinate) -> Result<String, RetrievalError> {
        let mut first_failure = None;

        for source in &self.sources {
            match source.fetch_pom(coordinate).await {
                Ok(xml) => return Ok(xml),
                Err(RetrievalError::NotFound(_)) => {}
                Err(err) => {
                    debug!(%coordinate, error = %err, "repository failed, trying next");
                    first_failure.get_or_insert(err);
                }
            }
        }

        Err(first_failure.unwrap_or_else(|| RetrievalError::NotFound(coordinate.to_string())))
    }
}

type CachedDescriptor = Result<Arc<Descriptor>, RetrievalError>;

/// Fetches and parses descriptors, optionally memoizing them by coordinate.
pub struct Retriever {
    source: Box<dyn PomSource>,
    cache: Option<DashMap<Coordinate, Arc<OnceCell<CachedDescriptor>>>>,
}

impl Retriever {
    pub fn new(source: impl PomSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: None,
        }
    }

    /// Remember every outcome, failures included, for the lifetime of this retriever.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(DashMap::new());
        self
    }

    pub async fn resolve(&self, coordinate: &Coordinate) -> CachedDescriptor {
        let Some(cache) = &self.cache else {
            return self.fetch_and_parse(coordinate).await;
        };

        // The shard lock is released before awaiting; waiters park on the cell.
        let cell = Arc::clone(&cache.entry(coordinate.clone()).or_default());
        if cell.initialized() {
            debug!(%coordinate, "descriptor cache hit");
        }
        cell.get_or_init(|| self.fetch_and_parse(coordinate))
            .await
            .clone()
    }

    async fn fetch_and_parse(&self, coordinate: &Coordinate) -> CachedDescriptor {
        let xml = self.source.fetch_pom(coordinate).await?;
        descriptor::parse(&xml)
            .map(Arc::new)
            .map_err(|err| RetrievalError::Malformed(err.to_string()))
    }
}
