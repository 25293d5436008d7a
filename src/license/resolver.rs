use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use super::overrides::LicenseOverrides;
use crate::descriptor::Descriptor;
use crate::models::{Coordinate, License, LicenseSource};
use crate::registry::{RetrievalError, Retriever};

/// Outcome of resolving one coordinate's licenses.
///
/// Every variant other than `Override`, `Declared` and `Inherited` ends up as an
/// empty license list in the report.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Override(License),
    Declared(Vec<License>),
    Inherited { from: Coordinate, licenses: Vec<License> },
    NotDeclared,
    Failed { coordinate: Coordinate, error: RetrievalError },
    Cycle { coordinate: Coordinate },
    DepthExceeded { depth: usize },
}

impl Resolution {
    pub fn licenses(&self) -> Vec<License> {
        match self {
            Resolution::Override(license) => vec![license.clone()],
            Resolution::Declared(licenses) | Resolution::Inherited { licenses, .. } => {
                licenses.clone()
            }
            _ => Vec::new(),
        }
    }

    pub fn source(&self) -> LicenseSource {
        match self {
            Resolution::Override(_) => LicenseSource::Override,
            Resolution::Declared(_) => LicenseSource::Descriptor,
            Resolution::Inherited { from, .. } => LicenseSource::Parent(from.to_string()),
            Resolution::NotDeclared => LicenseSource::Missing,
            Resolution::Failed { coordinate, error } => {
                LicenseSource::Unresolved(format!("{}: {}", coordinate, error))
            }
            Resolution::Cycle { coordinate } => {
                LicenseSource::Unresolved(format!("parent cycle at {}", coordinate))
            }
            Resolution::DepthExceeded { depth } => {
                LicenseSource::Unresolved(format!("parent chain deeper than {}", depth))
            }
        }
    }
}

/// Walks descriptors and their parents until a license list turns up.
pub struct LicenseResolver<'a> {
    retriever: &'a Retriever,
    overrides: &'a LicenseOverrides,
    max_depth: usize,
}

impl<'a> LicenseResolver<'a> {
    pub fn new(retriever: &'a Retriever, overrides: &'a LicenseOverrides, max_depth: usize) -> Self {
        Self {
            retriever,
            overrides,
            max_depth,
        }
    }

    /// Retrieve `coordinate`'s descriptor and resolve its licenses.
    pub async fn resolve(&self, coordinate: &Coordinate) -> Resolution {
        let descriptor = match self.retriever.resolve(coordinate).await {
            Ok(d) => d,
            Err(error) => {
                warn!(%coordinate, %error, "could not retrieve descriptor");
                return Resolution::Failed {
                    coordinate: coordinate.clone(),
                    error,
                };
            }
        };

        let mut visited = HashSet::from([coordinate.clone()]);
        self.resolve_licenses(coordinate, descriptor, &mut visited)
            .await
    }

    /// Resolve licenses starting from an already retrieved descriptor.
    ///
    /// Order of precedence at each hop: group override, declared licenses,
    /// then the parent. `visited` must already hold `coordinate`; each parent
    /// is added before it is fetched and a parent that is already present ends
    /// the walk.
    pub async fn resolve_licenses(
        &self,
        coordinate: &Coordinate,
        descriptor: Arc<Descriptor>,
        visited: &mut HashSet<Coordinate>,
    ) -> Resolution {
        let mut current = coordinate.clone();
        let mut descriptor = descriptor;
        let mut hops = 0;

        loop {
            let group = descriptor.group_id.as_deref().unwrap_or(&current.group);
            if let Some(license) = self.overrides.lookup(group) {
                return Resolution::Override(license.clone());
            }

            if !descriptor.licenses.is_empty() {
                let licenses = descriptor.licenses.clone();
                return if hops == 0 {
                    Resolution::Declared(licenses)
                } else {
                    Resolution::Inherited {
                        from: current,
                        licenses,
                    }
                };
            }

            let Some(parent) = descriptor.parent.clone() else {
                debug!(%coordinate, at = %current, "no licenses declared and no parent");
                return Resolution::NotDeclared;
            };

            if !visited.insert(parent.clone()) {
                warn!(%coordinate, %parent, "parent chain revisits a descriptor");
                return Resolution::Cycle { coordinate: parent };
            }

            if hops >= self.max_depth {
                warn!(%coordinate, depth = self.max_depth, "parent chain too deep");
                return Resolution::DepthExceeded {
                    depth: self.max_depth,
                };
            }

            descriptor = match self.retriever.resolve(&parent).await {
                Ok(d) => d,
                Err(error) => {
                    warn!(%coordinate, %parent, %error, "could not retrieve parent descriptor");
                    return Resolution::Failed {
                        coordinate: parent,
                        error,
                    };
                }
            };
            current = parent;
            hops += 1;
        }
    }
}
