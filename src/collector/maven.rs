use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use super::DeclaredArtifact;
use crate::descriptor::{self, DeclaredDependency, Descriptor};

const DEFAULT_SCOPE: &str = "compile";

/// Property interpolation gives up after this many rounds of nested `${...}`.
const MAX_INTERPOLATION_PASSES: usize = 8;

/// Parse a project's `pom.xml` into `(scope, artifact)` pairs.
///
/// Placeholders are expanded from `<properties>` and the project's own
/// coordinates; anything left unexpanded is kept verbatim. A dependency that
/// omits its version or scope takes it from `<dependencyManagement>`.
pub fn parse_pom(path: &Path) -> Result<Vec<(String, DeclaredArtifact)>> {
    let content = std::fs::read_to_string(path)?;
    let pom = descriptor::parse(&content).with_context(|| format!("parsing {}", path.display()))?;
    scoped_dependencies(&pom)
}

fn scoped_dependencies(pom: &Descriptor) -> Result<Vec<(String, DeclaredArtifact)>> {
    let properties = project_properties(pom);
    let placeholder = Regex::new(r"\$\{([^}]+)\}")?;
    let expand = |d: &DeclaredDependency| DeclaredDependency {
        group_id: interpolate(&placeholder, &d.group_id, &properties),
        artifact_id: interpolate(&placeholder, &d.artifact_id, &properties),
        version: d
            .version
            .as_deref()
            .map(|v| interpolate(&placeholder, v, &properties)),
        scope: d.scope.clone().filter(|s| !s.is_empty()),
    };

    let managed: HashMap<(String, String), DeclaredDependency> = pom
        .managed_dependencies
        .iter()
        .map(&expand)
        .map(|d| ((d.group_id.clone(), d.artifact_id.clone()), d))
        .collect();

    let deps = pom
        .dependencies
        .iter()
        .filter(|d| !d.artifact_id.is_empty())
        .map(|d| {
            let mut dep = expand(d);
            if let Some(pinned) = managed.get(&(dep.group_id.clone(), dep.artifact_id.clone())) {
                if dep.version.as_deref().map_or(true, str::is_empty) {
                    dep.version = pinned.version.clone();
                }
                if dep.scope.is_none() {
                    dep.scope = pinned.scope.clone();
                }
            }
            let scope = dep.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string());
            let artifact = DeclaredArtifact {
                group: dep.group_id,
                name: dep.artifact_id,
                version: dep.version,
            };
            (scope, artifact)
        })
        .collect();

    Ok(deps)
}

fn project_properties(pom: &Descriptor) -> HashMap<String, String> {
    let mut properties = pom.properties.clone();

    let version = pom
        .version
        .clone()
        .or_else(|| pom.parent.as_ref().map(|p| p.version.clone()));
    let group = pom
        .group_id
        .clone()
        .or_else(|| pom.parent.as_ref().map(|p| p.group.clone()));

    if let Some(version) = version {
        for key in ["project.version", "pom.version", "version"] {
            properties.entry(key.to_string()).or_insert_with(|| version.clone());
        }
    }
    if let Some(group) = group {
        for key in ["project.groupId", "pom.groupId", "groupId"] {
            properties.entry(key.to_string()).or_insert_with(|| group.clone());
        }
    }
    if let Some(artifact) = &pom.artifact_id {
        for key in ["project.artifactId", "pom.artifactId", "artifactId"] {
            properties.entry(key.to_string()).or_insert_with(|| artifact.clone());
        }
    }
    if let Some(parent) = &pom.parent {
        properties
            .entry("project.parent.version".to_string())
            .or_insert_with(|| parent.version.clone());
    }

    properties
}

fn interpolate(placeholder: &Regex, value: &str, properties: &HashMap<String, String>) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_INTERPOLATION_PASSES {
        let next = placeholder
            .replace_all(&current, |caps: &Captures| {
                properties
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}
