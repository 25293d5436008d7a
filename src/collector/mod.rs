//! Coordinate collection: from build files to the set of artifacts to resolve.
//!
//! [`ProjectModel`] reads the project's build files into named dependency
//! groups (Maven scopes, Gradle configurations). [`collect`] turns a list of
//! group names into a deduplicated, ordered coordinate set.

use std::path::Path;

use anyhow::{bail, Result};
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::detector::{detect_build_files, BuildFile};
use crate::models::Coordinate;

pub mod gradle;
pub mod maven;

/// An artifact as written in a build file; the version may still be abstract.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredArtifact {
    pub group: String,
    pub name: String,
    pub version: Option<String>,
}

impl DeclaredArtifact {
    /// The concrete coordinate, or `None` when the version is missing or a placeholder.
    pub fn materialize(&self) -> Option<Coordinate> {
        let version = self.version.as_deref()?.trim();
        if version.is_empty() || version.contains('$') {
            return None;
        }
        if self.group.is_empty() || self.name.is_empty() || self.group.contains('$') {
            return None;
        }
        let coordinate = Coordinate::new(&self.group, &self.name, version);
        coordinate.validate().ok()?;
        Some(coordinate)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GroupError {
    #[error("no dependency group named {0:?}")]
    Missing(String),
    #[error("group {group:?} has no member with a concrete version (first: {artifact})")]
    Unresolvable { group: String, artifact: String },
}

/// Source of named dependency groups.
pub trait DependencyGraph {
    fn resolve_group(&self, name: &str) -> Result<Vec<Coordinate>, GroupError>;
}

/// Dependency groups read from a project's build files, in declaration order.
#[derive(Debug, Default)]
pub struct ProjectModel {
    groups: IndexMap<String, Vec<DeclaredArtifact>>,
}

impl ProjectModel {
    /// Read every supported build file under `path`.
    ///
    /// Fails when there is nothing to read or a build file cannot be parsed;
    /// individual groups are only judged later, in [`collect`].
    pub fn load(path: &Path) -> Result<Self> {
        let files = detect_build_files(path);
        if files.is_empty() {
            bail!(
                "no pom.xml, build.gradle or gradle.lockfile found in {}",
                path.display()
            );
        }

        let mut model = ProjectModel::default();
        for file in &files {
            let declared = match file {
                BuildFile::Pom(p) => maven::parse_pom(p)?,
                BuildFile::GradleScript(p) => gradle::parse_build_script(p)?,
                BuildFile::GradleLockfile(p) => gradle::parse_lockfile(p)?,
            };
            debug!(?file, dependencies = declared.len(), "read build file");
            for (group, artifact) in declared {
                model.add(group, artifact);
            }
        }

        Ok(model)
    }

    pub fn add(&mut self, group: impl Into<String>, artifact: DeclaredArtifact) {
        self.groups.entry(group.into()).or_default().push(artifact);
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

impl DependencyGraph for ProjectModel {
    fn resolve_group(&self, name: &str) -> Result<Vec<Coordinate>, GroupError> {
        let declared = self
            .groups
            .get(name)
            .ok_or_else(|| GroupError::Missing(name.to_string()))?;

        let mut resolved = Vec::with_capacity(declared.len());
        for artifact in declared {
            match artifact.materialize() {
                Some(coordinate) => resolved.push(coordinate),
                None => warn!(
                    group = %name,
                    artifact = %format!("{}:{}", artifact.group, artifact.name),
                    version = ?artifact.version,
                    "skipping dependency without a concrete coordinate"
                ),
            }
        }

        match declared.first() {
            Some(first) if resolved.is_empty() => Err(GroupError::Unresolvable {
                group: name.to_string(),
                artifact: format!("{}:{}", first.group, first.name),
            }),
            _ => Ok(resolved),
        }
    }
}

/// Collect the coordinates declared under `groups`, first-seen order, no duplicates.
///
/// Absent groups are skipped quietly, since the default group list names more
/// groups than any one project declares. Members without a concrete version
/// are dropped individually by [`DependencyGraph::resolve_group`].
pub fn collect<G>(graph: &G, groups: &[String]) -> IndexSet<Coordinate>
where
    G: DependencyGraph + ?Sized,
{
    let mut coordinates = IndexSet::new();

    for name in groups {
        match graph.resolve_group(name) {
            Ok(resolved) => coordinates.extend(resolved),
            Err(err @ GroupError::Missing(_)) => {
                debug!(group = %name, reason = %err, "skipping dependency group")
            }
            Err(err) => warn!(group = %name, reason = %err, "skipping dependency group"),
        }
    }

    coordinates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(group: &str, name: &str, version: Option<&str>) -> DeclaredArtifact {
        DeclaredArtifact {
            group: group.to_string(),
            name: name.to_string(),
            version: version.map(str::to_string),
        }
    }

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn model() -> ProjectModel {
        let mut model = ProjectModel::default();
        model.add("compile", artifact("org.b", "b", Some("1")));
        model.add("compile", artifact("org.a", "a", Some("1")));
        model.add("runtime", artifact("org.a", "a", Some("1")));
        model.add("runtime", artifact("org.c", "c", Some("2")));
        model.add("broken", artifact("org.d", "d", None));
        model.add("broken", artifact("org.e", "e", Some("1")));
        model.add("abstract", artifact("org.f", "f", Some("${f.version}")));
        model
    }

    #[test]
    fn test_empty_group_list() {
        assert!(collect(&model(), &[]).is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let ids: Vec<String> = collect(&model(), &groups(&["compile", "runtime"]))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, vec!["org.b:b:1", "org.a:a:1", "org.c:c:2"]);
    }

    #[test]
    fn test_unconcrete_members_are_skipped_individually() {
        let ids: Vec<String> = collect(&model(), &groups(&["nope", "broken", "abstract", "runtime"]))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, vec!["org.e:e:1", "org.a:a:1", "org.c:c:2"]);
    }

    #[test]
    fn test_resolve_group_errors() {
        let model = model();
        assert_eq!(
            model.resolve_group("nope"),
            Err(GroupError::Missing("nope".to_string()))
        );
        assert_eq!(
            model.resolve_group("broken"),
            Ok(vec![Coordinate::new("org.e", "e", "1")])
        );
        assert!(matches!(
            model.resolve_group("abstract"),
            Err(GroupError::Unresolvable { .. })
        ));
    }

    #[test]
    fn test_materialize() {
        assert_eq!(
            artifact("g", "n", Some("1.0")).materialize(),
            Some(Coordinate::new("g", "n", "1.0"))
        );
        assert_eq!(artifact("g", "n", None).materialize(), None);
        assert_eq!(artifact("g", "n", Some("${v}")).materialize(), None);
        assert_eq!(artifact("g", "n", Some("$v")).materialize(), None);
        assert_eq!(artifact("g", "n", Some("../1.0")).materialize(), None);
    }

    #[test]
    fn test_load_fails_without_build_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ProjectModel::load(dir.path()).is_err());
    }

    #[test]
    fn test_load_merges_build_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("build.gradle"),
            "dependencies {\n    implementation 'org.a:a:1'\n}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("gradle.lockfile"),
            "org.a:a:1=runtimeClasspath\norg.z:z:3=runtimeClasspath\n",
        )
        .unwrap();

        let model = ProjectModel::load(dir.path()).unwrap();
        let names: Vec<&str> = model.group_names().collect();
        assert_eq!(names, vec!["implementation", "runtimeClasspath"]);

        let ids: Vec<String> = collect(&model, &groups(&["implementation", "runtimeClasspath"]))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, vec!["org.a:a:1", "org.z:z:3"]);
    }

    #[test]
    fn test_compile_scope_keeps_managed_versions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pom.xml"),
            r#"<project>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.slf4j</groupId>
        <artifactId>slf4j-api</artifactId>
        <version>2.0.7</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>31.1-jre</version>
    </dependency>
    <dependency>
      <groupId>org.apache.commons</groupId>
      <artifactId>commons-lang3</artifactId>
      <version>3.12.0</version>
    </dependency>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
    </dependency>
    <dependency>
      <groupId>org.unmanaged</groupId>
      <artifactId>floating</artifactId>
    </dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();

        let model = ProjectModel::load(dir.path()).unwrap();
        let ids: Vec<String> = collect(&model, &groups(&["compile"]))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            ids,
            vec![
                "com.google.guava:guava:31.1-jre",
                "org.apache.commons:commons-lang3:3.12.0",
                "org.slf4j:slf4j-api:2.0.7",
            ]
        );
    }
}
