use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{PomSource, RetrievalError};
use crate::models::Coordinate;

/// A Maven local repository (`~/.m2/repository` layout).
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The user's default local repository, if a home directory is known.
    pub fn default_location() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".m2").join("repository"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PomSource for LocalRepository {
    async fn fetch_pom(&self, coordinate: &Coordinate) -> Result<String, RetrievalError> {
        let path = self.root.join(coordinate.pom_path()?);
        match tokio::fs::read_to_string(&path).await {
            Ok(xml) => Ok(xml),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(RetrievalError::NotFound(coordinate.to_string()))
            }
            Err(err) => Err(RetrievalError::Transport(format!(
                "{}: {}",
                path.display(),
                err
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_repository_layout() {
        let dir = tempfile::tempdir().unwrap();
        let pom_dir = dir.path().join("org/example/lib/1.0");
        std::fs::create_dir_all(&pom_dir).unwrap();
        std::fs::write(pom_dir.join("lib-1.0.pom"), "<project/>").unwrap();

        let repo = LocalRepository::new(dir.path());
        let xml = repo
            .fetch_pom(&Coordinate::new("org.example", "lib", "1.0"))
            .await
            .unwrap();
        assert_eq!(xml, "<project/>");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LocalRepository::new(dir.path());
        let err = repo
            .fetch_pom(&Coordinate::new("org.example", "absent", "1.0"))
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_traversal_outside_root_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("repo");
        std::fs::create_dir_all(root.join("org/example/lib")).unwrap();
        // A POM sitting next to the repository, reachable only through `..`.
        std::fs::write(dir.path().join("secret.pom"), "<project/>").unwrap();

        let repo = LocalRepository::new(&root);
        let err = repo
            .fetch_pom(&Coordinate::new("org.example", "lib", "../../../secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidCoordinate(_)));
    }
}
