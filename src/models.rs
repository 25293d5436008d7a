use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An artifact coordinate: `group:name:version`.
///
/// Equality, hashing and ordering all follow the canonical string form, so
/// `com.a:x:1` sorts before `com:x:1` exactly as the display ids do in a report.
#[derive(Debug, Clone)]
pub struct Coordinate {
    pub group: String,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("expected `group:name:version`, got {0:?}")]
    Malformed(String),
    #[error("{0:?} cannot be used as a repository path segment")]
    UnsafeSegment(String),
}

/// Rejects anything that could step outside a repository layout.
fn check_segment(part: &str) -> Result<(), CoordinateError> {
    if part.is_empty()
        || part.contains(['/', '\\', ':'])
        || part.contains("..")
        || part.chars().any(char::is_control)
    {
        return Err(CoordinateError::UnsafeSegment(part.to_string()));
    }
    Ok(())
}

impl Coordinate {
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Every part must be usable as a path segment of a repository layout.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        check_segment(&self.group)?;
        check_segment(&self.name)?;
        check_segment(&self.version)
    }

    /// Relative path of this artifact's POM inside a Maven repository.
    pub fn pom_path(&self) -> Result<String, CoordinateError> {
        self.validate()?;
        Ok(format!(
            "{}/{}/{}/{}-{}.pom",
            self.group.replace('.', "/"),
            self.name,
            self.version,
            self.name,
            self.version
        ))
    }

    fn canonical_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.group
            .bytes()
            .chain(std::iter::once(b':'))
            .chain(self.name.bytes())
            .chain(std::iter::once(b':'))
            .chain(self.version.bytes())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, name, version]
                if !group.is_empty() && !name.is_empty() && !version.is_empty() =>
            {
                let coordinate = Coordinate::new(*group, *name, *version);
                coordinate.validate()?;
                Ok(coordinate)
            }
            _ => Err(CoordinateError::Malformed(s.to_string())),
        }
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bytes().eq(other.canonical_bytes())
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.canonical_bytes() {
            state.write_u8(b);
        }
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_bytes().cmp(other.canonical_bytes())
    }
}

/// A license entry as declared in a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: String,
}

impl License {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One row of the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,
    pub licenses: Vec<License>,
    pub source: LicenseSource,
}

/// Where a row's license list came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseSource {
    /// Declared directly in the dependency's own descriptor.
    Descriptor,
    /// Inherited from the named ancestor in the parent chain.
    Parent(String),
    /// Assigned by a group override.
    Override,
    /// The chain ended without any license declaration.
    Missing,
    /// Resolution stopped early; the reason is kept for the report.
    Unresolved(String),
}

impl std::fmt::Display for LicenseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseSource::Descriptor => write!(f, "descriptor"),
            LicenseSource::Parent(id) => write!(f, "parent {}", id),
            LicenseSource::Override => write!(f, "override"),
            LicenseSource::Missing => write!(f, "missing"),
            LicenseSource::Unresolved(reason) => write!(f, "unresolved: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let c: Coordinate = "com.example:lib:1.0".parse().unwrap();
        assert_eq!(c.group, "com.example");
        assert_eq!(c.name, "lib");
        assert_eq!(c.version, "1.0");
        assert_eq!(c.to_string(), "com.example:lib:1.0");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("com.example:lib".parse::<Coordinate>().is_err());
        assert!("a:b:c:d".parse::<Coordinate>().is_err());
        assert!("a::1".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_ordering_follows_canonical_string() {
        // Field-wise ordering would put `com` before `com.a`; the string form does not.
        let dotted = Coordinate::new("com.a", "x", "1");
        let short = Coordinate::new("com", "x", "1");
        assert!(dotted < short);
        assert_eq!(
            dotted.cmp(&short),
            dotted.to_string().cmp(&short.to_string())
        );
    }

    #[test]
    fn test_pom_path() {
        let c = Coordinate::new("org.apache.commons", "commons-lang3", "3.12.0");
        assert_eq!(
            c.pom_path().unwrap(),
            "org/apache/commons/commons-lang3/3.12.0/commons-lang3-3.12.0.pom"
        );
    }

    #[test]
    fn test_path_traversal_rejected() {
        for c in [
            Coordinate::new("org.example", "lib", "../../../etc/passwd"),
            Coordinate::new("org.example", "lib/../x", "1.0"),
            Coordinate::new("org..example", "lib", "1.0"),
            Coordinate::new("org.example", "lib", "1.0\\..\\x"),
        ] {
            assert!(matches!(
                c.pom_path(),
                Err(CoordinateError::UnsafeSegment(_))
            ));
        }
        assert!("org.example:lib:..".parse::<Coordinate>().is_err());
    }
}
