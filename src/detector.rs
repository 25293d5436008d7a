use std::path::{Path, PathBuf};

/// A build file the project model knows how to read.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildFile {
    Pom(PathBuf),
    GradleScript(PathBuf),
    GradleLockfile(PathBuf),
}

/// Scan a project directory for supported build files.
pub fn detect_build_files(path: &Path) -> Vec<BuildFile> {
    let mut files = Vec::new();

    let pom = path.join("pom.xml");
    if pom.exists() {
        files.push(BuildFile::Pom(pom));
    }

    for script in ["build.gradle", "build.gradle.kts"] {
        let script = path.join(script);
        if script.exists() {
            files.push(BuildFile::GradleScript(script));
        }
    }

    let lockfile = path.join("gradle.lockfile");
    if lockfile.exists() {
        files.push(BuildFile::GradleLockfile(lockfile));
    }

    files
}
