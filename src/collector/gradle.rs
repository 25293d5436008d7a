use std::path::Path;

use anyhow::Result;
use regex::Regex;

use super::DeclaredArtifact;

/// Configuration keywords recognised in Gradle build scripts.
const CONFIGURATIONS: &str = "implementation|api|compileOnly|runtimeOnly|testImplementation|\
testRuntimeOnly|androidTestImplementation|annotationProcessor|kapt|compile|runtime|testCompile";

/// Parse `build.gradle` or `build.gradle.kts` with regex.
///
/// Returns `(configuration, artifact)` pairs in declaration order.
pub fn parse_build_script(path: &Path) -> Result<Vec<(String, DeclaredArtifact)>> {
    let content = std::fs::read_to_string(path)?;
    parse_build_script_str(&content)
}

fn parse_build_script_str(content: &str) -> Result<Vec<(String, DeclaredArtifact)>> {
    let mut deps = Vec::new();

    // implementation 'group:artifact:version'
    // implementation("group:artifact:version")
    let re_shorthand = Regex::new(&format!(
        r#"(?m)^\s*({})\s*\(?\s*['"]([^'"]+)['"]"#,
        CONFIGURATIONS
    ))?;

    for caps in re_shorthand.captures_iter(content) {
        if let Some(artifact) = parse_notation(&caps[2]) {
            deps.push((caps[1].to_string(), artifact));
        }
    }

    // implementation group: 'com.example', name: 'foo', version: '1.0'
    let re_map = Regex::new(&format!(
        r#"(?m)^\s*({})\s*\(?\s*group\s*[:=]\s*['"]([^'"]+)['"]\s*,\s*name\s*[:=]\s*['"]([^'"]+)['"](?:\s*,\s*version\s*[:=]\s*['"]([^'"]+)['"])?"#,
        CONFIGURATIONS
    ))?;

    for caps in re_map.captures_iter(content) {
        deps.push((
            caps[1].to_string(),
            DeclaredArtifact {
                group: caps[2].to_string(),
                name: caps[3].to_string(),
                version: caps.get(4).map(|v| v.as_str().to_string()),
            },
        ));
    }

    Ok(deps)
}

/// Split `group:name[:version[:classifier]][@ext]`.
fn parse_notation(notation: &str) -> Option<DeclaredArtifact> {
    let notation = notation.split('@').next().unwrap_or(notation);
    let mut parts = notation.split(':');
    let group = parts.next().filter(|g| !g.is_empty())?;
    let name = parts.next().filter(|n| !n.is_empty())?;
    let version = parts.next().filter(|v| !v.is_empty());

    Some(DeclaredArtifact {
        group: group.to_string(),
        name: name.to_string(),
        version: version.map(str::to_string),
    })
}

/// Parse `gradle.lockfile`, format: `group:artifact:version=conf1,conf2`.
pub fn parse_lockfile(path: &Path) -> Result<Vec<(String, DeclaredArtifact)>> {
    let content = std::fs::read_to_string(path)?;
    parse_lockfile_str(&content)
}

fn parse_lockfile_str(content: &str) -> Result<Vec<(String, DeclaredArtifact)>> {
    let re = Regex::new(r"^([^:=\s]+):([^:=\s]+):([^=\s]+)=(.*)$")?;
    let mut deps = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(caps) = re.captures(line) {
            for configuration in caps[4].split(',').map(str::trim).filter(|c| !c.is_empty()) {
                deps.push((
                    configuration.to_string(),
                    DeclaredArtifact {
                        group: caps[1].to_string(),
                        name: caps[2].to_string(),
                        version: Some(caps[3].to_string()),
                    },
                ));
            }
        }
    }

    Ok(deps)
}
