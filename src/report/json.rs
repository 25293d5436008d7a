use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Dependency;

/// Serialize the rows; the output is byte-identical for identical rows.
pub fn to_json(deps: &[Dependency]) -> Result<String> {
    Ok(serde_json::to_string_pretty(deps)?)
}

/// Print the JSON report to stdout, or write it to `output` when given.
pub fn render(deps: &[Dependency], output: Option<&Path>) -> Result<()> {
    let json = to_json(deps)?;
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{License, LicenseSource};

    #[test]
    fn test_row_shape() {
        let deps = vec![Dependency {
            id: "com.example:lib:1.0".to_string(),
            licenses: vec![License::new("MIT", "https://opensource.org/licenses/MIT")],
            source: LicenseSource::Descriptor,
        }];

        let value: serde_json::Value = serde_json::from_str(&to_json(&deps).unwrap()).unwrap();
        assert_eq!(value[0]["id"], "com.example:lib:1.0");
        assert_eq!(value[0]["licenses"][0]["name"], "MIT");
        assert_eq!(
            value[0]["licenses"][0]["url"],
            "https://opensource.org/licenses/MIT"
        );
        assert_eq!(value[0]["source"], "descriptor");
    }

    #[test]
    fn test_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("licenses.json");
        render(&[], Some(&out)).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "[]\n");
    }
}
