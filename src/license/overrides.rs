use std::collections::HashMap;

use serde::Deserialize;

use crate::models::License;

/// Group whose artifacts are uniformly Apache-2.0 but routinely omit `<licenses>`.
pub const ANDROID_SUPPORT_GROUP: &str = "com.android.support";

/// One `[[overrides]]` entry from the config file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OverrideRule {
    pub group: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Fixed license assignments keyed by exact group id.
#[derive(Debug, Clone)]
pub struct LicenseOverrides {
    by_group: HashMap<String, License>,
}

impl LicenseOverrides {
    pub fn from_rules(rules: &[OverrideRule]) -> Self {
        let by_group = rules
            .iter()
            .map(|r| (r.group.clone(), License::new(&r.name, &r.url)))
            .collect();
        Self { by_group }
    }

    pub fn lookup(&self, group: &str) -> Option<&License> {
        self.by_group.get(group)
    }
}

/// The built-in table: just the Android support libraries.
pub fn default_rules() -> Vec<OverrideRule> {
    vec![OverrideRule {
        group: ANDROID_SUPPORT_GROUP.to_string(),
        name: "Apache License 2.0".to_string(),
        url: "https://www.apache.org/licenses/LICENSE-2.0.txt".to_string(),
    }]
}

impl Default for LicenseOverrides {
    fn default() -> Self {
        Self::from_rules(&default_rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_android_support_only() {
        let overrides = LicenseOverrides::default();
        assert_eq!(
            overrides.lookup("com.android.support"),
            Some(&License::new(
                "Apache License 2.0",
                "https://www.apache.org/licenses/LICENSE-2.0.txt"
            ))
        );
        assert!(overrides.lookup("com.android.support.test").is_none());
        assert!(overrides.lookup("com.android").is_none());
    }
}
