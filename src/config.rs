//! Environment-provided defaults.
//!
//! Values come from the process environment, with a `.env` file in the working
//! directory loaded first. Command-line flags override them.

use std::path::PathBuf;

use crate::io::sitemap::DEFAULT_DOCS_URL;

pub const DOCS_URL_VAR: &str = "NATIVES_DOCS_URL";
pub const COMPAT_FILE_VAR: &str = "NATIVES_COMPAT_FILE";
pub const DEFAULT_COMPAT_FILE: &str = "natives_global_client_compat.lua";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the documentation site, used for sitemap links.
    pub docs_url: String,
    /// Default compatibility file for `compat --in` / `--out`.
    pub compat_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docs_url: DEFAULT_DOCS_URL.to_string(),
            compat_file: PathBuf::from(DEFAULT_COMPAT_FILE),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup; empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            docs_url: get(DOCS_URL_VAR).unwrap_or(defaults.docs_url),
            compat_file: get(COMPAT_FILE_VAR).map(PathBuf::from).unwrap_or(defaults.compat_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn variables_override_defaults() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(DOCS_URL_VAR, "https://example.test/natives/"), (COMPAT_FILE_VAR, "  ")]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(settings.docs_url, "https://example.test/natives/");
        assert_eq!(settings.compat_file, PathBuf::from(DEFAULT_COMPAT_FILE));
    }
}
