// src/locale.rs

//! Translation of message keys into user-facing text.
//!
//! API problem details carry a key in `detail` (e.g. `error.case.not_found`);
//! tables live in `{locale.dir}/{language}.toml` as flat `key = "text"` pairs.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::LocaleConfig;

/// Messages for one language.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    language: String,
    entries: HashMap<String, String>,
}

impl Translations {
    pub fn new(language: impl Into<String>, entries: HashMap<String, String>) -> Self {
        Self {
            language: language.into(),
            entries,
        }
    }

    /// Load a translation table from a TOML file.
    pub fn load(language: &str, path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, String> = toml::from_str(&content)?;
        Ok(Self::new(language, entries))
    }

    /// Load the table for `language`, or an empty one if it is missing.
    pub fn load_or_empty(config: &LocaleConfig, language: &str) -> Self {
        let path = config.dir.join(format!("{language}.toml"));
        Self::load(language, &path).unwrap_or_else(|e| {
            log::debug!("No translations loaded from {:?}: {}", path, e);
            Self::new(language, HashMap::new())
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Text for `key`, or the key itself when untranslated.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Text shown to the user for a failed operation.
    pub fn notification(&self, error: &AppError) -> String {
        match error {
            AppError::Api(problem) => self.translate(problem.message_key()).to_string(),
            AppError::Status { status, .. } => self
                .entries
                .get(&format!("error.status.{status}"))
                .cloned()
                .unwrap_or_else(|| error.to_string()),
            AppError::NotAuthenticated => self.translate("error.not_authenticated").to_string(),
            AppError::SubmissionInFlight => {
                self.translate("error.submission_in_flight").to_string()
            }
            _ => error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProblemDetail;
    use tempfile::TempDir;

    fn translations() -> Translations {
        let mut entries = HashMap::new();
        entries.insert("error.case.not_found".to_string(), "Case not found".to_string());
        entries.insert("error.status.503".to_string(), "Service unavailable".to_string());
        Translations::new("en", entries)
    }

    #[test]
    fn test_translate_falls_back_to_key() {
        let t = translations();
        assert_eq!(t.translate("error.case.not_found"), "Case not found");
        assert_eq!(t.translate("error.unknown"), "error.unknown");
    }

    #[test]
    fn test_notification_for_problem_detail() {
        let t = translations();
        let error = AppError::Api(ProblemDetail {
            status: 404,
            detail: "error.case.not_found".into(),
            ..ProblemDetail::default()
        });
        assert_eq!(t.notification(&error), "Case not found");
    }

    #[test]
    fn test_notification_for_status() {
        let t = translations();
        let error = AppError::Status {
            status: 503,
            body: String::new(),
        };
        assert_eq!(t.notification(&error), "Service unavailable");
    }

    #[test]
    fn test_load_from_toml() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("ro.toml"),
            "\"error.case.not_found\" = \"Dosarul nu a fost găsit\"\n",
        )
        .unwrap();
        let config = LocaleConfig {
            dir: tmp.path().to_path_buf(),
            ..LocaleConfig::default()
        };

        let t = Translations::load_or_empty(&config, "ro");
        assert_eq!(t.language(), "ro");
        assert_eq!(t.translate("error.case.not_found"), "Dosarul nu a fost găsit");

        let missing = Translations::load_or_empty(&config, "en");
        assert_eq!(missing.translate("x"), "x");
    }
}
