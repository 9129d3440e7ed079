use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{controller::DEFAULT_PREFETCH_SCREENS, layout::RowLayout, plural::PluralForms};

/// Tunables for a reviews screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewsConfig {
    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Line cap applied to freshly loaded reviews
    #[serde(default = "default_collapsed_max_lines")]
    pub collapsed_max_lines: u32,
    /// How many screens before the end of content the next page is requested
    #[serde(default = "default_prefetch_screens")]
    pub prefetch_screens: f64,
    /// Give up on a page fetch after this many seconds. No limit when unset.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default)]
    pub plural_forms: PluralForms,
    #[serde(default)]
    pub row_layout: RowLayout,
}

fn default_page_size() -> u32 {
    20
}

fn default_collapsed_max_lines() -> u32 {
    3
}

fn default_prefetch_screens() -> f64 {
    DEFAULT_PREFETCH_SCREENS
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            collapsed_max_lines: default_collapsed_max_lines(),
            prefetch_screens: default_prefetch_screens(),
            fetch_timeout_secs: None,
            plural_forms: PluralForms::default(),
            row_layout: RowLayout::default(),
        }
    }
}

impl ReviewsConfig {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let cfg: ReviewsConfig = serde_json::from_str(&content)
            .context("Failed to parse reviews config")
            .inspect_err(|e| {
                error!("Failed to parse reviews config: {:#}", e);
            })?;
        cfg.validate()?;
        debug!(?cfg, "Loaded reviews config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.page_size > 0, "page_size must be greater than zero");
        ensure!(
            self.collapsed_max_lines > 0,
            "collapsed_max_lines must be greater than zero (0 means unlimited)"
        );
        ensure!(
            self.prefetch_screens.is_finite() && self.prefetch_screens >= 0.0,
            "prefetch_screens must be a non-negative number, got {}",
            self.prefetch_screens
        );
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn write_file(path: &Path, content: &str) {
        std::fs::write(path, content).expect("write file");
    }

    #[test]
    fn load_from_path_fills_defaults() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("reviews.json");
        write_file(&cfg_path, r#"{ "page_size": 10, "fetch_timeout_secs": 5 }"#);

        let cfg = ReviewsConfig::load_from_path(&cfg_path).expect("load config");
        assert_eq!(cfg.page_size, 10);
        assert_eq!(cfg.collapsed_max_lines, 3);
        assert_eq!(cfg.prefetch_screens, 2.5);
        assert_eq!(cfg.fetch_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.plural_forms, PluralForms::default());
    }

    #[test]
    fn custom_forms_and_partial_layout() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("reviews.json");
        write_file(
            &cfg_path,
            r#"{
                "plural_forms": { "one": "review", "few": "reviews", "many": "reviews" },
                "row_layout": { "text_line_height": 18.0 }
            }"#,
        );

        let cfg = ReviewsConfig::load_from_path(&cfg_path).expect("load config");
        assert_eq!(cfg.plural_forms.one, "review");
        assert_eq!(cfg.row_layout.text_line_height, 18.0);
        assert_eq!(cfg.row_layout.avatar_size, RowLayout::default().avatar_size);
    }

    #[test]
    fn rejects_zero_page_size() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("reviews.json");
        write_file(&cfg_path, r#"{ "page_size": 0 }"#);

        let err = ReviewsConfig::load_from_path(&cfg_path).unwrap_err();
        assert!(format!("{err:#}").contains("page_size"));
    }

    #[test]
    fn rejects_zero_collapsed_lines() {
        let cfg = ReviewsConfig { collapsed_max_lines: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = ReviewsConfig::load_from_path(dir.path().join("nope.json")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read"));
    }
}
