//! Site-wide settings.
//!
//! Everything has a default, so the page can override just a few keys with an
//! inline `<script id="site-config" type="application/json">` block.

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Relative URL (web) or file path (native preview) of the catalog JSON.
    pub catalog_url: String,
    pub whatsapp_base: String,
    pub whatsapp_number: String,
    /// Cards shown in the featured grid.
    pub featured_count: usize,
    /// Catalog entries used for chart axis labels.
    pub chart_count: usize,
    pub resize_debounce_ms: u32,
    pub fade_in_threshold: f64,
    pub fade_in_root_margin: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            catalog_url: "android_tv_boxes.json".to_owned(),
            whatsapp_base: "https://wa.me".to_owned(),
            whatsapp_number: "971501234567".to_owned(),
            featured_count: 3,
            chart_count: 4,
            resize_debounce_ms: 250,
            fade_in_threshold: 0.1,
            fade_in_root_margin: "0px 0px -50px 0px".to_owned(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("site config is not valid JSON")
    }

    /// Native preview: reads `path` if it exists, defaults otherwise.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match Self::from_json(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    /// Reads the inline config block, falling back to defaults when it is
    /// missing or malformed.
    #[cfg(target_arch = "wasm32")]
    pub fn from_page(document: &web_sys::Document) -> Self {
        let Some(text) = document
            .get_element_by_id("site-config")
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };
        match Self::from_json(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("ignoring site config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = SiteConfig::from_json(r#"{ "whatsapp_number": "15550001111", "featured_count": 6 }"#)
            .unwrap();
        assert_eq!(cfg.whatsapp_number, "15550001111");
        assert_eq!(cfg.featured_count, 6);
        assert_eq!(cfg.catalog_url, "android_tv_boxes.json");
        assert_eq!(cfg.resize_debounce_ms, 250);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(SiteConfig::from_json("{ featured_count: 3 ").is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn missing_file_uses_defaults() {
        assert_eq!(
            SiteConfig::load_file("/definitely/not/here/site-config.json"),
            SiteConfig::default()
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn malformed_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("techvision-site-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ featured_count: 3 ").unwrap();
        let cfg = SiteConfig::load_file(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg, SiteConfig::default());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_overrides_apply() {
        let path = std::env::temp_dir().join(format!("techvision-site-config-ok-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "chart_count": 2 }"#).unwrap();
        let cfg = SiteConfig::load_file(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.chart_count, 2);
        assert_eq!(cfg.featured_count, 3);
    }
}
