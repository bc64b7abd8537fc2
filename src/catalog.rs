//! Product catalog: the JSON document the page is built from, plus the
//! embedded fallback used whenever that document can't be had.

use anyhow::Context as _;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use gloo_net::http::Request;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    /// Already formatted for display, e.g. `AED 849.00`.
    pub price: String,
    pub image: String,
    pub metadata: ProductMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(rename = "OS")]
    pub os: String,
    #[serde(rename = "RAM")]
    pub ram: String,
    #[serde(rename = "Storage")]
    pub storage: String,
    #[serde(rename = "4K_Support")]
    pub supports_4k: bool,
    #[serde(rename = "Processor")]
    pub processor: String,
}

impl ProductRecord {
    /// First `words` words of the name, single-space joined.
    pub fn short_name(&self, words: usize) -> String {
        self.name.split_whitespace().take(words).collect::<Vec<_>>().join(" ")
    }

    pub fn resolution_badge(&self) -> &'static str {
        if self.metadata.supports_4k { "4K" } else { "HD" }
    }
}

impl ProductMetadata {
    /// `"Android 11 (Upgradable)"` -> `"Android 11"`.
    pub fn os_family(&self) -> String {
        self.os.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
    }
}

/// Outcome of a catalog load. Failures never reach the caller as errors;
/// they show up as `Fallback` so degraded mode can be reported.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLoad {
    Fetched(Vec<ProductRecord>),
    Fallback {
        products: Vec<ProductRecord>,
        reason: String,
    },
}

impl CatalogLoad {
    pub fn from_result(result: anyhow::Result<Vec<ProductRecord>>) -> Self {
        match result {
            Ok(products) => {
                log::info!("loaded {} catalog entries", products.len());
                CatalogLoad::Fetched(products)
            }
            Err(e) => {
                let reason = format!("{e:#}");
                log::error!("error loading product data, using fallback catalog: {reason}");
                CatalogLoad::Fallback {
                    products: fallback_catalog(),
                    reason,
                }
            }
        }
    }

    pub fn products(&self) -> &[ProductRecord] {
        match self {
            CatalogLoad::Fetched(products) | CatalogLoad::Fallback { products, .. } => products,
        }
    }

    pub fn into_products(self) -> Vec<ProductRecord> {
        match self {
            CatalogLoad::Fetched(products) | CatalogLoad::Fallback { products, .. } => products,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, CatalogLoad::Fallback { .. })
    }
}

pub fn parse_catalog(text: &str) -> anyhow::Result<Vec<ProductRecord>> {
    serde_json::from_str(text).context("catalog is not a valid product array")
}

static FALLBACK: Lazy<Vec<ProductRecord>> = Lazy::new(|| {
    fn record(
        id: &str,
        name: &str,
        price: &str,
        image: &str,
        (os, ram, storage, processor): (&str, &str, &str, &str),
    ) -> ProductRecord {
        ProductRecord {
            id: id.to_owned(),
            name: name.to_owned(),
            price: price.to_owned(),
            image: image.to_owned(),
            metadata: ProductMetadata {
                os: os.to_owned(),
                ram: ram.to_owned(),
                storage: storage.to_owned(),
                supports_4k: true,
                processor: processor.to_owned(),
            },
        }
    }

    vec![
        record(
            "box_001",
            "NVIDIA Shield TV Pro",
            "AED 849.00",
            "https://m.media-amazon.com/images/I/61dYAL8L79L._AC_SL1500_.jpg",
            ("Android 11 (Upgradable)", "3GB", "16GB", "Tegra X1+"),
        ),
        record(
            "box_002",
            "Xiaomi Mi Box S (2nd Gen)",
            "AED 185.00",
            "https://m.media-amazon.com/images/I/51f8W8zH9BL._AC_SL1500_.jpg",
            ("Google TV (Android 11)", "2GB", "8GB", "Quad-core Cortex-A55"),
        ),
        record(
            "box_003",
            "Strong LEAP-S3 4K",
            "AED 215.00",
            "https://m.media-amazon.com/images/I/61NlU6mP0uL._AC_SL1500_.jpg",
            ("Android 11", "2GB", "16GB", "Amlogic S905Y4"),
        ),
    ]
});

/// The three records shipped in the binary.
pub fn fallback_catalog() -> Vec<ProductRecord> {
    FALLBACK.clone()
}

/// Fetch the catalog over HTTP. A network error, a non-2xx status or a
/// malformed body all end up as [`CatalogLoad::Fallback`].
#[cfg(target_arch = "wasm32")]
pub async fn load_catalog(url: &str) -> CatalogLoad {
    CatalogLoad::from_result(fetch_catalog(url).await)
}

#[cfg(target_arch = "wasm32")]
async fn fetch_catalog(url: &str) -> anyhow::Result<Vec<ProductRecord>> {
    let resp = Request::get(url)
        .send()
        .await
        .with_context(|| format!("fetching {url}"))?;
    if !resp.ok() {
        anyhow::bail!("{url} answered HTTP {}", resp.status());
    }
    let text = resp.text().await.with_context(|| format!("reading {url}"))?;
    parse_catalog(&text)
}

/// Native counterpart of `load_catalog`, reading from disk.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_catalog_file(path: impl AsRef<std::path::Path>) -> CatalogLoad {
    let path = path.as_ref();
    let result = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))
        .and_then(|text| parse_catalog(&text));
    CatalogLoad::from_result(result)
}
