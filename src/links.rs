//! WhatsApp deep links.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::catalog::ProductRecord;
use crate::config::SiteConfig;

/// Everything `encodeURIComponent` escapes: all but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const GENERAL_MESSAGE: &str = "Hi! I'm interested in learning more about your premium Android TV boxes. \
Can you help me choose the right one for my needs?";

pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

#[derive(Debug, Clone)]
pub struct InquiryLinks {
    base: String,
    number: String,
}

impl InquiryLinks {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            base: config.whatsapp_base.trim_end_matches('/').to_owned(),
            number: config.whatsapp_number.clone(),
        }
    }

    pub fn general(&self) -> String {
        self.with_message(GENERAL_MESSAGE)
    }

    pub fn for_product(&self, product: &ProductRecord) -> String {
        self.with_message(&format!(
            "Hi! I'm interested in the {} ({}). Can you provide more details about this product and current availability?",
            product.name, product.price
        ))
    }

    /// `None` when no product has that id; callers treat that as a no-op.
    pub fn for_product_id(&self, catalog: &[ProductRecord], id: &str) -> Option<String> {
        catalog.iter().find(|p| p.id == id).map(|p| self.for_product(p))
    }

    fn with_message(&self, message: &str) -> String {
        format!("{}/{}?text={}", self.base, self.number, encode_uri_component(message))
    }
}

/// Opens `url` in a new browsing context.
#[cfg(target_arch = "wasm32")]
pub fn open_in_new_context(url: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.open_with_url_and_target(url, "_blank") {
        log::warn!("window.open failed: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_in_new_context(ctx: &egui::Context, url: &str) {
    ctx.open_url(egui::OpenUrl::new_tab(url));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_catalog;
    use url::Url;

    fn links() -> InquiryLinks {
        InquiryLinks::new(&SiteConfig::default())
    }

    fn decoded_text(link: &str) -> String {
        let url = Url::parse(link).expect("link should parse");
        let query = url.query().expect("link has a query");
        let encoded = query.strip_prefix("text=").expect("only a text parameter");
        percent_encoding::percent_decode_str(encoded)
            .decode_utf8()
            .unwrap()
            .into_owned()
    }

    #[test]
    fn matches_encode_uri_component() {
        assert_eq!(
            encode_uri_component("Hi! I'm in (AED 849.00) & more?"),
            "Hi!%20I'm%20in%20(AED%20849.00)%20%26%20more%3F"
        );
        assert_eq!(encode_uri_component("2nd Gen/£"), "2nd%20Gen%2F%C2%A3");
    }

    #[test]
    fn general_link_is_valid() {
        let link = links().general();
        assert!(link.starts_with("https://wa.me/971501234567?text=Hi!%20I'm%20interested"));
        let url = Url::parse(&link).unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/971501234567");
        assert_eq!(decoded_text(&link), GENERAL_MESSAGE);
        assert!(!link.contains(' '));
    }

    #[test]
    fn product_link_mentions_name_and_price() {
        let catalog = fallback_catalog();
        let link = links().for_product_id(&catalog, "box_002").unwrap();
        let text = decoded_text(&link);
        assert!(text.contains("Xiaomi Mi Box S (2nd Gen)"));
        assert!(text.contains("AED 185.00"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn unknown_product_yields_nothing() {
        assert!(links().for_product_id(&fallback_catalog(), "box_404").is_none());
    }

    #[test]
    fn trailing_slash_in_base_is_tolerated() {
        let cfg = SiteConfig {
            whatsapp_base: "https://wa.me/".to_owned(),
            ..SiteConfig::default()
        };
        assert!(InquiryLinks::new(&cfg).general().starts_with("https://wa.me/971501234567?text="));
    }
}
