//! HTML fragments injected into the page: featured cards and the viewer's
//! info panel.

use std::fmt::Write as _;

use crate::catalog::ProductRecord;

pub const STAR_COUNT: usize = 5;
/// Every card shows the same rating; nothing in the catalog feeds it.
pub const STAR_RATING: usize = 4;

const STAR_PATH: &str = "M9.049 2.927c.3-.921 1.603-.921 1.902 0l1.07 3.292a1 1 0 00.95.69h3.462c.969 0 1.371 1.24.588 1.81l-2.8 2.034a1 1 0 00-.364 1.118l1.07 3.292c.3.921-.755 1.688-1.54 1.118l-2.8-2.034a1 1 0 00-1.175 0l-2.8 2.034c-.784.57-1.838-.197-1.539-1.118l1.07-3.292a1 1 0 00-.364-1.118L2.98 8.72c-.783-.57-.38-1.81.588-1.81h3.461a1 1 0 00.951-.69l1.07-3.292z";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Cards for the first `count` products.
pub fn featured_cards_html(products: &[ProductRecord], count: usize) -> String {
    let mut html = String::new();
    for product in products.iter().take(count) {
        write_card(&mut html, product);
    }
    html
}

fn write_card(html: &mut String, product: &ProductRecord) {
    let id = escape_html(&product.id);
    let name = escape_html(&product.name);
    let price = escape_html(&product.price);
    let image = escape_html(&product.image);
    let m = &product.metadata;

    // `write!` into a String cannot fail.
    let _ = write!(
        html,
        r#"<div class="product-card glass rounded-2xl p-6 cursor-pointer" data-product-id="{id}">
    <div class="relative mb-4">
        <img src="{image}" alt="{name}" class="w-full h-48 object-cover rounded-lg">
        <div class="absolute top-3 right-3">
            <span class="resolution-badge bg-green-500 text-white px-2 py-1 rounded-full text-xs font-semibold">{badge}</span>
        </div>
    </div>
    <h3 class="text-xl font-semibold mb-2 text-white">{name}</h3>
    <div class="flex justify-between items-center mb-3">
        <span class="text-2xl font-bold text-cyan-400">{price}</span>
        <div class="flex space-x-1">{stars}</div>
    </div>
    <div class="space-y-2 mb-4">
        {os_row}
        {ram_row}
        {storage_row}
    </div>
    <button class="w-full glass py-3 rounded-lg font-semibold hover:neon-border transition-all duration-300">
        Inquire on WhatsApp
    </button>
</div>
"#,
        badge = product.resolution_badge(),
        stars = stars_html(),
        os_row = spec_row("OS", &m.os),
        ram_row = spec_row("RAM", &m.ram),
        storage_row = spec_row("Storage", &m.storage),
    );
}

fn stars_html() -> String {
    (0..STAR_COUNT)
        .map(|i| {
            let tone = if i < STAR_RATING { "text-yellow-400" } else { "text-gray-600" };
            format!(
                r#"<svg class="star w-4 h-4 {tone}" fill="currentColor" viewBox="0 0 20 20"><path d="{STAR_PATH}"/></svg>"#
            )
        })
        .collect()
}

fn spec_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="spec-row flex justify-between text-sm"><span class="text-gray-400">{label}:</span><span class="text-white">{}</span></div>"#,
        escape_html(value)
    )
}

/// Panel under the 3D viewer describing the selected product.
pub fn product_info_html(product: &ProductRecord) -> String {
    let m = &product.metadata;
    let support = if m.supports_4k { "4K Support" } else { "HD Support" };
    format!(
        r#"<div class="flex justify-between items-center mb-2">
    <span class="font-semibold text-cyan-400">{name}</span>
    <span class="text-green-400 font-bold">{price}</span>
</div>
<div class="text-sm text-gray-300">
    <span class="bg-cyan-400/20 text-cyan-400 px-2 py-1 rounded text-xs mr-2">{os}</span>
    <span class="bg-purple-400/20 text-purple-400 px-2 py-1 rounded text-xs mr-2">{ram} RAM</span>
    <span class="bg-green-400/20 text-green-400 px-2 py-1 rounded text-xs">{support}</span>
</div>
"#,
        name = escape_html(&product.name),
        price = escape_html(&product.price),
        os = escape_html(&m.os_family()),
        ram = escape_html(&m.ram),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductMetadata, fallback_catalog};
    use scraper::{Html, Selector};

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn hd_box(id: &str) -> ProductRecord {
        ProductRecord {
            id: id.to_owned(),
            name: "Budget <HD> Box".to_owned(),
            price: "AED 79.00".to_owned(),
            image: "https://example.com/hd.jpg".to_owned(),
            metadata: ProductMetadata {
                os: "Android 9".to_owned(),
                ram: "1GB".to_owned(),
                storage: "8GB".to_owned(),
                supports_4k: false,
                processor: "RK3228".to_owned(),
            },
        }
    }

    #[test]
    fn renders_at_most_three_cards() {
        let mut catalog = fallback_catalog();
        catalog.push(hd_box("box_004"));
        let doc = Html::parse_fragment(&featured_cards_html(&catalog, 3));
        assert_eq!(doc.select(&sel(".product-card")).count(), 3);

        let doc = Html::parse_fragment(&featured_cards_html(&catalog[..2], 3));
        assert_eq!(doc.select(&sel(".product-card")).count(), 2);

        assert!(featured_cards_html(&[], 3).is_empty());
    }

    #[test]
    fn badge_follows_4k_support() {
        let catalog = vec![hd_box("box_hd"), fallback_catalog().remove(0)];
        let doc = Html::parse_fragment(&featured_cards_html(&catalog, 3));
        let badges: Vec<String> = doc
            .select(&sel(".resolution-badge"))
            .map(|b| b.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(badges, ["HD", "4K"]);
    }

    #[test]
    fn card_layout() {
        let doc = Html::parse_fragment(&featured_cards_html(&fallback_catalog(), 1));
        let card = doc.select(&sel(".product-card")).next().unwrap();
        assert_eq!(card.value().attr("data-product-id"), Some("box_001"));
        assert_eq!(card.select(&sel("svg.star")).count(), STAR_COUNT);
        assert_eq!(card.select(&sel("svg.text-yellow-400")).count(), STAR_RATING);
        assert_eq!(card.select(&sel(".spec-row")).count(), 3);
        let button = card.select(&sel("button")).next().unwrap();
        assert_eq!(button.text().collect::<String>().trim(), "Inquire on WhatsApp");
    }

    #[test]
    fn catalog_text_is_escaped() {
        let html = featured_cards_html(&[hd_box("x\"y")], 3);
        assert!(html.contains("Budget &lt;HD&gt; Box"));
        assert!(html.contains(r#"data-product-id="x&quot;y""#));
        let doc = Html::parse_fragment(&html);
        let card = doc.select(&sel(".product-card")).next().unwrap();
        assert_eq!(card.value().attr("data-product-id"), Some("x\"y"));
    }

    #[test]
    fn info_panel_badges() {
        let html = product_info_html(&fallback_catalog()[1]);
        assert!(html.contains("Xiaomi Mi Box S (2nd Gen)"));
        assert!(html.contains(">Google TV<"));
        assert!(html.contains("2GB RAM"));
        assert!(html.contains("4K Support"));
        assert!(product_info_html(&hd_box("b")).contains("HD Support"));
    }
}
