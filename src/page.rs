//! Browser side: mounts the widgets into the host page and wires up DOM
//! listeners. Every element lookup is optional; a missing element only
//! disables its feature.

/// Selector for a same-page anchor's target, `None` for a bare `#` or any
/// href that is not a fragment.
pub fn anchor_target(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(id) if !id.is_empty() => Some(href),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::start;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo_timers::callback::Timeout;
    use once_cell::unsync::OnceCell;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, Event, EventTarget, HtmlCanvasElement, IntersectionObserver,
        IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions,
        ScrollLogicalPosition, Window,
    };

    use super::anchor_target;
    use crate::catalog::{ProductRecord, load_catalog};
    use crate::chart::{ChartApp, ChartData, PerformanceChart};
    use crate::config::SiteConfig;
    use crate::links::{InquiryLinks, open_in_new_context};
    use crate::markup::{featured_cards_html, product_info_html};
    use crate::state::{AppState, rotate_button_label};
    use crate::viewer::{ProductViewer, SelectCallback, ViewerApp};

    type Shared<T> = Rc<RefCell<T>>;

    pub async fn start() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let config = SiteConfig::from_page(&document);

        let load = load_catalog(&config.catalog_url).await;
        let degraded = load.is_fallback();
        let state = Rc::new(RefCell::new(AppState::new(load.into_products(), degraded)));
        let links = Rc::new(InquiryLinks::new(&config));

        let viewer = match mount_viewer(&document, &state).await {
            Ok(viewer) => viewer,
            Err(e) => {
                log::error!("could not start the 3D viewer: {e:?}");
                None
            }
        };
        render_featured(&document, &state, &links, &config);
        if let Err(e) = mount_chart(&document, &state, &config).await {
            log::error!("could not start the performance chart: {e:?}");
        }
        wire_controls(&document, &state, viewer.clone());
        wire_anchors(&document);
        wire_page_actions(&document, &links);
        if let Err(e) = observe_fade_ins(&document, &config) {
            log::warn!("scroll animations disabled: {e:?}");
        }
        wire_mobile_menu(&document);
        wire_resize(&window, &document, viewer, &config);
        preload_images(&state.borrow().catalog);

        if degraded {
            log::warn!("running on the fallback catalog");
        }
        log::info!("TechVision storefront initialized");
        Ok(())
    }

    fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            log::warn!("could not listen for {event}: {e:?}");
        }
        // Listeners live as long as the page.
        closure.forget();
    }

    fn elements(document: &Document, selector: &str) -> Vec<Element> {
        let Ok(list) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn scroll_smooth(target: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        target.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn mount_canvas(document: &Document, container: &Element) -> Result<HtmlCanvasElement, JsValue> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("created element is not a canvas"))?;
        let style = canvas.style();
        style.set_property("display", "block")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        container.append_child(&canvas)?;
        Ok(canvas)
    }

    fn web_options() -> eframe::WebOptions {
        eframe::WebOptions {
            depth_buffer: 24,
            ..Default::default()
        }
    }

    async fn mount_viewer(
        document: &Document,
        state: &Shared<AppState>,
    ) -> Result<Option<Shared<ProductViewer>>, JsValue> {
        let Some(container) = document.get_element_by_id("three-container") else {
            return Ok(None);
        };
        let canvas = mount_canvas(document, &container)?;

        let info_document = document.clone();
        let on_select: SelectCallback = Box::new(move |product: &ProductRecord| {
            if let Ok(Some(panel)) = info_document.query_selector(".scene-container .glass") {
                panel.set_inner_html(&product_info_html(product));
            }
        });

        let slot: Rc<OnceCell<Shared<ProductViewer>>> = Rc::new(OnceCell::new());
        let creator_slot = slot.clone();
        let creator_state = state.clone();
        eframe::WebRunner::new()
            .start(
                canvas,
                web_options(),
                Box::new(move |cc| {
                    let viewer = Rc::new(RefCell::new(ProductViewer::new(cc, creator_state, on_select)));
                    let _ = creator_slot.set(viewer.clone());
                    Ok(Box::new(ViewerApp::new(viewer)))
                }),
            )
            .await?;
        Ok(slot.get().cloned())
    }

    async fn mount_chart(document: &Document, state: &Shared<AppState>, config: &SiteConfig) -> Result<(), JsValue> {
        let Some(container) = document.get_element_by_id("performance-chart") else {
            return Ok(());
        };
        let canvas = mount_canvas(document, &container)?;
        let data = ChartData::from_catalog(&state.borrow().catalog, config.chart_count);
        eframe::WebRunner::new()
            .start(
                canvas,
                web_options(),
                Box::new(move |_cc| Ok(Box::new(ChartApp::new(PerformanceChart::new(data))))),
            )
            .await
    }

    fn render_featured(document: &Document, state: &Shared<AppState>, links: &Rc<InquiryLinks>, config: &SiteConfig) {
        let Some(grid) = document.get_element_by_id("featured-grid") else {
            return;
        };
        grid.set_inner_html(&featured_cards_html(&state.borrow().catalog, config.featured_count));

        for card in elements(document, "#featured-grid .product-card") {
            let Some(id) = card.get_attribute("data-product-id") else {
                continue;
            };
            let state = state.clone();
            let links = links.clone();
            listen(&card, "click", move |_| {
                if let Some(url) = links.for_product_id(&state.borrow().catalog, &id) {
                    open_in_new_context(&url);
                }
            });
        }
    }

    fn wire_controls(document: &Document, state: &Shared<AppState>, viewer: Option<Shared<ProductViewer>>) {
        if let Some(button) = document.get_element_by_id("rotate-btn") {
            let state = state.clone();
            let viewer = viewer.clone();
            let label_target = button.clone();
            listen(&button, "click", move |_| {
                let rotating = state.borrow_mut().toggle_rotation();
                label_target.set_text_content(Some(rotate_button_label(rotating)));
                if let Some(viewer) = &viewer {
                    viewer.borrow().request_repaint();
                }
            });
        }

        if let Some(button) = document.get_element_by_id("reset-btn") {
            listen(&button, "click", move |_| {
                if let Some(viewer) = &viewer {
                    viewer.borrow_mut().reset_transform();
                }
            });
        }
    }

    fn wire_anchors(document: &Document) {
        for anchor in elements(document, r##"a[href^="#"]"##) {
            let document = document.clone();
            let source = anchor.clone();
            listen(&anchor, "click", move |event| {
                event.prevent_default();
                let Some(href) = source.get_attribute("href") else {
                    return;
                };
                let Some(selector) = anchor_target(&href) else {
                    return;
                };
                if let Ok(Some(target)) = document.query_selector(selector) {
                    scroll_smooth(&target);
                }
            });
        }
    }

    /// Buttons elsewhere on the page: generic inquiry and "browse products".
    fn wire_page_actions(document: &Document, links: &Rc<InquiryLinks>) {
        for button in elements(document, r#"[data-action="whatsapp"]"#) {
            let links = links.clone();
            listen(&button, "click", move |_| open_in_new_context(&links.general()));
        }
        for button in elements(document, r#"[data-action="scroll-to-products"]"#) {
            let document = document.clone();
            listen(&button, "click", move |_| {
                if let Some(section) = document.get_element_by_id("featured-products") {
                    scroll_smooth(&section);
                }
            });
        }
    }

    /// Adds `visible` to each `.fade-in-up` element the first time it scrolls
    /// into view. The observer stays registered for the life of the page.
    fn observe_fade_ins(document: &Document, config: &SiteConfig) -> Result<(), JsValue> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if entry.is_intersecting() {
                        if let Err(e) = entry.target().class_list().add_1("visible") {
                            log::debug!("fade-in skipped: {e:?}");
                        }
                    }
                }
            },
        );
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.fade_in_threshold));
        options.set_root_margin(&config.fade_in_root_margin);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        callback.forget();

        for el in elements(document, ".fade-in-up") {
            observer.observe(&el);
        }
        Ok(())
    }

    fn wire_mobile_menu(document: &Document) {
        let (Some(button), Some(menu)) = (
            document.get_element_by_id("mobile-menu-btn"),
            document.get_element_by_id("mobile-menu"),
        ) else {
            return;
        };
        listen(&button, "click", move |_| {
            if let Err(e) = menu.class_list().toggle("hidden") {
                log::debug!("mobile menu toggle failed: {e:?}");
            }
        });
    }

    /// Recomputes the viewer's aspect ratio once resizing has been quiet for
    /// `resize_debounce_ms`.
    fn wire_resize(window: &Window, document: &Document, viewer: Option<Shared<ProductViewer>>, config: &SiteConfig) {
        let Some(viewer) = viewer else {
            return;
        };
        let pending: Shared<Option<Timeout>> = Rc::new(RefCell::new(None));
        let delay = config.resize_debounce_ms;
        let document = document.clone();
        listen(window, "resize", move |_| {
            let document = document.clone();
            let viewer = viewer.clone();
            // Replacing the pending timeout drops, and so cancels, the old one.
            *pending.borrow_mut() = Some(Timeout::new(delay, move || {
                let container = document
                    .get_element_by_id("three-container")
                    .map(|el| (el.client_width() as f32, el.client_height() as f32));
                viewer.borrow_mut().resize(container);
            }));
        });
    }

    fn preload_images(catalog: &[ProductRecord]) {
        for product in catalog {
            match web_sys::HtmlImageElement::new() {
                Ok(img) => img.set_src(&product.image),
                Err(e) => log::debug!("image preload skipped: {e:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_links_resolve_to_selectors() {
        assert_eq!(anchor_target("#featured-products"), Some("#featured-products"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("/about#team"), None);
        assert_eq!(anchor_target(""), None);
    }
}
