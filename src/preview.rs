//! Desktop preview of the storefront: the same viewer, cards and chart in a
//! single native window.

use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui;

use crate::catalog::{CatalogLoad, ProductRecord, load_catalog_file};
use crate::chart::{ChartData, PerformanceChart};
use crate::config::SiteConfig;
use crate::links::{InquiryLinks, open_in_new_context};
use crate::markup::{STAR_COUNT, STAR_RATING};
use crate::state::{AppState, rotate_button_label};
use crate::viewer::ProductViewer;

const CYAN: egui::Color32 = egui::Color32::from_rgb(0x22, 0xd3, 0xee);
const GREEN: egui::Color32 = egui::Color32::from_rgb(0x4a, 0xde, 0x80);
const STAR_ON: egui::Color32 = egui::Color32::from_rgb(0xfa, 0xcc, 0x15);
const STAR_OFF: egui::Color32 = egui::Color32::from_rgb(0x4b, 0x55, 0x63);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Featured,
    Performance,
}

pub struct PreviewApp {
    state: Rc<RefCell<AppState>>,
    viewer: ProductViewer,
    chart: PerformanceChart,
    links: InquiryLinks,
    featured_count: usize,
    menu_open: bool,
    scroll_to: Option<Section>,
}

impl PreviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &SiteConfig, load: CatalogLoad) -> Self {
        let degraded = load.is_fallback();
        let state = Rc::new(RefCell::new(AppState::new(load.into_products(), degraded)));
        let chart = PerformanceChart::new(ChartData::from_catalog(&state.borrow().catalog, config.chart_count));
        let viewer = ProductViewer::new(
            cc,
            state.clone(),
            Box::new(|product: &ProductRecord| log::info!("selected {} ({})", product.name, product.price)),
        );
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        Self {
            state,
            viewer,
            chart,
            links: InquiryLinks::new(config),
            featured_count: config.featured_count,
            menu_open: false,
            scroll_to: None,
        }
    }

    fn nav_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("TechVision").color(CYAN));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("☰").clicked() {
                    self.menu_open = !self.menu_open;
                }
                if ui.button("Chat on WhatsApp").clicked() {
                    open_in_new_context(ui.ctx(), &self.links.general());
                }
            });
        });
        if self.menu_open {
            ui.horizontal(|ui| {
                if ui.link("Featured").clicked() {
                    self.scroll_to = Some(Section::Featured);
                }
                if ui.link("Performance").clicked() {
                    self.scroll_to = Some(Section::Performance);
                }
            });
        }
    }

    fn section_heading(&mut self, ui: &mut egui::Ui, section: Section, title: &str) {
        ui.add_space(16.0);
        if self.scroll_to == Some(section) {
            ui.scroll_to_cursor(Some(egui::Align::TOP));
            self.scroll_to = None;
        }
        ui.heading(title);
        ui.separator();
    }

    fn hero(&mut self, ui: &mut egui::Ui) {
        let size = egui::vec2(ui.available_width(), 360.0);
        ui.allocate_ui(size, |ui| {
            ui.set_min_size(size);
            self.viewer.ui(ui);
        });

        ui.horizontal(|ui| {
            let rotating = self.state.borrow().view.is_rotating;
            if ui.button(rotate_button_label(rotating)).clicked() {
                self.state.borrow_mut().toggle_rotation();
            }
            if ui.button("Reset View").clicked() {
                self.viewer.reset_transform();
            }
        });

        let state = self.state.borrow();
        if let Some(product) = state.current_product() {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&product.name).strong().color(CYAN));
                ui.label(egui::RichText::new(&product.price).strong().color(GREEN));
            });
            ui.horizontal(|ui| {
                ui.small(product.metadata.os_family());
                ui.small(format!("{} RAM", product.metadata.ram));
                ui.small(if product.metadata.supports_4k { "4K Support" } else { "HD Support" });
            });
        }
        if state.catalog_degraded {
            ui.small("Showing the built-in catalog.");
        }
    }

    fn featured(&self, ui: &mut egui::Ui) {
        let state = self.state.borrow();
        ui.horizontal_wrapped(|ui| {
            for product in state.catalog.iter().take(self.featured_count) {
                if product_card(ui, product) {
                    open_in_new_context(ui.ctx(), &self.links.for_product(product));
                }
            }
        });
    }
}

/// One card. Returns true when the inquiry button was pressed.
fn product_card(ui: &mut egui::Ui, product: &ProductRecord) -> bool {
    let mut inquire = false;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(260.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&product.name).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(product.resolution_badge()).color(GREEN));
            });
        });
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&product.price).size(18.0).color(CYAN));
            for i in 0..STAR_COUNT {
                ui.colored_label(if i < STAR_RATING { STAR_ON } else { STAR_OFF }, "★");
            }
        });
        egui::Grid::new(("specs", &product.id)).num_columns(2).show(ui, |ui| {
            for (label, value) in [
                ("OS:", &product.metadata.os),
                ("RAM:", &product.metadata.ram),
                ("Storage:", &product.metadata.storage),
            ] {
                ui.weak(label);
                ui.label(value);
                ui.end_row();
            }
        });
        inquire = ui
            .add_sized([ui.available_width(), 28.0], egui::Button::new("Inquire on WhatsApp"))
            .clicked();
    });
    inquire
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("nav").show(ctx, |ui| self.nav_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.hero(ui);
                self.section_heading(ui, Section::Featured, "Featured Products");
                self.featured(ui);
                self.section_heading(ui, Section::Performance, "Performance Comparison");
                ui.allocate_ui(egui::vec2(ui.available_width(), 320.0), |ui| self.chart.ui(ui));
            });
        });
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewer.destroy(gl);
        }
    }
}

pub fn run() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SiteConfig::load_file("site-config.json");
    let catalog_path = std::env::args().nth(1).unwrap_or_else(|| config.catalog_url.clone());
    let load = load_catalog_file(&catalog_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("TechVision")
            .with_inner_size([1100.0, 900.0]),
        depth_buffer: 24,
        ..Default::default()
    };
    eframe::run_native(
        "TechVision",
        options,
        Box::new(move |cc| Ok(Box::new(PreviewApp::new(cc, &config, load)))),
    )
}
