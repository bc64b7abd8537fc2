//! Performance vs. price comparison chart.
//!
//! Axis labels come from the live catalog while the plotted values are fixed
//! constants. The two are not linked; that is how the page has always
//! behaved.

use eframe::egui;
use egui_plot::{AxisHints, Bar, BarChart, GridMark, HPlacement, Legend, Line, Plot, PlotPoints};

use crate::catalog::ProductRecord;

pub const PERFORMANCE_SCORES: [f64; 4] = [95.0, 75.0, 80.0, 90.0];
pub const PRICES_AED: [f64; 4] = [849.0, 185.0, 215.0, 450.0];

const PERFORMANCE_NAME: &str = "Performance Score";
const PRICE_NAME: &str = "Price (AED)";
const PERFORMANCE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0xd4, 0xff);
const PRICE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x8b, 0x5c, 0xf6);

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
    pub prices: Vec<f64>,
}

impl ChartData {
    pub fn from_catalog(catalog: &[ProductRecord], count: usize) -> Self {
        Self {
            labels: catalog.iter().take(count).map(|p| p.short_name(2)).collect(),
            scores: PERFORMANCE_SCORES.to_vec(),
            prices: PRICES_AED.to_vec(),
        }
    }

    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("")
    }

    fn score_max(&self) -> f64 {
        self.scores.iter().copied().fold(0.0, f64::max).max(1.0)
    }

    fn price_max(&self) -> f64 {
        self.prices.iter().copied().fold(0.0, f64::max).max(1.0)
    }

    /// Maps a price onto the left (performance) axis so both series share
    /// one plot.
    pub fn price_to_plot(&self, price: f64) -> f64 {
        price * self.score_max() / self.price_max()
    }

    pub fn plot_to_price(&self, y: f64) -> f64 {
        y * self.price_max() / self.score_max()
    }
}

pub struct PerformanceChart {
    data: ChartData,
}

impl PerformanceChart {
    pub fn new(data: ChartData) -> Self {
        Self { data }
    }

    pub fn ui(&self, ui: &mut egui::Ui) {
        let data = &self.data;
        let bars: Vec<Bar> = data
            .scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                Bar::new(i as f64, score)
                    .name(data.label(i))
                    .fill(PERFORMANCE_COLOR)
            })
            .collect();
        let price_points: PlotPoints = data
            .prices
            .iter()
            .enumerate()
            .map(|(i, &price)| [i as f64, data.price_to_plot(price)])
            .collect();

        let x_labels = data.labels.clone();
        let x_axis = AxisHints::new_x().formatter(move |mark: GridMark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            x_labels.get(i as usize).cloned().unwrap_or_default()
        });
        let left = AxisHints::new_y()
            .label("Performance")
            .placement(HPlacement::Left);
        let price_axis = data.clone();
        let right = AxisHints::new_y()
            .label(PRICE_NAME)
            .placement(HPlacement::Right)
            .formatter(move |mark: GridMark, _range| format!("{:.0}", price_axis.plot_to_price(mark.value)));

        let hover = data.clone();
        Plot::new("performance_chart")
            .legend(Legend::default())
            .custom_x_axes(vec![x_axis])
            .custom_y_axes(vec![left, right])
            .x_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .label_formatter(move |name, point| {
                let i = point.x.round().max(0.0) as usize;
                if name == PRICE_NAME {
                    format!("{}\n{PRICE_NAME}: {:.0}", hover.label(i), hover.plot_to_price(point.y))
                } else {
                    format!("{}\n{PERFORMANCE_NAME}: {:.0}", hover.label(i), point.y)
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(PERFORMANCE_NAME).width(0.6));
                plot_ui.line(
                    Line::new(price_points)
                        .name(PRICE_NAME)
                        .color(PRICE_COLOR)
                        .width(3.0),
                );
            });
    }
}

/// Stand-alone app for the chart's own canvas.
pub struct ChartApp {
    chart: PerformanceChart,
}

impl ChartApp {
    pub fn new(chart: PerformanceChart) -> Self {
        Self { chart }
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.chart.ui(ui));
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}
