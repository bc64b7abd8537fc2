//! The 3D product viewer widget.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use eframe::egui;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::camera::{Camera, pointer_to_ndc};
use crate::catalog::ProductRecord;
use crate::renderer::{FrameUniforms, GpuMesh};
use crate::scene::{LIGHTING, ProductModel};
use crate::selection::{ClickOutcome, SelectionController};
use crate::state::AppState;
use crate::tween::{COLOR_TWEEN_SECONDS, ColorTween, random_body_color};

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x0a, 0x0a, 0x0a);

pub type SelectCallback = Box<dyn FnMut(&ProductRecord)>;

pub struct ProductViewer {
    state: Rc<RefCell<AppState>>,
    model: ProductModel,
    camera: Camera,
    selection: SelectionController,
    hovered: bool,
    tween: Option<ColorTween>,
    rng: SmallRng,
    gpu: Option<Arc<GpuMesh>>,
    ctx: egui::Context,
    on_select: SelectCallback,
}

fn unix_seconds() -> f64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

impl ProductViewer {
    pub fn new(cc: &eframe::CreationContext<'_>, state: Rc<RefCell<AppState>>, on_select: SelectCallback) -> Self {
        let model = ProductModel::new();
        let gpu = cc.gl.as_ref().and_then(|gl| {
            // SAFETY: the context is current during app creation.
            match unsafe { GpuMesh::new(gl) } {
                Ok(mut gpu) => {
                    unsafe { gpu.upload(gl, &model) };
                    Some(Arc::new(gpu))
                }
                Err(e) => {
                    log::error!("3D viewer disabled: {e:#}");
                    None
                }
            }
        });

        Self {
            state,
            model,
            camera: Camera::default(),
            selection: SelectionController::default(),
            hovered: false,
            tween: None,
            rng: SmallRng::seed_from_u64((unix_seconds() * 1000.0) as u64),
            gpu,
            ctx: cc.egui_ctx.clone(),
            on_select,
        }
    }

    pub fn reset_transform(&mut self) {
        self.model.transform.reset();
        self.ctx.request_repaint();
    }

    /// Called when the mount container changes size.
    pub fn resize(&mut self, container: Option<(f32, f32)>) -> Option<f32> {
        let aspect = self.camera.resize(container)?;
        self.ctx.request_repaint();
        Some(aspect)
    }

    /// For state changed outside the widget, e.g. the rotate button.
    pub fn request_repaint(&self) {
        self.ctx.request_repaint();
    }

    fn cycle_product(&mut self, now: f64) {
        let product = self.state.borrow_mut().cycle_product().cloned();
        if let Some(product) = product {
            log::debug!("showing {}", product.id);
            (self.on_select)(&product);
        }
        let target = random_body_color(&mut self.rng);
        self.tween = Some(ColorTween::new(self.model.body_color(), target, now, COLOR_TWEEN_SECONDS));
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
        self.camera.resize(Some((rect.width(), rect.height())));
        let now = ui.input(|i| i.time);

        // ───── hit testing ─────
        if response.hovered() || self.hovered {
            let pointer = response.hover_pos().and_then(|p| pointer_to_ndc(p, rect));
            let hover = self.selection.handle_pointer_move(pointer, &self.camera, &self.model);
            if hover.hovered != self.hovered {
                self.model.set_highlight(hover.hovered);
                self.hovered = hover.hovered;
            }
            if response.hovered() {
                ui.ctx().set_cursor_icon(hover.cursor);
            }
        }
        if response.clicked() && self.selection.handle_click(&self.camera, &self.model) == ClickOutcome::Cycle {
            self.cycle_product(now);
        }

        // ───── animation ─────
        let rotating = self.state.borrow().view.is_rotating;
        self.model.advance(rotating, unix_seconds());
        if let Some(tween) = self.tween {
            self.model.set_body_color(tween.sample(now));
            if tween.is_finished(now) {
                self.tween = None;
            }
        }

        // ───── paint ─────
        ui.painter().rect_filled(rect, 0.0, BACKGROUND);

        if let Some(gpu) = &self.gpu {
            let gpu_for_cb = gpu.clone();
            let frame = FrameUniforms {
                view_projection: self.camera.view_projection(),
                model: self.model.transform.matrix(),
                eye: self.camera.eye,
                lighting: LIGHTING,
                materials: self.model.parts.iter().map(|p| p.material).collect(),
            };
            let callback = egui_glow::CallbackFn::new(move |_info, painter| unsafe {
                gpu_for_cb.paint(painter.gl(), &frame);
            });
            ui.painter().add(egui::PaintCallback {
                rect,
                callback: Arc::new(callback),
            });
        }

        if rotating || self.tween.is_some() {
            ui.ctx().request_repaint();
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        if let Some(gpu) = &self.gpu {
            unsafe { gpu.destroy(gl) };
        }
    }
}

/// Stand-alone app for the viewer's own canvas.
pub struct ViewerApp {
    viewer: Rc<RefCell<ProductViewer>>,
}

impl ViewerApp {
    pub fn new(viewer: Rc<RefCell<ProductViewer>>) -> Self {
        Self { viewer }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.viewer.borrow_mut().ui(ui));
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            self.viewer.borrow().destroy(gl);
        }
    }
}
