//! Hover and click hit-testing for the viewer.
//!
//! The controller only answers "what should change"; the viewer applies it.

use nalgebra::Vector2;

use crate::camera::{Camera, Ray};
use crate::scene::ProductModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverState {
    pub hovered: bool,
    pub cursor: egui::CursorIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The model was hit: move to the next product.
    Cycle,
    Ignored,
}

#[derive(Debug, Default, Clone)]
pub struct SelectionController {
    last_pointer: Option<Vector2<f32>>,
}

impl SelectionController {
    pub fn handle_pointer_move(
        &mut self,
        pointer_ndc: Option<Vector2<f32>>,
        camera: &Camera,
        model: &ProductModel,
    ) -> HoverState {
        if pointer_ndc.is_some() {
            self.last_pointer = pointer_ndc;
        }
        let hovered = pointer_ndc.is_some_and(|ndc| hit_test(ndc, camera, model).is_some());
        HoverState {
            hovered,
            cursor: if hovered {
                egui::CursorIcon::PointingHand
            } else {
                egui::CursorIcon::Default
            },
        }
    }

    /// Clicks test against the last pointer position seen by
    /// [`Self::handle_pointer_move`].
    pub fn handle_click(&self, camera: &Camera, model: &ProductModel) -> ClickOutcome {
        match self.last_pointer {
            Some(ndc) if hit_test(ndc, camera, model).is_some() => ClickOutcome::Cycle,
            _ => ClickOutcome::Ignored,
        }
    }
}

/// Distance to the nearest hit on any part of the model.
pub fn hit_test(ndc: Vector2<f32>, camera: &Camera, model: &ProductModel) -> Option<f32> {
    let world_ray = camera.ray_from_ndc(ndc)?;
    let to_model = model.transform.matrix().try_inverse()?;
    let ray: Ray = world_ray.transformed(&to_model);
    model
        .triangles()
        .filter_map(|t| ray.intersect_triangle(t))
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SelectionController, Camera, ProductModel) {
        let mut camera = Camera::default();
        camera.resize(Some((800.0, 600.0)));
        (SelectionController::default(), camera, ProductModel::new())
    }

    #[test]
    fn hovering_the_box_shows_a_pointer() {
        let (mut sel, camera, model) = setup();
        let hover = sel.handle_pointer_move(Some(Vector2::zeros()), &camera, &model);
        assert!(hover.hovered);
        assert_eq!(hover.cursor, egui::CursorIcon::PointingHand);
    }

    #[test]
    fn hovering_empty_space_shows_default_cursor() {
        let (mut sel, camera, model) = setup();
        let hover = sel.handle_pointer_move(Some(Vector2::new(0.95, 0.95)), &camera, &model);
        assert!(!hover.hovered);
        assert_eq!(hover.cursor, egui::CursorIcon::Default);
        assert!(!sel.handle_pointer_move(None, &camera, &model).hovered);
    }

    #[test]
    fn click_uses_last_pointer_position() {
        let (mut sel, camera, model) = setup();
        assert_eq!(sel.handle_click(&camera, &model), ClickOutcome::Ignored);

        sel.handle_pointer_move(Some(Vector2::new(0.05, 0.05)), &camera, &model);
        assert_eq!(sel.handle_click(&camera, &model), ClickOutcome::Cycle);

        sel.handle_pointer_move(Some(Vector2::new(-0.9, 0.9)), &camera, &model);
        assert_eq!(sel.handle_click(&camera, &model), ClickOutcome::Ignored);
    }

    #[test]
    fn hit_follows_the_model_transform() {
        let (_, camera, mut model) = setup();
        let front = hit_test(Vector2::zeros(), &camera, &model).unwrap();
        // The front panel sits 0.175 in front of the origin.
        assert!((front - (4.9 - 0.175)).abs() < 1e-2);

        model.transform.position.x = 10.0;
        assert!(hit_test(Vector2::zeros(), &camera, &model).is_none());
    }
}
