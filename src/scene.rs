//! The decorative TV box model: fixed geometry, materials, lights and the
//! per-frame animation. Nothing here is data driven.

use csgrs::mesh::Mesh;
use csgrs::traits::CSG;
use nalgebra::{Matrix4, Vector3};

pub type Rgb = [f32; 3];

pub const fn rgb(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

pub fn to_hex(c: Rgb) -> u32 {
    let ch = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (ch(c[0]) << 16) | (ch(c[1]) << 8) | ch(c[2])
}

pub const ACCENT: u32 = 0x00d4ff;
const HOVER_EMISSIVE_INTENSITY: f32 = 0.1;
const SPIN_PER_FRAME: f32 = 0.01;
const BOB_AMPLITUDE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    /// `None` for unlit materials, which ignore lights and highlighting.
    pub emissive: Option<Rgb>,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub shininess: f32,
}

impl Material {
    pub fn phong(hex: u32, shininess: f32) -> Self {
        Self {
            color: rgb(hex),
            emissive: Some([0.0; 3]),
            emissive_intensity: 0.0,
            opacity: 1.0,
            shininess,
        }
    }

    pub fn basic(hex: u32) -> Self {
        Self {
            color: rgb(hex),
            emissive: None,
            emissive_intensity: 0.0,
            opacity: 1.0,
            shininess: 0.0,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.emissive.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub positions: [Vector3<f32>; 3],
    pub normals: [Vector3<f32>; 3],
}

#[derive(Debug, Clone)]
pub struct Part {
    pub name: &'static str,
    pub material: Material,
    /// Model-space triangles, fan-split from the mesh polygons.
    pub triangles: Vec<Triangle>,
}

impl Part {
    fn from_mesh(name: &'static str, mesh: &Mesh<()>, material: Material) -> Self {
        let mut triangles = Vec::new();
        for poly in &mesh.polygons {
            let verts = &poly.vertices;
            if verts.len() < 3 {
                continue;
            }
            let p = |i: usize| {
                let v = &verts[i].pos;
                Vector3::new(v.x as f32, v.y as f32, v.z as f32)
            };
            let n = |i: usize| {
                let v = &verts[i].normal;
                Vector3::new(v.x as f32, v.y as f32, v.z as f32)
            };
            for i in 1..verts.len() - 1 {
                triangles.push(Triangle {
                    positions: [p(0), p(i), p(i + 1)],
                    normals: [n(0), n(i), n(i + 1)],
                });
            }
        }
        Self { name, material, triangles }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Rgb,
    pub intensity: f32,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Light,
    /// `position` is the direction the light comes from.
    pub directional: Light,
    pub point: Light,
    pub point_range: f32,
}

pub const LIGHTING: Lighting = Lighting {
    ambient: Light { color: rgb(0xffffff), intensity: 0.4, position: [0.0; 3] },
    directional: Light { color: rgb(0x00d4ff), intensity: 0.8, position: [5.0, 5.0, 5.0] },
    point: Light { color: rgb(0x8b5cf6), intensity: 0.6, position: [-5.0, -5.0, 5.0] },
    point_range: 100.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Euler angles in radians.
    pub rotation: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Vector3::zeros(),
            position: Vector3::zeros(),
        }
    }
}

impl Transform {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * Matrix4::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

/// Index of the main body in [`ProductModel::parts`]; its color is tweened.
pub const BODY: usize = 0;

#[derive(Debug, Clone)]
pub struct ProductModel {
    pub parts: Vec<Part>,
    pub transform: Transform,
}

impl Default for ProductModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductModel {
    pub fn new() -> Self {
        let mut body = Material::phong(0x1a1a1a, 100.0);
        body.opacity = 0.9;

        let mut parts = vec![
            Part::from_mesh("body", &Mesh::cuboid(2.0, 1.2, 0.3, None).center(), body),
            Part::from_mesh(
                "front_panel",
                &Mesh::cuboid(1.9, 1.1, 0.05, None).center().translate(0.0, 0.0, 0.15),
                Material::phong(0x2a2a2a, 80.0),
            ),
            Part::from_mesh(
                "led",
                &Mesh::sphere(0.05, 16, 16, None).translate(0.8, 0.4, 0.2),
                Material::basic(ACCENT),
            ),
        ];
        let port = Mesh::cuboid(0.1, 0.05, 0.02, None).center();
        for i in 0..4 {
            let x = -0.8 + i as f64 * 0.2;
            parts.push(Part::from_mesh(
                "port",
                &port.translate(x, 0.3, -0.16),
                Material::phong(0x444444, 30.0),
            ));
        }

        Self {
            parts,
            transform: Transform::default(),
        }
    }

    /// One animation frame. `now_seconds` is wall-clock time.
    pub fn advance(&mut self, is_rotating: bool, now_seconds: f64) {
        if !is_rotating {
            return;
        }
        self.transform.rotation.y += SPIN_PER_FRAME;
        self.transform.position.y = now_seconds.sin() as f32 * BOB_AMPLITUDE;
    }

    pub fn set_highlight(&mut self, on: bool) {
        for part in &mut self.parts {
            let material = &mut part.material;
            let Some(emissive) = material.emissive.as_mut() else {
                continue;
            };
            if on {
                *emissive = rgb(ACCENT);
                material.emissive_intensity = HOVER_EMISSIVE_INTENSITY;
            } else if to_hex(material.color) != ACCENT {
                *emissive = [0.0; 3];
                material.emissive_intensity = 0.0;
            }
        }
    }

    pub fn body_color(&self) -> Rgb {
        self.parts[BODY].material.color
    }

    pub fn set_body_color(&mut self, color: Rgb) {
        self.parts[BODY].material.color = color;
    }

    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.parts.iter().flat_map(|p| p.triangles.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_conversion() {
        assert_eq!(to_hex(rgb(0x8b5cf6)), 0x8b5cf6);
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn model_layout() {
        let model = ProductModel::new();
        let names: Vec<_> = model.parts.iter().map(|p| p.name).collect();
        assert_eq!(names, ["body", "front_panel", "led", "port", "port", "port", "port"]);
        assert!(model.parts.iter().all(|p| !p.triangles.is_empty()));
        assert_eq!(model.parts[BODY].material.opacity, 0.9);
    }

    #[test]
    fn body_is_centered() {
        let model = ProductModel::new();
        let (mut min, mut max) = (Vector3::repeat(f32::MAX), Vector3::repeat(f32::MIN));
        for t in &model.parts[BODY].triangles {
            for p in &t.positions {
                min = min.inf(p);
                max = max.sup(p);
            }
        }
        assert!((max.x - 1.0).abs() < 1e-4 && (min.x + 1.0).abs() < 1e-4);
        assert!((max.y - 0.6).abs() < 1e-4 && (min.y + 0.6).abs() < 1e-4);
        assert!((max.z - 0.15).abs() < 1e-4 && (min.z + 0.15).abs() < 1e-4);
    }

    #[test]
    fn advance_spins_and_bobs_only_while_rotating() {
        let mut model = ProductModel::new();
        model.advance(false, 1.0);
        assert_eq!(model.transform, Transform::default());

        let now = std::f64::consts::FRAC_PI_2;
        model.advance(true, now);
        model.advance(true, now);
        assert!((model.transform.rotation.y - 0.02).abs() < 1e-6);
        assert!((model.transform.position.y - 0.1).abs() < 1e-6);

        model.transform.reset();
        assert_eq!(model.transform, Transform::default());
    }

    #[test]
    fn highlight_skips_unlit_parts() {
        let mut model = ProductModel::new();
        model.set_highlight(true);
        let body = model.parts[BODY].material;
        assert_eq!(body.emissive, Some(rgb(ACCENT)));
        assert_eq!(body.emissive_intensity, 0.1);
        let led = model.parts.iter().find(|p| p.name == "led").unwrap();
        assert_eq!(led.material.emissive, None);

        model.set_highlight(false);
        assert_eq!(model.parts[BODY].material.emissive, Some([0.0; 3]));
        assert_eq!(model.parts[BODY].material.emissive_intensity, 0.0);
    }

    #[test]
    fn accent_colored_parts_keep_their_glow() {
        let mut model = ProductModel::new();
        model.set_body_color(rgb(ACCENT));
        model.set_highlight(true);
        model.set_highlight(false);

        let body = model.parts[BODY].material;
        assert_eq!(body.emissive, Some(rgb(ACCENT)));
        assert_eq!(body.emissive_intensity, 0.1);
        let panel = model.parts.iter().find(|p| p.name == "front_panel").unwrap();
        assert_eq!(panel.material.emissive, Some([0.0; 3]));
        assert_eq!(panel.material.emissive_intensity, 0.0);
    }
}
