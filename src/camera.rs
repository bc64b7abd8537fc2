use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};

use crate::scene::Triangle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Point3<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            eye: Point3::new(0.0, 0.0, 5.0),
        }
    }
}

impl Camera {
    /// Recomputes the aspect ratio from the mount container's size.
    /// Returns the new aspect, or `None` (state untouched) when there is no
    /// usable container.
    pub fn resize(&mut self, container: Option<(f32, f32)>) -> Option<f32> {
        let (width, height) = container?;
        if !(height > 0.0 && width > 0.0) {
            return None;
        }
        self.aspect = width / height;
        Some(self.aspect)
    }

    pub fn projection(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov_y_deg.to_radians(), self.near, self.far)
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &Point3::origin(), &Vector3::y())
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection() * self.view()
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vector2<f32>) -> Option<Ray> {
        let inv = self.view_projection().try_inverse()?;
        let unproject = |z: f32| {
            let p = inv * Vector4::new(ndc.x, ndc.y, z, 1.0);
            (p.w != 0.0).then(|| p.xyz() / p.w)
        };
        let near = unproject(-1.0)?;
        let far = unproject(1.0)?;
        Some(Ray {
            origin: near,
            direction: (far - near).normalize(),
        })
    }
}

/// Pointer position inside a viewport to NDC (`y` up).
pub fn pointer_to_ndc(pointer: egui::Pos2, rect: egui::Rect) -> Option<Vector2<f32>> {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    Some(Vector2::new(
        (pointer.x - rect.left()) / rect.width() * 2.0 - 1.0,
        -((pointer.y - rect.top()) / rect.height()) * 2.0 + 1.0,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn transformed(&self, m: &Matrix4<f32>) -> Ray {
        let origin = m.transform_point(&Point3::from(self.origin)).coords;
        let direction = m.transform_vector(&self.direction).normalize();
        Ray { origin, direction }
    }

    /// Möller–Trumbore; distance along the ray to the hit, both faces count.
    pub fn intersect_triangle(&self, tri: &Triangle) -> Option<f32> {
        const EPS: f32 = 1e-7;
        let [a, b, c] = tri.positions;
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(&e2);
        let det = e1.dot(&p);
        if det.abs() < EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(&e1);
        let v = self.direction.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(&q) * inv_det;
        (t > EPS).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_uses_width_over_height() {
        let mut cam = Camera::default();
        assert_eq!(cam.resize(Some((800.0, 400.0))), Some(2.0));
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn resize_without_container_is_a_no_op() {
        let mut cam = Camera::default();
        cam.resize(Some((300.0, 200.0)));
        assert_eq!(cam.resize(None), None);
        assert_eq!(cam.resize(Some((300.0, 0.0))), None);
        assert_eq!(cam.aspect, 1.5);
    }

    #[test]
    fn center_ray_points_down_negative_z() {
        let cam = Camera::default();
        let ray = cam.ray_from_ndc(Vector2::zeros()).unwrap();
        assert!(ray.origin.x.abs() < 1e-4 && ray.origin.y.abs() < 1e-4);
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-4);
    }

    #[test]
    fn pointer_corners_map_to_ndc() {
        let rect = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(200.0, 100.0));
        assert_eq!(pointer_to_ndc(rect.left_top(), rect), Some(Vector2::new(-1.0, 1.0)));
        assert_eq!(pointer_to_ndc(rect.right_bottom(), rect), Some(Vector2::new(1.0, -1.0)));
        assert_eq!(pointer_to_ndc(rect.center(), rect), Some(Vector2::new(0.0, 0.0)));
    }

    #[test]
    fn triangle_hit_and_miss() {
        let tri = Triangle {
            positions: [
                Vector3::new(-1.0, -1.0, 0.0),
                Vector3::new(1.0, -1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            normals: [Vector3::z(); 3],
        };
        let hit = Ray { origin: Vector3::new(0.0, 0.0, 5.0), direction: -Vector3::z() };
        assert!((hit.intersect_triangle(&tri).unwrap() - 5.0).abs() < 1e-5);

        let miss = Ray { origin: Vector3::new(3.0, 0.0, 5.0), direction: -Vector3::z() };
        assert!(miss.intersect_triangle(&tri).is_none());

        let behind = Ray { origin: Vector3::new(0.0, 0.0, 5.0), direction: Vector3::z() };
        assert!(behind.intersect_triangle(&tri).is_none());
    }
}
