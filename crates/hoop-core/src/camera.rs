//! The single perspective camera shared by every stage, plus picking helpers.

use crate::constants::{CAMERA_FAR, CAMERA_FOVY_DEG, CAMERA_NEAR, CAMERA_START_EYE};
use glam::{Mat4, Vec3, Vec4};

const PITCH_LIMIT: f32 = 1.4;

/// Canvas backing size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            device_pixel_ratio: device_pixel_ratio.max(0.5),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

/// World-space pick ray; `dir` is normalised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

/// Right-handed camera described by position and heading rather than a
/// look-at target, so the eye can travel through its old focus point.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fovy_radians: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vec3::from_array(CAMERA_START_EYE),
            yaw: 0.0,
            pitch: 0.0,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            aspect: Viewport::default().aspect(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl CameraPose {
    /// Unit view direction. Yaw 0 / pitch 0 looks down -Z.
    pub fn forward(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Aim at `target` from the current eye.
    pub fn look_at(&mut self, target: Vec3) {
        let d = target - self.eye;
        if d.length_squared() < 1e-8 {
            return;
        }
        let d = d.normalize();
        self.pitch = d.y.asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = (-d.x).atan2(-d.z);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, self.forward(), Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unproject normalised device coordinates into a world-space ray.
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let inv = self.view_proj().inverse();
        let far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let far: Vec3 = far.truncate() / far.w;
        let dir = (far - self.eye).normalize_or_zero();
        Ray {
            origin: self.eye,
            dir: if dir == Vec3::ZERO { self.forward() } else { dir },
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }
}

/// Distance along the ray to the first hit with a sphere, if any.
#[inline]
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_at_origin() {
        let cam = CameraPose::default();
        let f = cam.forward();
        assert!((f - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut cam = CameraPose {
            eye: Vec3::new(0.0, 1.0, 5.0),
            ..CameraPose::default()
        };
        cam.look_at(Vec3::ZERO);
        let expected = (Vec3::ZERO - cam.eye).normalize();
        assert!((cam.forward() - expected).length() < 1e-5);
    }

    #[test]
    fn center_ray_hits_sphere_at_origin() {
        let cam = CameraPose::default();
        let ray = cam.ray_from_ndc(0.0, 0.0);
        let t = ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 11.0).abs() < 1e-3);
    }

    #[test]
    fn corner_ray_misses_small_sphere() {
        let cam = CameraPose::default();
        let ray = cam.ray_from_ndc(0.95, 0.95);
        assert!(ray_sphere(&ray, Vec3::ZERO, 0.5).is_none());
    }

    #[test]
    fn sphere_behind_origin_is_not_hit() {
        let ray = Ray {
            origin: Vec3::ZERO,
            dir: Vec3::Z,
        };
        assert!(ray_sphere(&ray, Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
    }
}
