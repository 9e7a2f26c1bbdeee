/// Perspective projection and screen mapping utilities
use nalgebra::{Matrix4, Point3, Vector4};
use serde::Deserialize;

/// Perspective projection with a fixed field of view and clipping range.
///
/// Only the aspect ratio follows the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    pub fn new(fov_degrees: f32, near: f32, far: f32, width: u32, height: u32) -> Self {
        let mut projection = Self {
            fov: fov_degrees.to_radians(),
            aspect: 1.0,
            near,
            far,
        };
        projection.set_viewport(width, height);
        projection
    }

    /// Update the aspect ratio from a viewport size; a zero height keeps the old ratio.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 && width > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Create the projection matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }
}

/// Projection settings as they appear in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ProjectionConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl ProjectionConfig {
    pub fn into_perspective(self, width: u32, height: u32) -> Perspective {
        Perspective::new(self.fov_degrees, self.near, self.far, width, height)
    }
}

/// Project a model-space point through a full clip matrix to screen space.
///
/// Returns `(x, y, depth)` with depth in normalized device coordinates, or
/// `None` when the point is behind the eye or outside the view volume.
pub fn project_to_screen(
    clip_matrix: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = clip_matrix * Vector4::new(point.x, point.y, point.z, 1.0);

    // Prevent division by near-zero depth values
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    if !(-1.0..=1.0).contains(&depth) {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}
