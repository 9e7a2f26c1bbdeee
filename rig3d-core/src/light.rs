/// Head-attached and orbiting light sources
use nalgebra::{Matrix4, Point3};
use std::f32::consts::TAU;
use std::time::Duration;

use crate::material::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightMode {
    /// Light sits at the viewer
    #[default]
    Head,
    /// Light circles the scene in the XZ plane
    Distant,
}

/// Light parameters in view space, as the backend consumes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLight {
    pub ambient: Color,
    pub color: Color,
    pub position: Point3<f32>,
}

/// Distant light circling the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLight {
    pub animating: bool,
    /// Time the current animation run started
    pub start: Duration,
    /// Angle at `start`, radians in [0, 2π)
    pub start_angle: f32,
    /// Time for one full revolution
    pub period: Duration,
    pub distance: f32,
    /// World-space position at the last update
    pub position: Point3<f32>,
}

impl OrbitLight {
    pub fn new(period: Duration, distance: f32) -> Self {
        Self {
            animating: false,
            start: Duration::ZERO,
            start_angle: 0.0,
            period,
            distance,
            position: Point3::new(distance, 0.0, 0.0),
        }
    }

    /// Orbit angle at `now`, continuing from `start_angle`.
    pub fn angle_at(&self, now: Duration) -> f32 {
        let period = self.period.as_nanos().max(1);
        let elapsed = now.saturating_sub(self.start).as_nanos() % period;
        let fraction = elapsed as f64 / period as f64;
        wrap_angle(fraction as f32 * TAU + self.start_angle)
    }

    /// Angle of the current position, inverse of [`position_at_angle`](Self::position_at_angle).
    pub fn current_angle(&self) -> f32 {
        wrap_angle((-self.position.z).atan2(self.position.x))
    }

    pub fn position_at_angle(&self, angle: f32) -> Point3<f32> {
        Point3::new(
            self.distance * angle.cos(),
            0.0,
            -self.distance * angle.sin(),
        )
    }

    /// Move the light to where it should be at `now`. No-op while paused.
    pub fn update(&mut self, now: Duration) {
        if self.animating {
            self.position = self.position_at_angle(self.angle_at(now));
        }
    }

    /// Pause or resume.
    ///
    /// Pausing captures the angle of the position at `now` as the next
    /// `start_angle`, so resuming continues from the same place.
    pub fn toggle(&mut self, now: Duration) -> bool {
        if self.animating {
            self.update(now);
            self.start_angle = self.current_angle();
        }
        self.animating = !self.animating;
        self.start = now;
        tracing::debug!(
            animating = self.animating,
            start_angle = self.start_angle,
            "orbit light toggled"
        );
        self.animating
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Light of a scene: which source is active plus its colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub mode: LightMode,
    pub orbit: OrbitLight,
    pub ambient: Color,
    pub color: Color,
}

impl LightState {
    pub fn new(period: Duration, distance: f32, ambient: Color, color: Color) -> Self {
        Self {
            mode: LightMode::Head,
            orbit: OrbitLight::new(period, distance),
            ambient,
            color,
        }
    }

    pub fn toggle_mode(&mut self) -> LightMode {
        self.mode = match self.mode {
            LightMode::Head => LightMode::Distant,
            LightMode::Distant => LightMode::Head,
        };
        tracing::debug!(mode = ?self.mode, "light mode switched");
        self.mode
    }

    /// Pause or resume the orbit; ignored while the head light is active.
    pub fn toggle_animation(&mut self, now: Duration) {
        if self.mode == LightMode::Distant {
            self.orbit.toggle(now);
        }
    }

    pub fn update(&mut self, now: Duration) {
        if self.mode == LightMode::Distant {
            self.orbit.update(now);
        }
    }

    /// Light position in view space for the given view matrix.
    pub fn resolve(&self, view: &Matrix4<f32>) -> ResolvedLight {
        let position = match self.mode {
            LightMode::Head => Point3::origin(),
            LightMode::Distant => view.transform_point(&self.orbit.position),
        };
        ResolvedLight {
            ambient: self.ambient,
            color: self.color,
            position,
        }
    }
}
