/// Trackball-style orbit camera controller
use nalgebra::{Isometry3, Matrix4, Point2, Point3, Unit, UnitQuaternion, Vector3};

/// What a held pointer button currently does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    #[default]
    Idle,
    Rotate,
    Pan,
    Zoom,
}

impl Motion {
    /// Shift pans, Ctrl zooms, a plain drag rotates.
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        if shift {
            Motion::Pan
        } else if ctrl {
            Motion::Zoom
        } else {
            Motion::Rotate
        }
    }
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Linear map from pixel coordinates to [-1, 1] on both axes (y still grows downward).
    pub fn to_ndc(&self, x: f32, y: f32) -> Point2<f32> {
        let width = self.width.max(1) as f32;
        let height = self.height.max(1) as f32;
        Point2::new(2.0 * x / width - 1.0, 2.0 * y / height - 1.0)
    }
}

/// Camera state accumulated from pointer drags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub orientation: UnitQuaternion<f32>,
    pub eye: Vector3<f32>,
    /// Last pointer sample in normalized device coordinates
    pub last: Point2<f32>,
    pub motion: Motion,
}

impl OrbitState {
    pub fn new(eye: Vector3<f32>) -> Self {
        Self {
            orientation: UnitQuaternion::identity(),
            eye,
            last: Point2::origin(),
            motion: Motion::Idle,
        }
    }
}

/// Converts pointer drags into orbit rotation, pan and zoom.
#[derive(Debug, Clone)]
pub struct OrbitController {
    state: OrbitState,
    default_eye: Vector3<f32>,
    viewport: Viewport,
}

impl OrbitController {
    pub fn new(eye: Vector3<f32>, viewport: Viewport) -> Self {
        Self {
            state: OrbitState::new(eye),
            default_eye: eye,
            viewport,
        }
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    pub fn orientation(&self) -> UnitQuaternion<f32> {
        self.state.orientation
    }

    pub fn eye(&self) -> Vector3<f32> {
        self.state.eye
    }

    pub fn motion(&self) -> Motion {
        self.state.motion
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Start a drag at pixel `(x, y)`.
    pub fn begin(&mut self, x: f32, y: f32, motion: Motion) {
        self.state.last = self.viewport.to_ndc(x, y);
        self.state.motion = motion;
        tracing::debug!(?motion, "drag started");
    }

    /// Continue the active drag to pixel `(x, y)`; ignored when no drag is active.
    pub fn move_to(&mut self, x: f32, y: f32) {
        if self.state.motion == Motion::Idle {
            return;
        }

        let pos = self.viewport.to_ndc(x, y);
        let last = self.state.last;
        let half_width = self.viewport.width as f32 / 2.0;
        let half_height = self.viewport.height as f32 / 2.0;

        match self.state.motion {
            Motion::Rotate => {
                let increment =
                    trackball(Point2::new(last.x, -last.y), Point2::new(pos.x, -pos.y));
                self.rotate(increment);
            }
            Motion::Pan => {
                self.state.eye.x -= (pos.x - last.x) * half_width;
                self.state.eye.y += (pos.y - last.y) * half_height;
            }
            Motion::Zoom => {
                self.state.eye.z += (pos.y - last.y) * half_height;
            }
            Motion::Idle => {}
        }

        self.state.last = pos;
    }

    pub fn end(&mut self) {
        if self.state.motion != Motion::Idle {
            tracing::debug!(motion = ?self.state.motion, "drag ended");
        }
        self.state.motion = Motion::Idle;
    }

    /// Compose a world-space increment on the left of the accumulated orientation.
    pub fn rotate(&mut self, increment: UnitQuaternion<f32>) {
        let mut orientation = increment * self.state.orientation;
        orientation.renormalize();
        self.state.orientation = orientation;
    }

    /// Back to identity orientation and the default eye.
    pub fn reset(&mut self) {
        self.state = OrbitState::new(self.default_eye);
    }

    /// `inverse(lookAt(eye, (eye.x, eye.y, 0), +Y)) * rotation(orientation)`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from(self.state.eye);
        let mut target = Point3::new(eye.x, eye.y, 0.0);
        if eye.z.abs() < f32::EPSILON {
            // Eye on the target plane; keep looking down -Z.
            target.z = eye.z - 1.0;
        }

        // look_at_rh is already the inverse of the camera's look-at frame.
        let view = Isometry3::look_at_rh(&eye, &target, &Vector3::y());
        view.to_homogeneous() * self.state.orientation.to_homogeneous()
    }
}

/// Lift a 2D point onto the unit hemisphere facing the viewer.
///
/// Points outside the unit disk land on its rim.
fn project_to_sphere(p: Point2<f32>) -> Vector3<f32> {
    let d2 = p.x * p.x + p.y * p.y;
    if d2 > 1.0 {
        let d = d2.sqrt();
        Vector3::new(p.x / d, p.y / d, 0.0)
    } else {
        Vector3::new(p.x, p.y, (1.0 - d2).max(0.0).sqrt())
    }
}

/// Incremental rotation carrying `from` to `to` on the arcball, y up.
///
/// The axis is `a × b` of the lifted points and the angle between them comes
/// from `atan2(|a × b|, a · b)`, which stays accurate for tiny drags. Identical
/// or opposite samples yield the identity.
pub fn trackball(from: Point2<f32>, to: Point2<f32>) -> UnitQuaternion<f32> {
    let a = project_to_sphere(from);
    let b = project_to_sphere(to);

    let axis = a.cross(&b);
    let angle = axis.norm().atan2(a.dot(&b));
    match Unit::try_new(axis, f32::EPSILON * f32::EPSILON) {
        Some(axis) => UnitQuaternion::from_axis_angle(&axis, angle),
        None => UnitQuaternion::identity(),
    }
}
