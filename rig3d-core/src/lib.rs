/// rig3d core library - scene state and frame composition
///
/// Everything here is backend-agnostic: transforms, the trackball camera,
/// the articulated figure, lighting and the per-frame command pipeline.
/// Front ends feed [`InputEvent`]s in and receive [`Frame`]s through a
/// [`RenderBackend`].

pub mod animation;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod light;
pub mod material;
pub mod model;
pub mod projection;
pub mod scene;
pub mod trackball;
pub mod transform;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use frame::{DrawItem, Frame, FrameComposer, FrameParams, Primitive, RenderBackend};
pub use geometry::{Mesh, Triangle, Vertex};
pub use input::{Command, InputEvent, Modifiers, PointerButton, SceneKind};
pub use model::{ArticulatedModel, Joint, JointAngles, Part};
pub use projection::Perspective;
pub use trackball::{Motion, OrbitController, Viewport};
pub use transform::{Transform, TransformStack};
