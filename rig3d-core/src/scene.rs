/// The two fixed scenes: the block figure and the textured sphere
use crate::animation::AnimationDriver;
use crate::config::{FigureConfig, MoonConfig};
use crate::material::{PhongMaterial, SurfaceStage, TextureBindings, TextureSet};
use crate::model::{ArticulatedModel, Joint, JointAngles};

/// Shown while the requested surface needs a texture the backend lacks.
pub const MISSING_TEXTURE_WARNING: &str = "texture unavailable, showing plain surface";

/// Block figure with keyboard-driven joints and a walking gait.
pub struct FigureScene {
    pub model: ArticulatedModel,
    pub gait: AnimationDriver,
}

impl FigureScene {
    pub fn new(config: &FigureConfig) -> Self {
        Self {
            model: ArticulatedModel::new(),
            gait: AnimationDriver::new(config.gait_step),
        }
    }

    pub fn angles(&self) -> &JointAngles {
        &self.model.angles
    }

    /// Nudge a joint; arm and leg edits are dropped while the gait owns them.
    pub fn adjust_joint(&mut self, joint: Joint, delta: f32) {
        if self.gait.is_enabled() && joint.is_gait() {
            tracing::trace!(?joint, "joint edit ignored while walking");
            return;
        }
        self.model.angles.adjust(joint, delta);
    }

    /// Stop walking and return every joint to zero.
    pub fn reset_pose(&mut self) {
        self.gait.stop();
        self.model.angles = JointAngles::default();
    }

    pub fn toggle_gait(&mut self) {
        self.gait.toggle(&mut self.model.angles);
    }

    pub fn update(&mut self) {
        self.gait.update(&mut self.model.angles);
    }
}

/// Sphere with selectable surface detail.
pub struct MoonScene {
    pub radius: f32,
    pub material: PhongMaterial,
    pub surface: SurfaceStage,
    pub textures: TextureSet,
}

impl MoonScene {
    pub fn new(config: &MoonConfig) -> Self {
        Self {
            radius: config.radius,
            material: config.material,
            surface: SurfaceStage::Plain,
            textures: TextureSet::default(),
        }
    }

    pub fn bindings(&self) -> TextureBindings {
        TextureBindings::new(self.surface, self.textures)
    }

    pub fn set_surface(&mut self, stage: SurfaceStage) {
        self.surface = stage;
        let bindings = self.bindings();
        if bindings.is_degraded() {
            tracing::warn!(
                requested = ?stage,
                shown = ?bindings.effective_stage(),
                "{}",
                MISSING_TEXTURE_WARNING
            );
        }
    }

    pub fn warning(&self) -> Option<&'static str> {
        self.bindings()
            .is_degraded()
            .then_some(MISSING_TEXTURE_WARNING)
    }
}

pub enum Scene {
    Figure(FigureScene),
    Moon(MoonScene),
}
