/// Surface descriptions handed to the rendering backend
use serde::Deserialize;

/// Linear RGB in 0..1
pub type Color = [f32; 3];

pub(crate) fn rgb8(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PhongMaterial {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            ambient: [0.8, 0.8, 0.75],
            diffuse: [0.8, 0.8, 0.75],
            specular: [0.0, 0.0, 0.0],
            shininess: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Single unlit colour, used by the figure's blocks
    Flat(Color),
    Phong(PhongMaterial),
}

impl Material {
    /// Colour a backend without lighting support should use.
    pub fn base_color(&self) -> Color {
        match self {
            Material::Flat(color) => *color,
            Material::Phong(phong) => phong.diffuse,
        }
    }
}

/// Which surface detail the sphere shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceStage {
    #[default]
    Plain,
    ColorMap,
    NormalMap,
    Face,
}

impl SurfaceStage {
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(SurfaceStage::Plain),
            '1' => Some(SurfaceStage::ColorMap),
            '2' => Some(SurfaceStage::NormalMap),
            '3' => Some(SurfaceStage::Face),
            _ => None,
        }
    }
}

/// Opaque handle to a texture owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Textures the backend managed to load. Any of them may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureSet {
    pub color_map: Option<TextureId>,
    pub normal_map: Option<TextureId>,
    pub face_map: Option<TextureId>,
}

/// Texture state attached to a draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBindings {
    /// Stage requested by the user
    pub stage: SurfaceStage,
    pub textures: TextureSet,
    /// Width and height of the face overlay in texture space
    pub face_extent: (f32, f32),
}

impl TextureBindings {
    pub const FACE_HEIGHT: f32 = 0.25;
    pub const FACE_WIDTH: f32 = Self::FACE_HEIGHT / 2.0;

    pub fn new(stage: SurfaceStage, textures: TextureSet) -> Self {
        Self {
            stage,
            textures,
            face_extent: (Self::FACE_WIDTH, Self::FACE_HEIGHT),
        }
    }

    /// The stage that can actually be drawn with the textures at hand.
    ///
    /// Each stage builds on the colour map, so losing it drops to `Plain`.
    pub fn effective_stage(&self) -> SurfaceStage {
        let t = &self.textures;
        match self.stage {
            SurfaceStage::Plain => SurfaceStage::Plain,
            _ if t.color_map.is_none() => SurfaceStage::Plain,
            SurfaceStage::ColorMap => SurfaceStage::ColorMap,
            SurfaceStage::NormalMap if t.normal_map.is_some() => SurfaceStage::NormalMap,
            SurfaceStage::Face if t.face_map.is_some() => SurfaceStage::Face,
            _ => SurfaceStage::ColorMap,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.effective_stage() != self.stage
    }
}
