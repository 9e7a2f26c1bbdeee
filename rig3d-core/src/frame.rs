/// Per-frame orchestration: drain input, advance animation, compose draw calls
use nalgebra::{Matrix4, Vector3};
use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{translate, Command, CommandQueue, InputEvent, SceneKind};
use crate::light::{LightState, ResolvedLight};
use crate::material::{Material, TextureBindings, TextureSet};
use crate::model::Part;
use crate::projection::Perspective;
use crate::scene::{FigureScene, MoonScene, Scene};
use crate::trackball::{OrbitController, Viewport};
use crate::transform::{Transform, TransformStack};

/// Geometry a draw call refers to; the backend owns the vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Cube with edge [`BLOCK_SIZE`](crate::model::BLOCK_SIZE) centred at the origin
    Block,
    /// Unit sphere centred at the origin
    Sphere,
}

/// One draw call with every matrix the shaders need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub primitive: Primitive,
    pub part: Option<Part>,
    pub model: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
    pub normal: Matrix4<f32>,
    pub mvp: Matrix4<f32>,
    pub material: Material,
    pub textures: Option<TextureBindings>,
}

impl DrawItem {
    fn new(
        primitive: Primitive,
        part: Option<Part>,
        model: Matrix4<f32>,
        params: &FrameParams,
        material: Material,
        textures: Option<TextureBindings>,
    ) -> Self {
        let model_view = params.view * model;
        Self {
            primitive,
            part,
            model,
            model_view,
            normal: Transform::normal_matrix(&model_view),
            mvp: Transform::mvp(&model, &params.view, &params.projection),
            material,
            textures,
        }
    }
}

/// Values shared by every draw call of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub viewport: Viewport,
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub light: ResolvedLight,
    /// Non-fatal problem to show the user
    pub warning: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub params: FrameParams,
    pub draws: Vec<DrawItem>,
}

/// Sink for composed frames.
pub trait RenderBackend {
    type Error;

    /// Clear the target and take the frame-wide uniforms.
    fn begin_frame(&mut self, params: &FrameParams) -> std::result::Result<(), Self::Error>;

    fn draw(&mut self, item: &DrawItem) -> std::result::Result<(), Self::Error>;

    fn end_frame(&mut self) -> std::result::Result<(), Self::Error>;
}

/// Everything one scene mutates between frames.
pub struct SceneState {
    pub orbit: OrbitController,
    pub projection: Perspective,
    pub light: LightState,
    pub scene: Scene,
    stack: TransformStack,
}

impl SceneState {
    pub fn new(kind: SceneKind, config: &Config, viewport: Viewport) -> Self {
        let (eye, projection, scene) = match kind {
            SceneKind::Figure => (
                config.figure.eye,
                config.figure.projection,
                Scene::Figure(FigureScene::new(&config.figure)),
            ),
            SceneKind::Moon => (
                config.moon.eye,
                config.moon.projection,
                Scene::Moon(MoonScene::new(&config.moon)),
            ),
        };
        let light = &config.moon.light;

        let mut stack = TransformStack::new();
        stack.clear();

        Self {
            orbit: OrbitController::new(Vector3::from(eye), viewport),
            projection: projection.into_perspective(viewport.width, viewport.height),
            light: LightState::new(light.period(), light.distance, light.ambient, light.color),
            scene,
            stack,
        }
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }
}

/// Owns the scene state and turns queued input into frames.
pub struct FrameComposer {
    kind: SceneKind,
    joint_step: f32,
    state: SceneState,
    queue: CommandQueue,
}

impl FrameComposer {
    pub fn new(kind: SceneKind, config: &Config, viewport: Viewport) -> Self {
        tracing::info!(?kind, ?viewport, "scene ready");
        Self {
            kind,
            joint_step: config.figure.joint_step,
            state: SceneState::new(kind, config, viewport),
            queue: CommandQueue::new(),
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Tell the sphere scene which textures the backend has.
    pub fn set_textures(&mut self, textures: TextureSet) {
        if let Scene::Moon(moon) = &mut self.state.scene {
            moon.textures = textures;
        }
    }

    /// Queue whatever command `event` maps to in this scene.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if let Some(command) = translate(self.kind, event, self.joint_step) {
            self.enqueue(command);
        }
    }

    pub fn enqueue(&mut self, command: Command) {
        self.queue.push(command);
    }

    /// Apply queued commands, advance animation to `now` and compose the frame.
    pub fn step(&mut self, now: Duration) -> Result<Frame> {
        let commands: Vec<Command> = self.queue.drain().collect();
        for command in commands {
            self.apply(command, now);
        }

        if let Scene::Figure(figure) = &mut self.state.scene {
            figure.update();
        }
        self.state.light.update(now);

        self.compose()
    }

    /// Step and hand the frame to `backend`: begin, one draw per primitive, end.
    pub fn render<B>(&mut self, now: Duration, backend: &mut B) -> std::result::Result<(), B::Error>
    where
        B: RenderBackend,
        B::Error: From<Error>,
    {
        let frame = self.step(now)?;
        backend.begin_frame(&frame.params)?;
        for item in &frame.draws {
            backend.draw(item)?;
        }
        backend.end_frame()
    }

    fn apply(&mut self, command: Command, now: Duration) {
        let state = &mut self.state;
        match (command, &mut state.scene) {
            (Command::BeginDrag { x, y, motion }, _) => state.orbit.begin(x, y, motion),
            (Command::Drag { x, y }, _) => state.orbit.move_to(x, y),
            (Command::EndDrag, _) => state.orbit.end(),
            (Command::Resize(viewport), _) => {
                state.orbit.set_viewport(viewport);
                state.projection.set_viewport(viewport.width, viewport.height);
            }
            (Command::AdjustJoint { joint, delta }, Scene::Figure(figure)) => {
                figure.adjust_joint(joint, delta)
            }
            (Command::ResetPose, Scene::Figure(figure)) => figure.reset_pose(),
            (Command::ToggleGait, Scene::Figure(figure)) => figure.toggle_gait(),
            (Command::ToggleLightMode, _) => {
                state.light.toggle_mode();
            }
            (Command::ToggleLightOrbit, _) => state.light.toggle_animation(now),
            (Command::SetSurface(stage), Scene::Moon(moon)) => moon.set_surface(stage),
            (command, _) => tracing::trace!(?command, "command does not apply to this scene"),
        }
    }

    fn compose(&mut self) -> Result<Frame> {
        let state = &mut self.state;
        let view = state.orbit.view_matrix();
        let params = FrameParams {
            viewport: state.orbit.viewport(),
            projection: state.projection.matrix(),
            view,
            light: state.light.resolve(&view),
            warning: match &state.scene {
                Scene::Moon(moon) => moon.warning(),
                Scene::Figure(_) => None,
            },
        };

        let stack = &mut state.stack;
        let depth = stack.depth();
        let draws: Vec<DrawItem> = match &state.scene {
            Scene::Figure(figure) => figure
                .model
                .traverse(stack)?
                .into_iter()
                .map(|p| {
                    DrawItem::new(
                        Primitive::Block,
                        Some(p.part),
                        p.transform,
                        &params,
                        Material::Flat(p.color),
                        None,
                    )
                })
                .collect(),
            Scene::Moon(moon) => stack.scoped(|stack| {
                stack.multiply(&Transform::scale(moon.radius, moon.radius, moon.radius));
                Ok(vec![DrawItem::new(
                    Primitive::Sphere,
                    None,
                    stack.top(),
                    &params,
                    Material::Phong(moon.material),
                    Some(moon.bindings()),
                )])
            })?,
        };

        if stack.depth() != depth {
            tracing::error!(expected = depth, found = stack.depth(), "render pass aborted");
            return Err(Error::UnbalancedStack {
                expected: depth,
                found: stack.depth(),
            });
        }

        tracing::trace!(draws = draws.len(), "frame composed");
        Ok(Frame { params, draws })
    }
}
