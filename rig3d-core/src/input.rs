/// Input events, the commands they turn into, and the per-frame command queue
use std::collections::VecDeque;

use crate::material::SurfaceStage;
use crate::model::Joint;
use crate::trackball::{Motion, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

/// Raw events from the input layer, coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        button: PointerButton,
    },
    /// Pointer left the viewport
    PointerLeave,
    Key(char),
    Resize {
        width: u32,
        height: u32,
    },
}

/// State changes requested by input, applied once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    BeginDrag { x: f32, y: f32, motion: Motion },
    Drag { x: f32, y: f32 },
    EndDrag,
    AdjustJoint { joint: Joint, delta: f32 },
    ResetPose,
    ToggleGait,
    ToggleLightMode,
    ToggleLightOrbit,
    SetSurface(SurfaceStage),
    Resize(Viewport),
}

/// Which of the two scenes is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Moon,
    Figure,
}

/// Map an input event to a command for `scene`.
///
/// `joint_step` is the number of degrees one key press moves a joint.
pub fn translate(scene: SceneKind, event: &InputEvent, joint_step: f32) -> Option<Command> {
    match *event {
        InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers,
        } => Some(Command::BeginDrag {
            x,
            y,
            motion: Motion::from_modifiers(modifiers.shift, modifiers.ctrl),
        }),
        InputEvent::PointerDown { .. } => None,
        InputEvent::PointerMove { x, y } => Some(Command::Drag { x, y }),
        InputEvent::PointerUp {
            button: PointerButton::Primary,
        }
        | InputEvent::PointerLeave => Some(Command::EndDrag),
        InputEvent::PointerUp { .. } => None,
        InputEvent::Resize { width, height } => {
            Some(Command::Resize(Viewport::new(width, height)))
        }
        InputEvent::Key(key) => match scene {
            SceneKind::Figure => figure_key(key, joint_step),
            SceneKind::Moon => moon_key(key),
        },
    }
}

fn figure_key(key: char, step: f32) -> Option<Command> {
    let (joint, delta) = match key {
        ',' => (Joint::Torso, -step),
        '.' => (Joint::Torso, step),
        'w' => (Joint::Head, -step),
        'e' => (Joint::Head, step),
        'a' => (Joint::LeftArm, -step),
        's' => (Joint::LeftArm, step),
        'd' => (Joint::RightArm, -step),
        'f' => (Joint::RightArm, step),
        'z' => (Joint::LeftLeg, -step),
        'x' => (Joint::LeftLeg, step),
        'c' => (Joint::RightLeg, -step),
        'v' => (Joint::RightLeg, step),
        'r' => return Some(Command::ResetPose),
        ' ' => return Some(Command::ToggleGait),
        _ => return None,
    };
    Some(Command::AdjustJoint { joint, delta })
}

fn moon_key(key: char) -> Option<Command> {
    match key {
        'l' => Some(Command::ToggleLightMode),
        ' ' => Some(Command::ToggleLightOrbit),
        digit => SurfaceStage::from_digit(digit).map(Command::SetSurface),
    }
}

/// FIFO of commands waiting for the next frame.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
