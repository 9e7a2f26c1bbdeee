/// Articulated block figure: joint angles and hierarchical traversal
use nalgebra::{Matrix4, Vector3};

use crate::error::Result;
use crate::material::{rgb8, Color};
use crate::transform::{Transform, TransformStack};

/// Edge length of the block primitive every part is scaled from.
pub const BLOCK_SIZE: f32 = 3.0;

/// Rigid parts of the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Head,
    LeftEye,
    LeftEyeball,
    RightEye,
    RightEyeball,
    Mouth,
}

impl Part {
    /// Size in blocks.
    pub fn scale(self) -> Vector3<f32> {
        match self {
            Part::Head => Vector3::new(8.0, 8.0, 8.0),
            Part::Torso => Vector3::new(8.0, 12.0, 4.0),
            Part::LeftArm | Part::RightArm => Vector3::new(4.0, 12.0, 4.0),
            Part::LeftLeg | Part::RightLeg => Vector3::new(4.0, 12.0, 4.0),
            Part::LeftEye | Part::LeftEyeball | Part::RightEye | Part::RightEyeball => {
                Vector3::new(1.0, 1.0, 0.3)
            }
            Part::Mouth => Vector3::new(2.0, 1.0, 0.3),
        }
    }

    pub fn color(self) -> Color {
        match self {
            Part::Head => rgb8(170, 130, 110),
            Part::Torso => rgb8(0, 130, 130),
            Part::LeftArm | Part::RightArm => rgb8(110, 85, 70),
            Part::LeftLeg | Part::RightLeg => rgb8(50, 40, 120),
            Part::LeftEye | Part::RightEye => [1.0, 1.0, 1.0],
            Part::LeftEyeball | Part::RightEyeball => rgb8(70, 50, 120),
            Part::Mouth => rgb8(120, 65, 50),
        }
    }
}

/// Parts that carry a joint angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Torso,
    Head,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl Joint {
    pub const ALL: [Joint; 6] = [
        Joint::Torso,
        Joint::Head,
        Joint::LeftArm,
        Joint::RightArm,
        Joint::LeftLeg,
        Joint::RightLeg,
    ];

    /// Symmetric limit in degrees; the torso wraps instead.
    pub fn max_angle(self) -> Option<f32> {
        match self {
            Joint::Torso => None,
            Joint::Head => Some(90.0),
            Joint::LeftArm | Joint::RightArm => Some(90.0),
            Joint::LeftLeg | Joint::RightLeg => Some(75.0),
        }
    }

    /// Arms and legs are driven by the walking gait while it runs.
    pub fn is_gait(self) -> bool {
        matches!(
            self,
            Joint::LeftArm | Joint::RightArm | Joint::LeftLeg | Joint::RightLeg
        )
    }

    fn rotation(self, degrees: f32) -> Matrix4<f32> {
        match self {
            Joint::Torso | Joint::Head => Transform::rotation_y(degrees),
            _ => Transform::rotation_x(degrees),
        }
    }
}

/// Current joint angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointAngles {
    torso: f32,
    head: f32,
    left_arm: f32,
    right_arm: f32,
    left_leg: f32,
    right_leg: f32,
}

impl JointAngles {
    pub fn get(&self, joint: Joint) -> f32 {
        match joint {
            Joint::Torso => self.torso,
            Joint::Head => self.head,
            Joint::LeftArm => self.left_arm,
            Joint::RightArm => self.right_arm,
            Joint::LeftLeg => self.left_leg,
            Joint::RightLeg => self.right_leg,
        }
    }

    /// Store an angle, clamped to the joint's limit or wrapped into [0, 360) for the torso.
    pub fn set(&mut self, joint: Joint, degrees: f32) {
        let value = match joint.max_angle() {
            Some(max) => degrees.clamp(-max, max),
            None => {
                // rem_euclid can round up to exactly 360 for tiny negatives.
                let wrapped = degrees.rem_euclid(360.0);
                if wrapped >= 360.0 {
                    0.0
                } else {
                    wrapped
                }
            }
        };
        let slot = match joint {
            Joint::Torso => &mut self.torso,
            Joint::Head => &mut self.head,
            Joint::LeftArm => &mut self.left_arm,
            Joint::RightArm => &mut self.right_arm,
            Joint::LeftLeg => &mut self.left_leg,
            Joint::RightLeg => &mut self.right_leg,
        };
        *slot = value;
    }

    pub fn adjust(&mut self, joint: Joint, delta: f32) {
        self.set(joint, self.get(joint) + delta);
    }
}

/// World transform of one part, ready to draw the block primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartTransform {
    pub part: Part,
    pub transform: Matrix4<f32>,
    pub color: Color,
}

struct Node {
    part: Part,
    /// Translation applied before the joint rotation
    pivot: Vector3<f32>,
    joint: Option<Joint>,
    /// Translation applied after the joint rotation
    offset: Vector3<f32>,
    children: Vec<Node>,
}

impl Node {
    fn leaf(part: Part, offset: Vector3<f32>) -> Self {
        Self {
            part,
            pivot: Vector3::zeros(),
            joint: None,
            offset,
            children: Vec::new(),
        }
    }

    fn local(&self, angles: &JointAngles) -> [Matrix4<f32>; 3] {
        let rotation = match self.joint {
            Some(joint) => joint.rotation(angles.get(joint)),
            None => Matrix4::identity(),
        };
        [
            Matrix4::new_translation(&self.pivot),
            rotation,
            Matrix4::new_translation(&self.offset),
        ]
    }
}

fn figure(block: f32) -> Node {
    let torso = Part::Torso.scale();
    let arm = Part::LeftArm.scale();
    let leg = Part::LeftLeg.scale();
    let head = Part::Head.scale();

    let shoulder = Vector3::new(0.0, block * (arm.y - arm.x / 2.0), 0.0);
    let arm_x = block * (torso.x / 2.0 + arm.x / 2.0);
    let arm_y = block * (-arm.y + arm.x / 2.0);
    let leg_x = block * (torso.x / 2.0 - leg.x / 2.0);
    let leg_y = -torso.y * block;
    let face_y = block * head.y / 2.0;
    let face_z = block * head.z / 2.0;

    let limb = |part, joint, pivot, offset| Node {
        part,
        pivot,
        joint: Some(joint),
        offset,
        children: Vec::new(),
    };

    Node {
        part: Part::Torso,
        pivot: Vector3::zeros(),
        joint: Some(Joint::Torso),
        offset: Vector3::zeros(),
        children: vec![
            limb(
                Part::LeftArm,
                Joint::LeftArm,
                shoulder,
                Vector3::new(arm_x, arm_y, 0.0),
            ),
            limb(
                Part::RightArm,
                Joint::RightArm,
                shoulder,
                Vector3::new(-arm_x, arm_y, 0.0),
            ),
            limb(
                Part::LeftLeg,
                Joint::LeftLeg,
                Vector3::zeros(),
                Vector3::new(leg_x, leg_y, 0.0),
            ),
            limb(
                Part::RightLeg,
                Joint::RightLeg,
                Vector3::zeros(),
                Vector3::new(-leg_x, leg_y, 0.0),
            ),
            Node {
                part: Part::Head,
                pivot: Vector3::zeros(),
                joint: Some(Joint::Head),
                offset: Vector3::new(0.0, block * torso.y, 0.0),
                children: vec![
                    Node::leaf(Part::LeftEye, Vector3::new(2.5 * block, face_y, face_z)),
                    Node::leaf(Part::LeftEyeball, Vector3::new(1.5 * block, face_y, face_z)),
                    Node::leaf(Part::RightEye, Vector3::new(-2.5 * block, face_y, face_z)),
                    Node::leaf(Part::RightEyeball, Vector3::new(-1.5 * block, face_y, face_z)),
                    Node::leaf(Part::Mouth, Vector3::new(0.0, block, face_z)),
                ],
            },
        ],
    }
}

/// The block figure: a fixed part hierarchy plus its joint angles.
pub struct ArticulatedModel {
    root: Node,
    block: f32,
    pub angles: JointAngles,
}

impl ArticulatedModel {
    pub fn new() -> Self {
        Self {
            root: figure(BLOCK_SIZE),
            block: BLOCK_SIZE,
            angles: JointAngles::default(),
        }
    }

    /// Depth-first, pre-order walk producing one world transform per part.
    ///
    /// Every level pushes before descending and pops on the way out, so the
    /// stack ends at the depth it started from.
    pub fn traverse(&self, stack: &mut TransformStack) -> Result<Vec<PartTransform>> {
        let mut out = Vec::with_capacity(11);
        self.visit(&self.root, stack, &mut out)?;
        Ok(out)
    }

    fn visit(
        &self,
        node: &Node,
        stack: &mut TransformStack,
        out: &mut Vec<PartTransform>,
    ) -> Result<()> {
        stack.scoped(|stack| {
            for m in node.local(&self.angles) {
                stack.multiply(&m);
            }
            out.push(self.place_block(node.part, stack)?);
            for child in &node.children {
                self.visit(child, stack, out)?;
            }
            Ok(())
        })
    }

    /// Scale the block to the part's size with its base resting on the joint.
    fn place_block(&self, part: Part, stack: &mut TransformStack) -> Result<PartTransform> {
        stack.scoped(|stack| {
            let s = part.scale();
            stack.multiply(&Transform::scale(s.x, s.y, s.z));
            stack.multiply(&Transform::translation(0.0, self.block / 2.0, 0.0));
            Ok(PartTransform {
                part,
                transform: stack.top(),
                color: part.color(),
            })
        })
    }
}

impl Default for ArticulatedModel {
    fn default() -> Self {
        Self::new()
    }
}
