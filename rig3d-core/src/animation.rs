/// Triangle-wave phase driver for the walking gait
use crate::model::{Joint, JointAngles};

/// Phase state of the gait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Always within [-1, 1]
    pub phase: f32,
    pub step: f32,
    /// +1 while rising, -1 while falling
    pub direction: f32,
    pub enabled: bool,
}

impl AnimationState {
    pub fn new(step: f32) -> Self {
        Self {
            phase: 0.0,
            step: step.abs(),
            direction: 1.0,
            enabled: false,
        }
    }

    /// Advance one frame and bounce off the ends of [-1, 1].
    pub fn advance(&mut self) -> f32 {
        self.phase += self.direction * self.step;
        if self.phase >= 1.0 {
            self.phase = 1.0;
            self.direction = -1.0;
        } else if self.phase <= -1.0 {
            self.phase = -1.0;
            self.direction = 1.0;
        }
        self.phase
    }
}

/// Drives arm and leg pitch from a shared phase while enabled.
///
/// Left and right limbs take opposite signs, so one arm swings forward while
/// the other swings back.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    state: AnimationState,
}

impl AnimationDriver {
    pub fn new(step: f32) -> Self {
        Self {
            state: AnimationState::new(step),
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Flip the gait on or off.
    ///
    /// Turning it on restarts the phase and zeroes every joint; turning it off
    /// leaves the pose frozen where it is.
    pub fn toggle(&mut self, angles: &mut JointAngles) -> bool {
        self.state.enabled = !self.state.enabled;
        if self.state.enabled {
            self.state.phase = 0.0;
            self.state.direction = 1.0;
            *angles = JointAngles::default();
        }
        tracing::debug!(enabled = self.state.enabled, "gait toggled");
        self.state.enabled
    }

    /// Stop without touching the pose.
    pub fn stop(&mut self) {
        self.state.enabled = false;
    }

    /// Advance one frame and write the gait joints. No-op while disabled.
    pub fn update(&mut self, angles: &mut JointAngles) {
        if !self.state.enabled {
            return;
        }
        let phase = self.state.advance();
        for joint in [Joint::LeftArm, Joint::LeftLeg] {
            if let Some(max) = joint.max_angle() {
                angles.set(joint, max * phase);
            }
        }
        for joint in [Joint::RightArm, Joint::RightLeg] {
            if let Some(max) = joint.max_angle() {
                angles.set(joint, -max * phase);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_direction_flips_at_bounds() {
        let mut state = AnimationState::new(0.25);
        let phases: Vec<f32> = (0..10).map(|_| state.advance()).collect();
        assert_eq!(
            phases,
            vec![0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25, 0.0, -0.25, -0.5]
        );
        assert_eq!(state.direction, -1.0);
    }

    #[test]
    fn test_toggle_on_resets_pose_and_phase() {
        let mut driver = AnimationDriver::new(0.1);
        let mut angles = JointAngles::default();
        angles.set(Joint::Head, 40.0);
        angles.set(Joint::LeftArm, 10.0);
        driver.state.phase = 0.6;
        driver.state.direction = -1.0;

        assert!(driver.toggle(&mut angles));
        assert_eq!(angles, JointAngles::default());
        assert_eq!(driver.state().phase, 0.0);
        assert_eq!(driver.state().direction, 1.0);
    }

    #[test]
    fn test_toggle_off_freezes_pose() {
        let mut driver = AnimationDriver::new(0.1);
        let mut angles = JointAngles::default();
        driver.toggle(&mut angles);
        for _ in 0..3 {
            driver.update(&mut angles);
        }
        let frozen = angles;
        assert!(!driver.toggle(&mut angles));
        driver.update(&mut angles);
        assert_eq!(angles, frozen);
    }

    #[test]
    fn test_limbs_move_in_opposition() {
        let mut driver = AnimationDriver::new(0.5);
        let mut angles = JointAngles::default();
        driver.toggle(&mut angles);
        driver.update(&mut angles);

        assert_relative_eq!(angles.get(Joint::LeftArm), 45.0);
        assert_relative_eq!(angles.get(Joint::RightArm), -45.0);
        assert_relative_eq!(angles.get(Joint::LeftLeg), 37.5);
        assert_relative_eq!(angles.get(Joint::RightLeg), -37.5);
        assert_eq!(angles.get(Joint::Head), 0.0);
    }

    proptest! {
        #[test]
        fn phase_stays_in_range(step in 0.001f32..2.0, frames in 1usize..500) {
            let mut state = AnimationState::new(step);
            let mut previous = state.phase;
            let mut direction = state.direction;
            for _ in 0..frames {
                let phase = state.advance();
                prop_assert!((-1.0..=1.0).contains(&phase));
                if state.direction != direction {
                    // Flips happen only on a boundary.
                    prop_assert!(phase == 1.0 || phase == -1.0);
                } else {
                    prop_assert!((phase - previous) * direction > 0.0);
                }
                previous = phase;
                direction = state.direction;
            }
        }
    }
}
