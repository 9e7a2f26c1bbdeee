//! End-to-end tests driving both scenes through the frame composer
//!
//! Every test feeds raw input events in and inspects the composed frames, the
//! way a front end would.

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use rig3d_core::{
    projection::project_to_screen, Config, Frame, FrameComposer, InputEvent, Modifiers,
    Part, PointerButton, SceneKind, Transform, Viewport,
};
use std::time::Duration;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn composer(kind: SceneKind) -> FrameComposer {
    FrameComposer::new(kind, &Config::default(), Viewport::new(800, 600))
}

fn drag(composer: &mut FrameComposer, from: (f32, f32), to: (f32, f32), modifiers: Modifiers) {
    composer.handle_input(&InputEvent::PointerDown {
        x: from.0,
        y: from.1,
        button: PointerButton::Primary,
        modifiers,
    });
    composer.handle_input(&InputEvent::PointerMove { x: to.0, y: to.1 });
    composer.handle_input(&InputEvent::PointerUp {
        button: PointerButton::Primary,
    });
}

fn part(frame: &Frame, part: Part) -> Matrix4<f32> {
    frame
        .draws
        .iter()
        .find(|d| d.part == Some(part))
        .unwrap()
        .model
}

mod camera {
    use super::*;

    #[test]
    fn default_moon_view_looks_down_negative_z() {
        let mut composer = composer(SceneKind::Moon);
        let frame = composer.step(ms(0)).unwrap();
        assert_relative_eq!(
            frame.params.view,
            Matrix4::new_translation(&Vector3::new(0.0, 0.0, -1000.0)),
            epsilon = 1e-4
        );

        // The sphere centre lands in the middle of the viewport.
        let (x, y, depth) =
            project_to_screen(&frame.draws[0].mvp, &Point3::origin(), 800, 600).unwrap();
        assert_relative_eq!(x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(y, 300.0, epsilon = 1e-3);
        assert!((-1.0..=1.0).contains(&depth));
    }

    #[test]
    fn pan_moves_eye_in_screen_plane() {
        let mut composer = composer(SceneKind::Moon);
        let shift = Modifiers {
            shift: true,
            ctrl: false,
        };
        // Quarter of the viewport to the right: 0.5 in NDC.
        drag(&mut composer, (400.0, 300.0), (600.0, 300.0), shift);
        composer.step(ms(0)).unwrap();

        let eye = composer.state().orbit.eye();
        assert_relative_eq!(eye.x, -200.0, epsilon = 1e-3);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(eye.z, 1000.0, epsilon = 1e-3);
    }

    #[test]
    fn zoom_moves_eye_along_z() {
        let mut composer = composer(SceneKind::Moon);
        let ctrl = Modifiers {
            shift: false,
            ctrl: true,
        };
        // Dragging up by a quarter of the height pulls the eye in.
        drag(&mut composer, (400.0, 300.0), (400.0, 150.0), ctrl);
        composer.step(ms(0)).unwrap();
        assert_relative_eq!(composer.state().orbit.eye().z, 850.0, epsilon = 1e-3);
    }

    #[test]
    fn rotation_persists_after_release() {
        let mut composer = composer(SceneKind::Figure);
        drag(&mut composer, (400.0, 300.0), (450.0, 280.0), Modifiers::default());
        composer.step(ms(0)).unwrap();
        let orientation = composer.state().orbit.orientation();
        assert_ne!(orientation, UnitQuaternion::identity());

        // Moving without a button held changes nothing.
        composer.handle_input(&InputEvent::PointerMove { x: 10.0, y: 10.0 });
        composer.step(ms(16)).unwrap();
        assert_eq!(composer.state().orbit.orientation(), orientation);
    }
}

mod figure {
    use super::*;

    #[test]
    fn identical_input_gives_identical_frames() {
        let events = [
            InputEvent::Key('s'),
            InputEvent::Key('s'),
            InputEvent::Key('.'),
            InputEvent::PointerDown {
                x: 100.0,
                y: 100.0,
                button: PointerButton::Primary,
                modifiers: Modifiers::default(),
            },
            InputEvent::PointerMove { x: 180.0, y: 140.0 },
            InputEvent::PointerLeave,
            InputEvent::Key(' '),
        ];

        let run = || {
            let mut composer = composer(SceneKind::Figure);
            let mut frames = Vec::new();
            for (i, event) in events.iter().enumerate() {
                composer.handle_input(event);
                frames.push(composer.step(ms(i as u64 * 16)).unwrap());
            }
            frames
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn walking_arms_mirror_each_other() {
        let mut composer = composer(SceneKind::Figure);
        composer.handle_input(&InputEvent::Key(' '));
        let half_turn = Transform::rotation_y(180.0);
        for frame in 0..25 {
            let frame = composer.step(ms(frame * 16)).unwrap();
            let left = part(&frame, Part::LeftArm);
            let right = part(&frame, Part::RightArm);
            assert_relative_eq!(right, half_turn * left * half_turn, epsilon = 1e-3);
        }
    }

    #[test]
    fn stopping_the_gait_freezes_the_pose() {
        let mut composer = composer(SceneKind::Figure);
        composer.handle_input(&InputEvent::Key(' '));
        for frame in 0..3 {
            composer.step(ms(frame * 16)).unwrap();
        }
        composer.handle_input(&InputEvent::Key(' '));
        let frozen = composer.step(ms(48)).unwrap();
        let later = composer.step(ms(64)).unwrap();
        assert_eq!(
            part(&frozen, Part::LeftLeg),
            part(&later, Part::LeftLeg)
        );
        assert_ne!(part(&frozen, Part::LeftLeg), part(&frozen, Part::RightLeg));
    }

    #[test]
    fn reset_returns_to_rest_pose() {
        let mut composer = composer(SceneKind::Figure);
        let rest = composer.step(ms(0)).unwrap();
        for key in ['s', 's', 'e', ',', 'x'] {
            composer.handle_input(&InputEvent::Key(key));
        }
        let posed = composer.step(ms(16)).unwrap();
        assert_ne!(posed.draws, rest.draws);

        composer.handle_input(&InputEvent::Key('r'));
        let reset = composer.step(ms(32)).unwrap();
        assert_eq!(reset.draws, rest.draws);
    }

    #[test]
    fn stack_stays_balanced_over_many_frames() {
        let mut composer = composer(SceneKind::Figure);
        composer.handle_input(&InputEvent::Key(' '));
        for frame in 0..100u64 {
            if frame % 7 == 0 {
                composer.handle_input(&InputEvent::Key('.'));
            }
            let drawn = composer.step(ms(frame * 16)).unwrap();
            assert_eq!(drawn.draws.len(), 11);
            assert_eq!(composer.state().stack_depth(), 1);
        }
    }

    #[test]
    fn joint_keys_ignored_in_moon_scene() {
        let mut composer = composer(SceneKind::Moon);
        let before = composer.step(ms(0)).unwrap();
        composer.handle_input(&InputEvent::Key('s'));
        assert_eq!(composer.pending(), 0);
        assert_eq!(composer.step(ms(0)).unwrap(), before);
    }
}

mod moon {
    use super::*;

    fn light(frame: &Frame) -> Point3<f32> {
        frame.params.light.position
    }

    #[test]
    fn orbit_pauses_and_resumes_where_it_stopped() {
        let mut composer = composer(SceneKind::Moon);
        composer.handle_input(&InputEvent::Key('l'));
        composer.handle_input(&InputEvent::Key(' '));
        composer.step(ms(0)).unwrap();
        let moving = light(&composer.step(ms(1000)).unwrap());

        composer.handle_input(&InputEvent::Key(' '));
        let paused = light(&composer.step(ms(1000)).unwrap());
        assert_relative_eq!(paused, moving, epsilon = 1e-1);

        // Nothing moves while paused.
        let still = light(&composer.step(ms(4000)).unwrap());
        assert_relative_eq!(still, paused, epsilon = 1e-1);

        composer.handle_input(&InputEvent::Key(' '));
        let resumed = light(&composer.step(ms(7000)).unwrap());
        assert_relative_eq!(resumed, paused, epsilon = 1.0);

        let next = light(&composer.step(ms(7016)).unwrap());
        let step = (next - resumed).norm();
        // One frame at 10000 units and a 5 s period is about 201 units of arc.
        assert!(step > 150.0 && step < 250.0, "step was {step}");
    }

    #[test]
    fn space_does_nothing_under_head_light() {
        let mut composer = composer(SceneKind::Moon);
        composer.handle_input(&InputEvent::Key(' '));
        let frame = composer.step(ms(500)).unwrap();
        assert!(!composer.state().light.orbit.animating);
        assert_eq!(light(&frame), Point3::origin());
    }

    #[test]
    fn config_overrides_reach_the_scene() {
        let config = Config::parse("(moon: (radius: 250.0, eye: (0.0, 0.0, 600.0)))").unwrap();
        let mut composer = FrameComposer::new(SceneKind::Moon, &config, Viewport::new(640, 480));
        let frame = composer.step(ms(0)).unwrap();
        assert_relative_eq!(frame.draws[0].model, Transform::scale(250.0, 250.0, 250.0));
        assert_relative_eq!(
            frame.params.view,
            Matrix4::new_translation(&Vector3::new(0.0, 0.0, -600.0)),
            epsilon = 1e-4
        );
    }
}
