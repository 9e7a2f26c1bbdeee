/// 3D transformation matrices and the hierarchical transform stack
use nalgebra::{Matrix4, Vector3};

use crate::error::{Error, Result};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about the X axis, angle in degrees
    pub fn rotation_x(degrees: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(degrees.to_radians(), 0.0, 0.0))
    }

    /// Rotation about the Y axis, angle in degrees
    pub fn rotation_y(degrees: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, degrees.to_radians(), 0.0))
    }

    /// Create a translation matrix
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a model-view-projection matrix
    pub fn mvp(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    /// Inverse transpose of a model-view matrix, used to carry normals into view space.
    pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix4<f32> {
        model_view
            .transpose()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }
}

/// LIFO stack of composed transforms.
///
/// The root identity entry is never removed, so `top()` always has a value.
#[derive(Debug, Clone)]
pub struct TransformStack {
    entries: Vec<Matrix4<f32>>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            entries: vec![Matrix4::identity()],
        }
    }

    /// Reset to a single identity entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries.push(Matrix4::identity());
    }

    /// Duplicate the current top.
    pub fn push(&mut self) {
        let top = self.top();
        self.entries.push(top);
    }

    /// Discard the top, restoring the previously composed transform.
    pub fn pop(&mut self) -> Result<()> {
        if self.entries.len() <= 1 {
            tracing::error!("transform stack underflow");
            return Err(Error::StackUnderflow);
        }
        self.entries.pop();
        Ok(())
    }

    /// Replace the top with `top * m`, so `m` acts in the local frame.
    pub fn multiply(&mut self, m: &Matrix4<f32>) {
        let last = self.entries.len() - 1;
        self.entries[last] = self.entries[last] * m;
    }

    pub fn top(&self) -> Matrix4<f32> {
        self.entries[self.entries.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Run `f` between a push and its matching pop.
    ///
    /// The pop happens even when `f` fails; the first error wins.
    pub fn scoped<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.push();
        let result = f(self);
        let popped = self.pop();
        let value = result?;
        popped?;
        Ok(value)
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_new_stack_has_identity_root() {
        let stack = TransformStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Matrix4::identity());
    }

    #[test]
    fn test_pop_on_root_fails() {
        let mut stack = TransformStack::new();
        assert!(matches!(stack.pop(), Err(Error::StackUnderflow)));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_multiply_composes_on_the_right() {
        let mut stack = TransformStack::new();
        let a = Transform::translation(1.0, 2.0, 3.0);
        let m = Transform::rotation_y(30.0);
        stack.multiply(&a);
        let previous = stack.top();

        stack.push();
        stack.multiply(&m);
        assert_eq!(stack.top(), previous * m);

        stack.pop().unwrap();
        assert_eq!(stack.top(), previous);
    }

    #[test]
    fn test_clear_resets_to_identity() {
        let mut stack = TransformStack::new();
        stack.push();
        stack.multiply(&Transform::scale(2.0, 2.0, 2.0));
        stack.push();
        stack.clear();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Matrix4::identity());
    }

    #[test]
    fn test_scoped_pops_on_error() {
        let mut stack = TransformStack::new();
        let result: Result<()> = stack.scoped(|s| {
            s.multiply(&Transform::translation(1.0, 0.0, 0.0));
            Err(Error::StackUnderflow)
        });
        assert!(result.is_err());
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Matrix4::identity());
    }

    #[test]
    fn test_rotation_helpers_use_degrees() {
        let r = Transform::rotation_y(90.0);
        let p = r.transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_matrix_of_rotation_is_rotation() {
        let r = Transform::rotation_x(40.0);
        assert_relative_eq!(Transform::normal_matrix(&r), r, epsilon = 1e-5);
    }

    proptest! {
        #[test]
        fn balanced_push_pop_restores_depth(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut stack = TransformStack::new();
            stack.push();
            let before = stack.depth();
            let mut opened = 0usize;
            for push in ops {
                if push {
                    stack.push();
                    stack.multiply(&Transform::rotation_x(5.0));
                    opened += 1;
                } else if opened > 0 {
                    stack.pop().unwrap();
                    opened -= 1;
                }
            }
            for _ in 0..opened {
                stack.pop().unwrap();
            }
            prop_assert_eq!(stack.depth(), before);
        }
    }
}
