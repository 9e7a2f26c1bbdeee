/// Geometry primitives for the block figure and the sphere
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Add a quad as two triangles sharing the `a`-`c` diagonal.
    fn add_quad(&mut self, a: Vertex, b: Vertex, c: Vertex, d: Vertex) {
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    /// Axis-aligned cube centred at the origin, the building block of the figure.
    pub fn block(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // (normal, four corners counter-clockwise seen from outside)
        let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
            ([0.0, 0.0, -1.0], [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]]),
            ([0.0, 1.0, 0.0], [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]]),
            ([0.0, -1.0, 0.0], [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]),
            ([1.0, 0.0, 0.0], [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]]),
            ([-1.0, 0.0, 0.0], [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]]),
        ];

        for ([nx, ny, nz], corners) in faces {
            let [a, b, c, d] = corners.map(|[x, y, z]| Vertex::new(x, y, z, nx, ny, nz));
            mesh.add_quad(a, b, c, d);
        }

        mesh
    }

    /// UV sphere centred at the origin.
    ///
    /// `subdivisions_axis` slices around Y, `subdivisions_height` stacks pole to pole.
    pub fn sphere(radius: f32, subdivisions_axis: u32, subdivisions_height: u32) -> Self {
        let axis = subdivisions_axis.max(3);
        let height = subdivisions_height.max(2);

        let vertex = |x: u32, y: u32| {
            let theta = 2.0 * PI * x as f32 / axis as f32;
            let phi = PI * y as f32 / height as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let (sin_phi, cos_phi) = phi.sin_cos();
            let n = Vector3::new(cos_theta * sin_phi, cos_phi, sin_theta * sin_phi);
            Vertex::new(
                radius * n.x,
                radius * n.y,
                radius * n.z,
                n.x,
                n.y,
                n.z,
            )
        };

        let mut mesh = Self::with_capacity((axis * height * 2) as usize);
        for y in 0..height {
            for x in 0..axis {
                let a = vertex(x, y);
                let b = vertex(x + 1, y);
                let c = vertex(x + 1, y + 1);
                let d = vertex(x, y + 1);
                mesh.add_quad(a, b, c, d);
            }
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_block_spans_size() {
        let mesh = Mesh::block(3.0);
        assert_eq!(mesh.triangles.len(), 12);
        for triangle in &mesh.triangles {
            for v in &triangle.vertices {
                assert_relative_eq!(v.position.x.abs(), 1.5);
                assert_relative_eq!(v.position.y.abs(), 1.5);
                assert_relative_eq!(v.position.z.abs(), 1.5);
            }
        }
    }

    #[test]
    fn test_block_winding_faces_outward() {
        let mesh = Mesh::block(2.0);
        for triangle in &mesh.triangles {
            let [v0, v1, v2] = &triangle.vertices;
            let face = (v1.position - v0.position).cross(&(v2.position - v0.position));
            assert!(face.dot(&v0.normal) > 0.0);
        }
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = Mesh::sphere(500.0, 12, 8);
        assert_eq!(mesh.triangles.len(), 12 * 8 * 2);
        for triangle in &mesh.triangles {
            for v in &triangle.vertices {
                assert_relative_eq!(v.position.coords.norm(), 500.0, epsilon = 1e-2);
            }
        }
    }
}
