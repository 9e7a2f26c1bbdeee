/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector3, Vector4};
use rig3d_core::{
    material::{Color as Rgb, Material},
    model::BLOCK_SIZE,
    projection::project_to_screen,
    DrawItem, FrameParams, Mesh, Primitive, RenderBackend, Triangle,
};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light every flat-coloured face gets regardless of orientation
const FLAT_AMBIENT: f32 = 0.3;

const SPHERE_SLICES: u32 = 50;
const SPHERE_STACKS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: [u8; 3],
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: [0, 0, 0],
    };
}

/// ASCII renderer that rasterizes composed frames into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    block: Mesh,
    sphere: Mesh,
    params: Option<FrameParams>,
    warning: Option<&'static str>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::BLANK; size],
            block: Mesh::block(BLOCK_SIZE),
            sphere: Mesh::sphere(1.0, SPHERE_SLICES, SPHERE_STACKS),
            params: None,
            warning: None,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Resize the cell grid; contents are cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        let size = width * height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.cells = vec![Cell::BLANK; size];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::BLANK);
    }

    /// Glyph at a cell, mostly useful for inspecting a rendered frame.
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].glyph)
    }

    /// Warning carried by the last frame, if any.
    pub fn warning(&self) -> Option<&'static str> {
        self.warning
    }

    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.glyph != ' ').count()
    }

    fn render_triangle(&mut self, triangle: &Triangle, item: &DrawItem, params: &FrameParams) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match project_to_screen(
                &item.mvp,
                &vertex.position,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        let (intensity, color) = shade(triangle, item, params);

        let char_index = (intensity * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        // Lit geometry never disappears into the background
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let cell = Cell {
            glyph: LUMINOSITY_RAMP[char_index],
            color: to_rgb8(color),
        };

        self.rasterize_triangle(&screen_coords, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let [v0, v1, v2] = *coords;

        // Bounding box clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.cells[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    /// Write the cell grid starting at the top-left corner of the terminal.
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                if current != Some(cell.color) {
                    let [r, g, b] = cell.color;
                    writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    type Error = rig3d_core::Error;

    fn begin_frame(&mut self, params: &FrameParams) -> rig3d_core::Result<()> {
        self.clear();
        self.params = Some(*params);
        self.warning = params.warning;
        Ok(())
    }

    fn draw(&mut self, item: &DrawItem) -> rig3d_core::Result<()> {
        let Some(params) = self.params else {
            tracing::warn!("draw outside of a frame ignored");
            return Ok(());
        };
        let mesh = match item.primitive {
            Primitive::Block => std::mem::take(&mut self.block),
            Primitive::Sphere => std::mem::take(&mut self.sphere),
        };
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, item, &params);
        }
        match item.primitive {
            Primitive::Block => self.block = mesh,
            Primitive::Sphere => self.sphere = mesh,
        }
        Ok(())
    }

    fn end_frame(&mut self) -> rig3d_core::Result<()> {
        self.params = None;
        Ok(())
    }
}

/// Brightness in [0, 1] for the glyph and the RGB colour of a face.
fn shade(triangle: &Triangle, item: &DrawItem, params: &FrameParams) -> (f32, Rgb) {
    let [a, b, c] = &triangle.vertices;
    let centroid = Point3::from((a.position.coords + b.position.coords + c.position.coords) / 3.0);
    let position = item.model_view.transform_point(&centroid);

    let normal = a.normal + b.normal + c.normal;
    let normal = (item.normal * Vector4::new(normal.x, normal.y, normal.z, 0.0)).xyz();
    let normal = normal.try_normalize(1e-6).unwrap_or_else(Vector3::z);

    let to_light = (params.light.position - position)
        .try_normalize(1e-6)
        .unwrap_or_else(Vector3::z);
    let diffuse = normal.dot(&to_light).max(0.0);

    match item.material {
        Material::Flat(color) => {
            let intensity = FLAT_AMBIENT + (1.0 - FLAT_AMBIENT) * diffuse;
            (intensity, color.map(|c| c * intensity))
        }
        Material::Phong(phong) => {
            let to_eye = (-position.coords).try_normalize(1e-6).unwrap_or_else(Vector3::z);
            let reflected = 2.0 * normal.dot(&to_light) * normal - to_light;
            let specular = if diffuse > 0.0 {
                reflected.dot(&to_eye).max(0.0).powf(phong.shininess)
            } else {
                0.0
            };

            let light = params.light;
            let mut color = [0.0; 3];
            for i in 0..3 {
                color[i] = light.ambient[i] * phong.ambient[i]
                    + light.color[i] * (phong.diffuse[i] * diffuse + phong.specular[i] * specular);
            }
            let intensity = (0.2126 * color[0] + 0.7152 * color[1] + 0.0722 * color[2]).min(1.0);
            (intensity, color)
        }
    }
}

fn to_rgb8(color: Rgb) -> [u8; 3] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rig3d_core::{Config, FrameComposer, SceneKind, Viewport};
    use std::time::Duration;

    fn render(kind: SceneKind, cols: usize, rows: usize) -> AsciiRenderer {
        let viewport = Viewport::new(cols as u32 * 8, rows as u32 * 16);
        let mut composer = FrameComposer::new(kind, &Config::default(), viewport);
        let mut renderer = AsciiRenderer::new(cols, rows);
        composer.render(Duration::ZERO, &mut renderer).unwrap();
        renderer
    }

    #[test]
    fn test_barycentric_centroid() {
        let (w0, w1, w2) =
            barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert_relative_eq!(w0, 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(w1, 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(w2, 1.0 / 3.0, epsilon = 1e-6);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_sphere_fills_screen_centre() {
        let renderer = render(SceneKind::Moon, 80, 24);
        assert_ne!(renderer.glyph(40, 12), Some(' '));
        // Corners are outside the disc.
        assert_eq!(renderer.glyph(0, 0), Some(' '));
        assert_eq!(renderer.glyph(79, 23), Some(' '));
    }

    #[test]
    fn test_figure_is_drawn() {
        let renderer = render(SceneKind::Figure, 80, 24);
        assert!(renderer.covered_cells() > 0);
        assert!(renderer.covered_cells() < 80 * 24);
    }

    #[test]
    fn test_resize_clears_grid() {
        let mut renderer = render(SceneKind::Moon, 40, 12);
        renderer.resize(20, 10);
        assert_eq!(renderer.size(), (20, 10));
        assert_eq!(renderer.covered_cells(), 0);
        assert_eq!(renderer.glyph(20, 0), None);
    }

    #[test]
    fn test_present_writes_every_row() {
        let renderer = render(SceneKind::Moon, 10, 4);
        let mut out = Vec::new();
        renderer.present(&mut out).unwrap();
        assert!(!out.is_empty());
    }
}
