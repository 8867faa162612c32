/// Per-frame orchestration: projection, painter's ordering and draw calls
use nalgebra::Point2;

use crate::color::{Color, COLORS};
use crate::geometry::{Mesh, TexCoord, Texture};
use crate::projection::{ProjectedPoint, Viewport};
use crate::shading::{self, light_direction};
use crate::view::ViewState;

pub const EDGE_WIDTH: u32 = 2;
pub const VERTEX_RADIUS: u32 = 3;
/// Length of a normal indicator in model units at scale 1
pub const NORMAL_LENGTH: f32 = 0.5;
pub const NORMAL_COLOR: Color = Color::YELLOW;

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Bounding box of `points` clipped to the viewport; `None` if empty
    pub fn clipped_bounds(points: &[Point2<i32>], viewport: Viewport) -> Option<Self> {
        let min_x = points.iter().map(|p| p.x).min()?.max(0);
        let max_x = points.iter().map(|p| p.x).max()?.min(viewport.width as i32);
        let min_y = points.iter().map(|p| p.y).min()?.max(0);
        let max_y = points.iter().map(|p| p.y).max()?.min(viewport.height as i32);
        if min_x >= max_x || min_y >= max_y {
            return None;
        }
        Some(Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x) as u32,
            height: (max_y - min_y) as u32,
        })
    }
}

/// A 2D drawing target
pub trait Surface {
    fn size(&self) -> Viewport;

    fn clear(&mut self, color: Color);

    fn fill_polygon(&mut self, points: &[Point2<i32>], color: Color);

    fn draw_line(&mut self, start: Point2<i32>, end: Point2<i32>, color: Color, width: u32);

    fn draw_circle(&mut self, center: Point2<i32>, radius: u32, color: Color);

    /// Draw `texture` stretched over `rect`
    fn blit_image(&mut self, rect: Rect, texture: &Texture);

    /// Fill a polygon with a texture. By default the texture is stretched
    /// over the polygon's on-screen bounding box.
    fn fill_textured_polygon(
        &mut self,
        points: &[Point2<i32>],
        _uvs: &[TexCoord],
        texture: &Texture,
    ) {
        if let Some(rect) = Rect::clipped_bounds(points, self.size()) {
            self.blit_image(rect, texture);
        }
    }
}

/// What one frame drew, and how many elements it had to skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub faces: usize,
    pub edges: usize,
    pub vertices: usize,
    pub normals: usize,
    pub skipped: usize,
}

/// Draws a mesh under the current view state
#[derive(Debug, Default)]
pub struct FrameRenderer {
    /// Projected vertices of the frame in progress
    projected: Vec<ProjectedPoint>,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one frame. Elements that reference missing vertices are skipped;
    /// nothing here aborts the frame.
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        mesh: &Mesh,
        view: &ViewState,
    ) -> FrameStats {
        let viewport = surface.size();
        let mut stats = FrameStats::default();

        surface.clear(view.colors.background());

        self.projected.clear();
        self.projected
            .extend(mesh.vertices.iter().map(|v| view.camera.project(v, viewport)));

        if !view.wireframe {
            self.draw_faces(surface, mesh, view, &mut stats);
        }
        self.draw_edges(surface, mesh, view, &mut stats);
        if view.show_vertices {
            for point in &self.projected {
                surface.draw_circle(point.screen(), VERTEX_RADIUS, view.colors.vertex);
                stats.vertices += 1;
            }
        }
        if view.show_normals {
            self.draw_normals(surface, mesh, view, &mut stats);
        }

        stats
    }

    fn draw_faces<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        mesh: &Mesh,
        view: &ViewState,
        stats: &mut FrameStats,
    ) {
        let depths: Vec<f32> = self.projected.iter().map(|p| p.depth).collect();
        let order = shading::order_faces_back_to_front(&mesh.faces, &depths);
        let polygons = mesh.faces.iter().filter(|f| f.is_polygon()).count();
        stats.skipped += polygons - order.len();

        // The light is fixed to the model, not the camera
        let light = light_direction();

        for index in order {
            let face = &mesh.faces[index];
            let points: Vec<Point2<i32>> = match face.gather(&self.projected) {
                Ok(projected) => projected.iter().map(ProjectedPoint::screen).collect(),
                Err(e) => {
                    log::debug!("Error rendering face {}: {}", index, e);
                    stats.skipped += 1;
                    continue;
                }
            };

            if let Some(texture) = mesh.texture_for(face) {
                surface.fill_textured_polygon(&points, &mesh.face_uvs(face), texture);
                stats.faces += 1;
                continue;
            }

            let mut color = COLORS[index % COLORS.len()];
            if view.lighting {
                match shading::face_normal_and_centroid(&mesh.vertices, &face.vertices) {
                    Ok((normal, _)) => {
                        let intensity = shading::lighting_intensity(&normal, &light);
                        color = shading::shade(color, intensity);
                    }
                    Err(e) => {
                        log::debug!("Error shading face {}: {}", index, e);
                        stats.skipped += 1;
                        continue;
                    }
                }
            }
            surface.fill_polygon(&points, color);
            stats.faces += 1;
        }
    }

    fn draw_edges<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        mesh: &Mesh,
        view: &ViewState,
        stats: &mut FrameStats,
    ) {
        for &(a, b) in &mesh.edges {
            match (self.projected.get(a), self.projected.get(b)) {
                (Some(start), Some(end)) => {
                    surface.draw_line(start.screen(), end.screen(), view.colors.edge, EDGE_WIDTH);
                    stats.edges += 1;
                }
                _ => {
                    log::debug!("Invalid edge: ({}, {})", a, b);
                    stats.skipped += 1;
                }
            }
        }
    }

    fn draw_normals<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        mesh: &Mesh,
        view: &ViewState,
        stats: &mut FrameStats,
    ) {
        let viewport = surface.size();
        for (index, face) in mesh.faces.iter().enumerate() {
            if !face.is_polygon() {
                continue;
            }
            match shading::face_normal_and_centroid(&mesh.vertices, &face.vertices) {
                Ok((normal, centroid)) => {
                    let tip = centroid + normal * (NORMAL_LENGTH * view.camera.scale);
                    let start = view.camera.project(&centroid, viewport);
                    let end = view.camera.project(&tip, viewport);
                    surface.draw_line(start.screen(), end.screen(), NORMAL_COLOR, EDGE_WIDTH);
                    stats.normals += 1;
                }
                Err(e) => {
                    log::debug!("Error drawing normal of face {}: {}", index, e);
                    stats.skipped += 1;
                }
            }
        }
    }
}
