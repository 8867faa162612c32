/// Geometry primitives: faces, materials, textures and the canonical mesh
use nalgebra::{Point2, Point3};
use std::collections::HashMap;

use crate::color::Color;
use crate::error::{MeshError, Result};
use crate::normalize;

/// A vertex position in object space
pub type Vertex = Point3<f32>;

/// A (u, v) texture coordinate
pub type TexCoord = Point2<f32>;

/// An undirected edge stored as `(min, max)` vertex indices
pub type Edge = (usize, usize);

/// A polygon face referencing vertices (and optionally texture coordinates) by index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face {
    pub vertices: Vec<usize>,
    /// Parallel to `vertices`; `None` where the source gave no texture index
    pub tex_coords: Vec<Option<usize>>,
    pub material: Option<String>,
}

impl Face {
    pub fn new(vertices: Vec<usize>) -> Self {
        let tex_coords = vec![None; vertices.len()];
        Self {
            vertices,
            tex_coords,
            material: None,
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Faces with fewer than three vertices are kept but never drawn
    pub fn is_polygon(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Look up every vertex of this face in a per-vertex table
    pub fn gather<T: Copy>(&self, table: &[T]) -> Result<Vec<T>> {
        self.vertices
            .iter()
            .map(|&index| {
                table.get(index).copied().ok_or(MeshError::OutOfRangeIndex {
                    index,
                    count: table.len(),
                })
            })
            .collect()
    }
}

/// Decoded RGB image attached to a material
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels
            .get(y * self.width + x)
            .copied()
            .unwrap_or_default()
    }

    /// Nearest-neighbour lookup; u and v are clamped to [0, 1] and v points up
    pub fn sample(&self, uv: TexCoord) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);
        let x = (u * (self.width - 1) as f32).round() as usize;
        let y = ((1.0 - v) * (self.height - 1) as f32).round() as usize;
        self.pixel(x, y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub texture: Option<Texture>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: None,
        }
    }
}

/// A loaded model: normalized geometry plus its derived edge set
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub tex_coords: Vec<TexCoord>,
    pub faces: Vec<Face>,
    pub materials: HashMap<String, Material>,
    pub edges: Vec<Edge>,
}

impl Mesh {
    /// Build a mesh from parsed parts, centering and rescaling the vertices
    /// and deriving the edge set
    pub fn from_parts(
        name: impl Into<String>,
        mut vertices: Vec<Vertex>,
        tex_coords: Vec<TexCoord>,
        faces: Vec<Face>,
        materials: HashMap<String, Material>,
    ) -> Self {
        normalize::normalize_vertices(&mut vertices);
        let edges = normalize::derive_edges(&faces);
        Self {
            name: name.into(),
            vertices,
            tex_coords,
            faces,
            materials,
            edges,
        }
    }

    /// The fallback model: a [-1, 1] cube made of six quads
    pub fn default_cube() -> Self {
        let vertices = vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ];
        let faces = vec![
            Face::new(vec![0, 1, 2, 3]),
            Face::new(vec![4, 5, 6, 7]),
            Face::new(vec![0, 1, 5, 4]),
            Face::new(vec![2, 3, 7, 6]),
            Face::new(vec![0, 3, 7, 4]),
            Face::new(vec![1, 2, 6, 5]),
        ];
        Self::from_parts("Default Cube", vertices, Vec::new(), faces, HashMap::new())
    }

    /// The texture of a face's material, if the material exists and has one
    pub fn texture_for(&self, face: &Face) -> Option<&Texture> {
        let name = face.material.as_deref()?;
        self.materials.get(name)?.texture.as_ref()
    }

    /// Texture coordinates of a face, with `(0, 0)` standing in for missing ones
    pub fn face_uvs(&self, face: &Face) -> Vec<TexCoord> {
        face.tex_coords
            .iter()
            .map(|index| {
                index
                    .and_then(|i| self.tex_coords.get(i).copied())
                    .unwrap_or_else(TexCoord::origin)
            })
            .collect()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::default_cube()
    }
}
