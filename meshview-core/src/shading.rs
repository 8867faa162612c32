/// Face normals, Lambert lighting and painter's-algorithm ordering
use nalgebra::{Point3, Vector3};

use crate::color::Color;
use crate::error::{MeshError, Result};
use crate::geometry::{Face, Vertex};

/// Fixed light direction: pointing from the viewer into the screen
pub fn light_direction() -> Vector3<f32> {
    Vector3::new(0.0, 0.0, -1.0)
}

/// Unit normal from the first three vertices, and the centroid of all of them.
///
/// A collinear face yields the zero vector, which lights to zero intensity.
pub fn face_normal_and_centroid(
    vertices: &[Vertex],
    face_indices: &[usize],
) -> Result<(Vector3<f32>, Point3<f32>)> {
    if face_indices.len() < 3 {
        return Err(MeshError::NotAPolygon {
            len: face_indices.len(),
        });
    }

    let points = face_indices
        .iter()
        .map(|&index| {
            vertices.get(index).ok_or(MeshError::OutOfRangeIndex {
                index,
                count: vertices.len(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let edge1 = points[1] - points[0];
    let edge2 = points[2] - points[0];
    let normal = edge1.cross(&edge2);
    let normal = normal.try_normalize(0.0).unwrap_or(normal);

    let sum: Vector3<f32> = points.iter().map(|p| p.coords).sum();
    let centroid = Point3::from(sum / points.len() as f32);

    Ok((normal, centroid))
}

/// Lambertian term, never negative
pub fn lighting_intensity(normal: &Vector3<f32>, light_dir: &Vector3<f32>) -> f32 {
    normal.dot(light_dir).max(0.0)
}

/// Base color darkened by a light intensity in [0, 1]
pub fn shade(base: Color, intensity: f32) -> Color {
    base.scaled(intensity)
}

/// Mean projected depth of a face
pub fn face_depth(face: &Face, depths: &[f32]) -> Result<f32> {
    if !face.is_polygon() {
        return Err(MeshError::NotAPolygon {
            len: face.vertices.len(),
        });
    }
    let values = face.gather(depths)?;
    Ok(values.iter().sum::<f32>() / values.len() as f32)
}

/// Indices of drawable faces, farthest first.
///
/// The sort is stable, so faces at equal depth keep their original order.
/// Faces with fewer than three vertices or with out-of-range indices are left
/// out.
pub fn order_faces_back_to_front(faces: &[Face], depths: &[f32]) -> Vec<usize> {
    let mut ordered: Vec<(usize, f32)> = faces
        .iter()
        .enumerate()
        .filter_map(|(i, face)| match face_depth(face, depths) {
            Ok(depth) => Some((i, depth)),
            Err(MeshError::NotAPolygon { .. }) => None,
            Err(e) => {
                log::debug!("face {}: {}", i, e);
                None
            }
        })
        .collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1));
    ordered.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> Vec<Vertex> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_normal_and_centroid() {
        let (normal, centroid) = face_normal_and_centroid(&triangle(), &[0, 1, 2]).unwrap();
        assert_relative_eq!(normal, Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(centroid, Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0));
    }

    #[test]
    fn test_centroid_uses_all_vertices() {
        let quad = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let (_, centroid) = face_normal_and_centroid(&quad, &[0, 1, 2, 3]).unwrap();
        assert_relative_eq!(centroid, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_degenerate_face_has_zero_normal() {
        let line = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let (normal, _) = face_normal_and_centroid(&line, &[0, 1, 2]).unwrap();
        assert_eq!(normal, Vector3::zeros());
        assert_eq!(lighting_intensity(&normal, &light_direction()), 0.0);
    }

    #[test]
    fn test_bad_faces_are_errors() {
        assert!(matches!(
            face_normal_and_centroid(&triangle(), &[0, 1]),
            Err(MeshError::NotAPolygon { len: 2 })
        ));
        assert!(matches!(
            face_normal_and_centroid(&triangle(), &[0, 1, 3]),
            Err(MeshError::OutOfRangeIndex { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_lighting_intensity() {
        let light = light_direction();
        assert_eq!(lighting_intensity(&-light, &light), 0.0);
        let facing = lighting_intensity(&light, &light);
        assert!(facing > 0.0 && facing <= 1.0);
        assert_relative_eq!(
            lighting_intensity(&Vector3::new(0.0, 0.6, -0.8), &light),
            0.8
        );
    }

    #[test]
    fn test_back_to_front_order() {
        let faces = vec![
            Face::new(vec![0, 1, 2]),
            Face::new(vec![3, 4, 5]),
            Face::new(vec![6, 7, 8]),
        ];
        let depths = [10.0, 10.0, 10.0, 3.0, 3.0, 3.0, 7.0, 7.0, 7.0];
        assert_eq!(order_faces_back_to_front(&faces, &depths), vec![0, 2, 1]);
    }

    #[test]
    fn test_order_is_stable_and_skips_bad_faces() {
        let faces = vec![
            Face::new(vec![0, 1, 2]),
            Face::new(vec![0, 1]),
            Face::new(vec![2, 1, 0]),
            Face::new(vec![0, 1, 9]),
        ];
        let depths = [1.0, 2.0, 3.0];
        assert_eq!(order_faces_back_to_front(&faces, &depths), vec![0, 2]);
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade(Color::GREEN, 1.0), Color::GREEN);
        assert_eq!(shade(Color::GREEN, 0.0), Color::BLACK);
    }
}
