/// Load-time mesh normalization and edge derivation
use nalgebra::Vector3;
use std::collections::BTreeSet;

use crate::geometry::{Edge, Face, Vertex};

/// Half-extent of the canonical bounding volume along the dominant axis
pub const TARGET_EXTENT: f32 = 2.0;

/// Center the vertices on their centroid and scale them so the largest
/// absolute coordinate equals [`TARGET_EXTENT`]. A single point (or a set of
/// identical points) is only re-centered.
pub fn normalize_vertices(vertices: &mut [Vertex]) {
    if vertices.is_empty() {
        return;
    }

    let sum: Vector3<f32> = vertices.iter().map(|v| v.coords).sum();
    let centroid = sum / vertices.len() as f32;
    for v in vertices.iter_mut() {
        v.coords -= centroid;
    }

    let max_distance = vertices
        .iter()
        .map(|v| v.coords.amax())
        .fold(0.0_f32, f32::max);
    if max_distance > 0.0 {
        let factor = TARGET_EXTENT / max_distance;
        for v in vertices.iter_mut() {
            v.coords *= factor;
        }
    }
}

/// Canonical `(min, max)` form of an undirected edge
pub fn canonical_edge(a: usize, b: usize) -> Edge {
    (a.min(b), a.max(b))
}

/// Union of every face's boundary edges (consecutive pairs plus the wraparound
/// pair), deduplicated and in ascending order
pub fn derive_edges(faces: &[Face]) -> Vec<Edge> {
    let mut edges = BTreeSet::new();
    for face in faces {
        let n = face.vertices.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            edges.insert(canonical_edge(face.vertices[i], face.vertices[(i + 1) % n]));
        }
    }
    edges.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_centers_and_scales() {
        let mut vertices = vec![
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(12.0, 0.0, 0.0),
            Point3::new(11.0, 1.0, 0.0),
        ];
        normalize_vertices(&mut vertices);

        let max = vertices.iter().map(|v| v.coords.amax()).fold(0.0, f32::max);
        assert_relative_eq!(max, 2.0, epsilon = 1e-6);
        assert_relative_eq!(vertices[0].x, -2.0, epsilon = 1e-6);
        assert_relative_eq!(vertices[1].x, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_single_point_left_unscaled() {
        let mut vertices = vec![Point3::new(3.0, -4.0, 5.0)];
        normalize_vertices(&mut vertices);
        assert_eq!(vertices[0], Point3::origin());
    }

    #[test]
    fn test_empty_is_noop() {
        let mut vertices: Vec<Vertex> = Vec::new();
        normalize_vertices(&mut vertices);
        assert!(vertices.is_empty());
    }

    #[test]
    fn test_triangle_edges() {
        let edges = derive_edges(&[Face::new(vec![0, 1, 2])]);
        assert_eq!(edges, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_shared_edges_deduplicated() {
        let faces = [Face::new(vec![0, 1, 2]), Face::new(vec![2, 1, 3])];
        assert_eq!(derive_edges(&faces), vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_short_faces_add_nothing() {
        assert!(derive_edges(&[Face::new(vec![4])]).is_empty());
        assert_eq!(derive_edges(&[Face::new(vec![4, 1])]), vec![(1, 4)]);
    }

    fn vertices_strategy() -> impl Strategy<Value = Vec<Vertex>> {
        prop::collection::vec(
            (-1000.0f32..1000.0, -1000.0f32..1000.0, -1000.0f32..1000.0)
                .prop_map(|(x, y, z)| Point3::new(x, y, z)),
            2..64,
        )
    }

    proptest! {
        /// Normalized vertices are centered on the origin and span [-2, 2]
        #[test]
        fn test_normalized_bounds(mut vertices in vertices_strategy()) {
            normalize_vertices(&mut vertices);

            let sum: Vector3<f32> = vertices.iter().map(|v| v.coords).sum();
            let centroid = sum / vertices.len() as f32;
            prop_assert!(centroid.amax() < 1e-3);

            let max = vertices.iter().map(|v| v.coords.amax()).fold(0.0, f32::max);
            if max > 0.0 {
                prop_assert!((max - TARGET_EXTENT).abs() < 1e-4);
            }
        }

        /// Rotating a face's vertex list does not change its edges
        #[test]
        fn test_edges_invariant_under_cyclic_shift(
            indices in prop::collection::vec(0usize..50, 3..12),
            shift in 0usize..12,
        ) {
            let mut rotated = indices.clone();
            rotated.rotate_left(shift % indices.len());

            let original = derive_edges(&[Face::new(indices)]);
            let shifted = derive_edges(&[Face::new(rotated.clone())]);
            prop_assert_eq!(&original, &shifted);

            let twice = derive_edges(&[Face::new(rotated.clone()), Face::new(rotated)]);
            prop_assert_eq!(&original, &twice);
        }
    }
}
