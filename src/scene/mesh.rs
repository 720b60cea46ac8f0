use crate::core::color::Rgba;
use crate::core::geometry::Vertex;
use nalgebra::{Point3, Vector2, Vector3};
use rand::Rng;
use std::f32::consts::PI;

/// A collection of vertices and indices representing a 3D object.
/// Indices come in groups of three, one group per triangle, and must
/// stay within the vertex list (see [`Mesh::validate`]).
///
/// The model transform is NOT stored here; it is per-draw state
/// supplied by the caller.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Rejects meshes whose index list is malformed, before they reach
    /// the renderer.
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            ));
        }
        let limit = self.vertices.len() as u32;
        for &i in &self.indices {
            if i >= limit {
                return Err(format!("index {i} out of range ({limit} vertices)"));
            }
        }
        Ok(())
    }

    //=================================
    // Parametric generators
    //=================================

    /// Single triangle in the XY plane, facing +Z. Handy as the
    /// smallest possible pipeline input.
    pub fn triangle(color: Rgba) -> Self {
        let normal = Vector3::z();
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.5, 0.0), normal, Vector2::new(0.5, 1.0), color),
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), normal, Vector2::new(0.0, 0.0), color),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), normal, Vector2::new(1.0, 0.0), color),
        ];
        Self::new(vertices, vec![0, 1, 2])
    }

    /// Flat quad in the XZ plane, centered at the origin, facing +Y.
    /// 4 vertices, 2 triangles.
    pub fn plane(width: f32, depth: f32, color: Rgba) -> Self {
        assert!(
            width > 0.0 && depth > 0.0,
            "plane extents must be positive (got {width} x {depth})"
        );
        let hw = width * 0.5;
        let hd = depth * 0.5;
        let normal = Vector3::y();

        let vertices = vec![
            Vertex::new(Point3::new(-hw, 0.0, -hd), normal, Vector2::new(0.0, 0.0), color),
            Vertex::new(Point3::new(-hw, 0.0, hd), normal, Vector2::new(0.0, 1.0), color),
            Vertex::new(Point3::new(hw, 0.0, hd), normal, Vector2::new(1.0, 1.0), color),
            Vertex::new(Point3::new(hw, 0.0, -hd), normal, Vector2::new(1.0, 0.0), color),
        ];
        Self::new(vertices, vec![0, 1, 2, 0, 2, 3])
    }

    /// Unit cube centered at the origin. 24 vertices (4 per face,
    /// unshared so each face keeps a flat normal), 12 triangles.
    pub fn cube(color: Rgba) -> Self {
        let corners = [
            Point3::new(-0.5, -0.5, -0.5), // 0: left bottom back
            Point3::new(0.5, -0.5, -0.5),  // 1: right bottom back
            Point3::new(0.5, 0.5, -0.5),   // 2: right top back
            Point3::new(-0.5, 0.5, -0.5),  // 3: left top back
            Point3::new(-0.5, -0.5, 0.5),  // 4: left bottom front
            Point3::new(0.5, -0.5, 0.5),   // 5: right bottom front
            Point3::new(0.5, 0.5, 0.5),    // 6: right top front
            Point3::new(-0.5, 0.5, 0.5),   // 7: left top front
        ];

        let face_normals = [
            Vector3::new(0.0, 0.0, -1.0), // back
            Vector3::new(0.0, 0.0, 1.0),  // front
            Vector3::new(1.0, 0.0, 0.0),  // right
            Vector3::new(-1.0, 0.0, 0.0), // left
            Vector3::new(0.0, 1.0, 0.0),  // top
            Vector3::new(0.0, -1.0, 0.0), // bottom
        ];

        let face_corners: [[usize; 4]; 6] = [
            [0, 1, 2, 3], // back
            [4, 7, 6, 5], // front
            [1, 5, 6, 2], // right
            [0, 3, 7, 4], // left
            [3, 2, 6, 7], // top
            [0, 4, 5, 1], // bottom
        ];

        let uvs = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (face, corner_ids) in face_corners.iter().enumerate() {
            let base = vertices.len() as u32;
            for (v, &corner) in corner_ids.iter().enumerate() {
                vertices.push(Vertex::new(corners[corner], face_normals[face], uvs[v], color));
            }
            // Wound so the edge cross product matches the face normal.
            indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
        }

        Self::new(vertices, indices)
    }

    /// UV sphere of radius 0.5 centered at the origin:
    /// `(slices+1) * (stacks+1)` vertices and `2 * slices * stacks`
    /// triangles, with radial normals matching the winding.
    ///
    /// # Panics
    /// When `slices < 3` or `stacks < 1`. Anything smaller produces
    /// degenerate geometry that divides by zero during normal
    /// generation, so the call is rejected outright.
    pub fn sphere(slices: u32, stacks: u32, color: Rgba) -> Self {
        assert!(
            slices >= 3 && stacks >= 1,
            "sphere requires slices >= 3 and stacks >= 1 (got {slices}, {stacks})"
        );

        let radius = 0.5;
        let mut vertices = Vec::with_capacity(((slices + 1) * (stacks + 1)) as usize);
        let mut indices = Vec::with_capacity((6 * slices * stacks) as usize);

        for stack in 0..=stacks {
            let phi = PI * stack as f32 / stacks as f32;
            // Exact pole values: `sin(PI)` in f32 is a tiny nonzero
            // number, which would spread each pole into a ring of
            // nearly-coincident vertices and turn the adjoining quads
            // into inverted slivers instead of exactly-degenerate
            // triangles.
            let (sin_phi, cos_phi) = if stack == 0 {
                (0.0, 1.0)
            } else if stack == stacks {
                (0.0, -1.0)
            } else {
                phi.sin_cos()
            };

            for slice in 0..=slices {
                let theta = 2.0 * PI * slice as f32 / slices as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();

                let radial = Vector3::new(cos_theta * sin_phi, cos_phi, sin_theta * sin_phi);
                vertices.push(Vertex::new(
                    Point3::from(radial * radius),
                    radial.normalize(),
                    Vector2::new(
                        slice as f32 / slices as f32,
                        stack as f32 / stacks as f32,
                    ),
                    color,
                ));
            }
        }

        for stack in 0..stacks {
            for slice in 0..slices {
                let top_left = stack * (slices + 1) + slice;
                let top_right = top_left + 1;
                let bottom_left = (stack + 1) * (slices + 1) + slice;
                let bottom_right = bottom_left + 1;

                // Wound so the outward face normal agrees with the
                // analytic radial normal.
                indices.extend_from_slice(&[top_left, top_right, bottom_left]);
                indices.extend_from_slice(&[top_right, bottom_right, bottom_left]);
            }
        }

        Self::new(vertices, indices)
    }

    //=================================
    // Normal generation
    //=================================

    /// Rebuilds smooth vertex normals from the triangle topology.
    ///
    /// The unnormalized face cross product (cross of two edges in
    /// winding order) is accumulated on each triangle's vertices, so
    /// faces weigh in proportion to their area and near-degenerate
    /// slivers cannot swamp their neighbors. Every touched vertex
    /// normal is then normalized; vertices no non-degenerate face
    /// references keep the normal they had. Idempotent on any mesh: a
    /// second run starts from the same positions and reproduces the
    /// same result.
    pub fn generate_normals(&mut self) {
        let mut accumulated = vec![Vector3::zeros(); self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = self.vertices[i0].position;
            let p1 = self.vertices[i1].position;
            let p2 = self.vertices[i2].position;

            let normal = (p1 - p0).cross(&(p2 - p0));
            if !(normal.norm_squared() > 1e-12) {
                // Degenerate (or NaN) triangle contributes nothing.
                continue;
            }

            accumulated[i0] += normal;
            accumulated[i1] += normal;
            accumulated[i2] += normal;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(&accumulated) {
            let norm = normal.norm();
            if norm > 1e-6 {
                vertex.normal = normal / norm;
            }
        }
    }

    //=================================
    // Coloring strategies
    //=================================

    /// One color everywhere.
    pub fn color_uniform(&mut self, color: Rgba) {
        for vertex in &mut self.vertices {
            vertex.color = color;
        }
    }

    /// Cycles a palette across the vertex list.
    pub fn color_per_vertex(&mut self, palette: &[Rgba]) {
        assert!(!palette.is_empty(), "palette must not be empty");
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.color = palette[i % palette.len()];
        }
    }

    /// Cycles a palette across triangles, writing the triangle's color
    /// onto its three vertices. On shared-vertex topology the last
    /// triangle touching a vertex wins; generated cubes keep flat
    /// faces because their face vertices are unshared.
    pub fn color_per_face(&mut self, palette: &[Rgba]) {
        assert!(!palette.is_empty(), "palette must not be empty");
        let indices = self.indices.clone();
        for (face, tri) in indices.chunks_exact(3).enumerate() {
            let color = palette[face % palette.len()];
            for &i in tri {
                self.vertices[i as usize].color = color;
            }
        }
    }

    /// Derives each vertex color from its position within the mesh
    /// bounding box (x -> red, y -> green, z -> blue).
    pub fn color_by_position(&mut self) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let extent = max - min;

        for vertex in &mut self.vertices {
            let rel = vertex.position - min;
            let channel = |offset: f32, span: f32| {
                if span > 1e-6 {
                    (offset / span * 255.0) as u8
                } else {
                    128
                }
            };
            vertex.color = Rgba::rgb(
                channel(rel.x, extent.x),
                channel(rel.y, extent.y),
                channel(rel.z, extent.z),
            );
        }
    }

    /// Random opaque color per vertex. Generic over the RNG so tests
    /// can seed one.
    pub fn color_randomized<R: Rng>(&mut self, rng: &mut R) {
        for vertex in &mut self.vertices {
            vertex.color = Rgba::rgb(rng.random(), rng.random(), rng.random());
        }
    }

    /// Vertical gradient from `bottom` at the lowest vertex to `top`
    /// at the highest.
    pub fn color_gradient(&mut self, bottom: Rgba, top: Rgba) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let span = max.y - min.y;

        let bottom_v = bottom.to_vec();
        let top_v = top.to_vec();
        for vertex in &mut self.vertices {
            let t = if span > 1e-6 {
                (vertex.position.y - min.y) / span
            } else {
                0.5
            };
            vertex.color = Rgba::from_vec(bottom_v * (1.0 - t) + top_v * t);
        }
    }

    fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;
        for vertex in &self.vertices {
            let p = vertex.position;
            min = Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Some((min, max))
    }
}
