use crate::core::color::Rgba;
use crate::core::geometry::Vertex;
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file and returns a unified Mesh.
///
/// All sub-meshes are merged into one vertex/index pair. Vertices get
/// white colors; missing UVs default to (0, 0); missing normals are
/// reconstructed from face geometry afterwards.
pub fn load_obj(path: &str) -> Result<Mesh, String> {
    let path_obj = Path::new(path);
    if !path_obj.exists() {
        return Err(format!("File not found: {}", path));
    }

    info!("Loading OBJ file: {}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Unifies indices for Position/Normal/UV
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path_obj, &load_options)
        .map_err(|e| format!("Failed to load OBJ: {}", e))?;

    let mut vertices = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut index_offset = 0u32;
    let mut needs_normals = false;

    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = !mesh.normals.is_empty();
        let has_texcoords = !mesh.texcoords.is_empty();

        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals; they will be generated from faces.",
                model.name
            );
            needs_normals = true;
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            );

            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::zeros()
            };

            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            vertices.push(Vertex::new(position, normal, texcoord, Rgba::WHITE));
        }

        indices.extend(mesh.indices.iter().map(|&i| i + index_offset));
        index_offset += num_vertices as u32;
    }

    if vertices.is_empty() {
        return Err(format!("OBJ file contains no geometry: {}", path));
    }

    let mut mesh = Mesh { vertices, indices };
    mesh.validate()?;

    if needs_normals {
        mesh.generate_normals();
    }

    info!(
        "Loaded {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );

    Ok(mesh)
}
