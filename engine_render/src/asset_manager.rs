//! Asset bundle: named meshes and materials loaded from one glTF file
//!
//! Nodes are looked up by exact name. Each named node that carries a mesh
//! becomes a [`MeshRenderer`] pair of handles into the bundle's storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use engine_core::components::{MaterialHandle, MeshHandle, MeshRenderer};
use glam::Vec3;
use thiserror::Error;
use tracing::{debug, info};

use crate::mesh::{MeshData, Vertex};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset bundle {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse asset bundle: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("asset bundle has no node named `{0}`")]
    MissingNode(String),
    #[error("node `{0}` has no triangle mesh")]
    NodeWithoutMesh(String),
    #[error("asset loader stopped before finishing")]
    LoaderStopped,
}

/// Material data
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub name: String,
    pub albedo: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            albedo: [1.0, 1.0, 1.0, 1.0],
            metallic: 0.0,
            roughness: 0.5,
        }
    }
}

impl MaterialData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.albedo = [r, g, b, 1.0];
        self
    }
}

/// Loaded asset bundle - handle-based storage plus a node name index
#[derive(Debug, Default)]
pub struct AssetBundle {
    meshes: HashMap<u64, MeshData>,
    materials: HashMap<u64, MaterialData>,
    /// `None` marks a node that exists but has nothing drawable
    nodes: HashMap<String, Option<MeshRenderer>>,
    next_mesh_id: u64,
    next_material_id: u64,
}

impl AssetBundle {
    pub fn new() -> Self {
        Self {
            next_mesh_id: 1,
            next_material_id: 1,
            ..Default::default()
        }
    }

    /// Loads a `.glb` or `.gltf` file (external buffers resolved next to it).
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        if !path.is_file() {
            return Err(AssetError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        let (document, buffers, _images) = gltf::import(path)?;
        let bundle = Self::from_document(&document, &buffers);
        info!(
            path = %path.display(),
            nodes = bundle.nodes.len(),
            meshes = bundle.mesh_count(),
            materials = bundle.material_count(),
            "asset bundle loaded"
        );
        Ok(bundle)
    }

    /// Parses a self-contained glTF/GLB held in memory.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AssetError> {
        let (document, buffers, _images) = gltf::import_slice(bytes)?;
        Ok(Self::from_document(&document, &buffers))
    }

    fn from_document(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Self {
        let mut bundle = Self::new();
        let mut by_mesh_index: HashMap<usize, Option<MeshRenderer>> = HashMap::new();

        for node in document.nodes() {
            let Some(name) = node.name() else {
                continue;
            };
            let renderer = match node.mesh() {
                Some(mesh) => *by_mesh_index
                    .entry(mesh.index())
                    .or_insert_with(|| bundle.add_gltf_mesh(name, &mesh, buffers)),
                None => None,
            };
            if renderer.is_none() {
                debug!(node = name, "node has no drawable mesh");
            }
            bundle.nodes.insert(name.to_string(), renderer);
        }
        bundle
    }

    fn add_gltf_mesh(
        &mut self,
        node_name: &str,
        mesh: &gltf::Mesh<'_>,
        buffers: &[gltf::buffer::Data],
    ) -> Option<MeshRenderer> {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let mut material = None;

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader =
                primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
            let Some(positions) = reader.read_positions() else {
                continue;
            };

            let base_vertex = vertices.len() as u32;
            vertices.extend(
                positions.map(|p| Vertex::new(Vec3::from_array(p), Vec3::ZERO)),
            );
            let added = vertices.len() - base_vertex as usize;

            if let Some(normals) = reader.read_normals() {
                for (v, n) in vertices[base_vertex as usize..].iter_mut().zip(normals) {
                    v.normal = Vec3::from_array(n);
                }
            }
            match reader.read_indices() {
                Some(read) => indices.extend(read.into_u32().map(|i| base_vertex + i)),
                None => indices.extend(base_vertex..base_vertex + added as u32),
            }

            if material.is_none() {
                let m = primitive.material();
                let pbr = m.pbr_metallic_roughness();
                material = Some(MaterialData {
                    name: m.name().unwrap_or(node_name).to_string(),
                    albedo: pbr.base_color_factor(),
                    metallic: pbr.metallic_factor(),
                    roughness: pbr.roughness_factor(),
                });
            }
        }

        let mesh_data = MeshData::new(mesh.name().unwrap_or(node_name), vertices, indices);
        if !mesh_data.is_valid() {
            return None;
        }
        Some(self.insert(mesh_data, material.unwrap_or_default()))
    }

    /// Stores a mesh/material pair and returns handles to it.
    pub fn insert(&mut self, mesh: MeshData, material: MaterialData) -> MeshRenderer {
        let mesh_handle = MeshHandle {
            id: self.next_mesh_id,
        };
        self.next_mesh_id += 1;
        self.meshes.insert(mesh_handle.id, mesh);

        let material_handle = MaterialHandle {
            id: self.next_material_id,
        };
        self.next_material_id += 1;
        self.materials.insert(material_handle.id, material);

        MeshRenderer::with_material(mesh_handle, material_handle)
    }

    /// Registers a named node pointing at already stored assets.
    pub fn insert_node(&mut self, name: &str, renderer: MeshRenderer) {
        self.nodes.insert(name.to_string(), Some(renderer));
    }

    /// Handles for the node called exactly `name`.
    pub fn lookup(&self, name: &str) -> Result<MeshRenderer, AssetError> {
        match self.nodes.get(name) {
            Some(Some(renderer)) => Ok(*renderer),
            Some(None) => Err(AssetError::NodeWithoutMesh(name.to_string())),
            None => Err(AssetError::MissingNode(name.to_string())),
        }
    }

    pub fn get_mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(&handle.id)
    }

    pub fn get_material(&self, handle: MaterialHandle) -> Option<&MaterialData> {
        self.materials.get(&handle.id)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_distinguishes_missing_and_empty_nodes() {
        let mut bundle = AssetBundle::new();
        let cube = bundle.insert(MeshData::cube(), MaterialData::new("white"));
        bundle.insert_node("DNA", cube);
        bundle.nodes.insert("Group".to_string(), None);

        assert_eq!(bundle.lookup("DNA").unwrap(), cube);
        assert!(matches!(bundle.lookup("Group"), Err(AssetError::NodeWithoutMesh(_))));
        assert!(matches!(bundle.lookup("dna"), Err(AssetError::MissingNode(_))));
    }

    #[test]
    fn handles_resolve_to_stored_data() {
        let mut bundle = AssetBundle::new();
        let pink = MaterialData::new("pink").with_color(1.0, 0.4, 0.7);
        let r = bundle.insert(MeshData::cube(), pink);
        assert!(r.mesh.is_valid() && r.material.is_valid());
        assert_eq!(bundle.get_mesh(r.mesh).unwrap().triangle_count(), 12);
        assert_eq!(bundle.get_material(r.material).unwrap().albedo, [1.0, 0.4, 0.7, 1.0]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AssetBundle::load(Path::new("definitely/not/here.glb")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("here.glb"));
    }
}
