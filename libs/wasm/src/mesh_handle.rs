//! # Model Handle
//!
//! WASM-friendly wrapper for a generated model that can be transferred to
//! JavaScript.

use serde::Serialize;
use trail_mesh::{BuildStats, ExportMesh, ModelOutput};
use wasm_bindgen::prelude::*;

use crate::diagnostics::DiagnosticList;

/// A handle to the merged model mesh, one role code per triangle, and the
/// warnings raised while building it.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const model = generate_model(JSON.stringify(request), outlineText);
///
/// const geometry = new THREE.BufferGeometry();
/// geometry.setAttribute('position', new THREE.BufferAttribute(model.vertices(), 3));
/// geometry.setAttribute('normal', new THREE.BufferAttribute(model.normals(), 3));
/// geometry.setIndex(new THREE.BufferAttribute(model.indices(), 1));
///
/// // Colour terrain, path and text differently.
/// const roles = model.roles();  // Uint8Array, one entry per triangle
///
/// if (model.needs_attention) showWarnings(model.warnings());
/// ```
#[wasm_bindgen]
#[derive(Debug)]
pub struct ModelHandle {
    /// Vertex positions as [x, y, z, x, y, z, ...]
    vertices: Vec<f32>,
    /// Triangle indices as [i0, i1, i2, i0, i1, i2, ...]
    indices: Vec<u32>,
    /// Vertex normals as [nx, ny, nz, ...]
    normals: Vec<f32>,
    /// Solid role code per triangle
    roles: Vec<u8>,
    warnings: DiagnosticList,
    warnings_json: String,
    stats: StatsView,
    vertex_count: u32,
    triangle_count: u32,
}

/// JSON-facing copy of the build counters.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsView {
    grid_samples: usize,
    kept_samples: usize,
    terrain_triangles: usize,
    hull_size: usize,
    track_points: usize,
    interpolated_points: usize,
    fallback_points: usize,
    welded_vertices: usize,
    degenerate_triangles: usize,
}

impl StatsView {
    fn new(build: &BuildStats, merged: &ExportMesh) -> Self {
        Self {
            grid_samples: build.grid_samples,
            kept_samples: build.kept_samples,
            terrain_triangles: build.triangles,
            hull_size: build.hull_size,
            track_points: build.track_points,
            interpolated_points: build.interpolated_points,
            fallback_points: build.fallback_points,
            welded_vertices: merged.stats.welded_vertices,
            degenerate_triangles: merged.stats.degenerate_triangles,
        }
    }
}

#[wasm_bindgen]
impl ModelHandle {
    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    /// True when the build raised at least one warning.
    #[wasm_bindgen(getter)]
    pub fn needs_attention(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the vertex positions as a Float32Array.
    ///
    /// Format: [x, y, z, x, y, z, ...]
    /// Length: vertex_count * 3
    #[wasm_bindgen]
    pub fn vertices(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.vertices[..])
    }

    /// Returns the triangle indices as a Uint32Array.
    ///
    /// Length: triangle_count * 3
    #[wasm_bindgen]
    pub fn indices(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(&self.indices[..])
    }

    /// Returns the vertex normals as a Float32Array.
    #[wasm_bindgen]
    pub fn normals(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.normals[..])
    }

    /// Returns one role code per triangle as a Uint8Array.
    #[wasm_bindgen]
    pub fn roles(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.roles[..])
    }

    #[wasm_bindgen]
    pub fn warnings(&self) -> DiagnosticList {
        self.warnings.clone()
    }

    /// Warnings as a JSON array, e.g. `[{"kind":"textScaledToFit","scale":0.8}]`.
    #[wasm_bindgen]
    pub fn warnings_json(&self) -> String {
        self.warnings_json.clone()
    }

    /// Build counters as a JSON object string.
    #[wasm_bindgen]
    pub fn stats_json(&self) -> String {
        serde_json::to_string(&self.stats).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

impl ModelHandle {
    /// Creates a handle from a built model and its merged mesh.
    pub fn new(output: &ModelOutput, merged: ExportMesh) -> Self {
        let mesh = &merged.mesh;
        Self {
            vertex_count: mesh.vertex_count() as u32,
            triangle_count: mesh.triangle_count() as u32,
            vertices: mesh.vertices_f32(),
            indices: mesh.indices_u32(),
            normals: mesh.normals_f32().unwrap_or_default(),
            roles: merged.role_codes(),
            warnings: output.warnings.iter().collect(),
            warnings_json: serde_json::to_string(&output.warnings).unwrap_or_else(|_| "[]".to_string()),
            stats: StatsView::new(&output.stats, &merged),
        }
    }

    /// Rust-side access to the role codes.
    pub fn role_codes(&self) -> &[u8] {
        &self.roles
    }

    /// Rust-side access to the flattened positions.
    pub fn positions(&self) -> &[f32] {
        &self.vertices
    }

    /// Rust-side access to the warning list.
    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.warnings
    }
}
