//! WASM-facing entry points for the trail model pipeline.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`. Native tests interact with the `*_internal` helpers,
//! which take Rust callbacks instead of JavaScript functions.
//!
//! ```
//! let err = trail_wasm::generate_model_internal("{}", None).unwrap_err();
//! assert_eq!(err.code_str(), "invalidRequest");
//! ```

use config::BuildConfig;
use pipeline_types::{BuildRequest, ExportStage};
use trail_mesh::assemble::NoProgress;
use trail_mesh::{BuildSupervisor, ExportProgress, GlyphOutliner};
use wasm_bindgen::prelude::*;

mod diagnostics;
mod mesh_handle;

pub use diagnostics::{Diagnostic, DiagnosticList, Severity};
pub use mesh_handle::ModelHandle;

#[cfg(target_arch = "wasm32")]
pub use wasm_bindgen_rayon::init_thread_pool;

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "trail-wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Returns the labels of the export stages, in the order progress
/// callbacks receive them.
#[wasm_bindgen]
pub fn export_stage_labels() -> Vec<String> {
    ExportStage::ALL.iter().map(|s| s.label().to_string()).collect()
}

/// Builds the model described by `request_json` and returns its merged
/// mesh for preview.
///
/// `outline_text` is optional; when given, it is called as
/// `outline_text(text, size)` and must return an array of closed contours,
/// each an array of `[x, y]` pairs. Without it no text is embossed.
///
/// # Errors
/// Returns a [`Diagnostic`] describing the failure.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const model = generate_model(JSON.stringify(request), outlineText);
/// // console.log(model.triangle_count, model.needs_attention);
/// ```
#[wasm_bindgen]
pub fn generate_model(
    request_json: &str,
    outline_text: Option<js_sys::Function>,
) -> Result<ModelHandle, JsValue> {
    let glyphs = outline_text.map(JsGlyphs);
    generate_model_internal(request_json, glyphs.as_ref().map(|g| g as &dyn GlyphOutliner))
        .map_err(|diag| diag.to_js_object())
}

/// Builds the model and serializes it as an ASCII STL document.
///
/// `on_stage` receives each stage label before the stage runs; returning
/// `false` (or throwing) aborts the export.
///
/// # Errors
/// Returns a [`Diagnostic`]; an abort carries the code `"aborted"`.
#[wasm_bindgen]
pub fn export_stl(
    request_json: &str,
    name: &str,
    outline_text: Option<js_sys::Function>,
    on_stage: Option<js_sys::Function>,
) -> Result<String, JsValue> {
    let glyphs = outline_text.map(JsGlyphs);
    let glyphs = glyphs.as_ref().map(|g| g as &dyn GlyphOutliner);
    let result = match on_stage {
        Some(callback) => export_stl_internal(request_json, name, glyphs, &mut JsProgress(callback)),
        None => export_stl_internal(request_json, name, glyphs, &mut NoProgress),
    };
    result.map_err(|diag| diag.to_js_object())
}

/// Suggested download name for the exported file.
///
/// # Errors
/// Returns a [`Diagnostic`] when `request_json` cannot be parsed.
#[wasm_bindgen]
pub fn export_filename(base: &str, request_json: &str, unix_seconds: f64) -> Result<String, JsValue> {
    let request = parse_request(request_json).map_err(|diag| diag.to_js_object())?;
    let seconds = if unix_seconds.is_finite() && unix_seconds > 0.0 {
        unix_seconds as u64
    } else {
        0
    };
    Ok(trail_mesh::export::export_filename(base, &request, seconds))
}

/// Host-only helper behind [`generate_model`].
///
/// # Errors
/// Malformed JSON and every [`trail_mesh::BuildError`] map to a
/// [`Diagnostic`] with severity [`Severity::Error`].
pub fn generate_model_internal(
    request_json: &str,
    glyphs: Option<&dyn GlyphOutliner>,
) -> Result<ModelHandle, Diagnostic> {
    let request = parse_request(request_json)?;
    let config = BuildConfig::default();
    let output = trail_mesh::build_model(&request, &config, glyphs)?;
    let merged = trail_mesh::assemble_model(&output, &config, &mut NoProgress)?;
    Ok(ModelHandle::new(&output, merged))
}

/// Host-only helper behind [`export_stl`].
pub fn export_stl_internal(
    request_json: &str,
    name: &str,
    glyphs: Option<&dyn GlyphOutliner>,
    progress: &mut dyn ExportProgress,
) -> Result<String, Diagnostic> {
    let request = parse_request(request_json)?;
    let config = BuildConfig::default();
    let output = trail_mesh::build_model(&request, &config, glyphs)?;
    Ok(trail_mesh::export_stl(&output, name, &config, progress)?)
}

fn parse_request(request_json: &str) -> Result<BuildRequest, Diagnostic> {
    Ok(serde_json::from_str(request_json)?)
}

/// Latest-request-wins session for hosts that queue rebuilds.
///
/// A build whose request was superseded while it ran resolves to
/// `undefined` instead of a model.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct BuildSession {
    supervisor: BuildSupervisor,
}

#[wasm_bindgen]
impl BuildSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks every in-flight build as superseded.
    pub fn invalidate(&self) {
        self.supervisor.begin();
    }

    /// Builds the model unless a newer request arrives first.
    ///
    /// # Errors
    /// Returns a [`Diagnostic`] for a failed build that is still current.
    pub fn generate(
        &self,
        request_json: &str,
        outline_text: Option<js_sys::Function>,
    ) -> Result<Option<ModelHandle>, JsValue> {
        let glyphs = outline_text.map(JsGlyphs);
        self.generate_internal(request_json, glyphs.as_ref().map(|g| g as &dyn GlyphOutliner))
            .map_err(|diag| diag.to_js_object())
    }
}

impl BuildSession {
    /// Host-only helper behind [`BuildSession::generate`].
    pub fn generate_internal(
        &self,
        request_json: &str,
        glyphs: Option<&dyn GlyphOutliner>,
    ) -> Result<Option<ModelHandle>, Diagnostic> {
        let ticket = self.supervisor.begin();
        let result = generate_model_internal(request_json, glyphs);
        match self.supervisor.finish(ticket, result) {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }

    /// Exposes the supervisor so hosts can supersede builds from Rust.
    pub fn supervisor(&self) -> &BuildSupervisor {
        &self.supervisor
    }
}

/// Glyph outlines supplied by a JavaScript function.
struct JsGlyphs(js_sys::Function);

impl GlyphOutliner for JsGlyphs {
    fn outline(&self, text: &str, size: f64) -> Result<Vec<Vec<glam::DVec2>>, String> {
        let value = self
            .0
            .call2(&JsValue::NULL, &JsValue::from_str(text), &JsValue::from_f64(size))
            .map_err(|err| js_message(&err))?;
        let json = js_sys::JSON::stringify(&value)
            .map_err(|err| js_message(&err))?
            .as_string()
            .unwrap_or_default();
        parse_contours(&json)
    }
}

/// Parses `[[[x, y], ...], ...]` into contours.
fn parse_contours(json: &str) -> Result<Vec<Vec<glam::DVec2>>, String> {
    let rings: Vec<Vec<[f64; 2]>> =
        serde_json::from_str(json).map_err(|err| format!("glyph outlines: {err}"))?;
    Ok(rings
        .into_iter()
        .map(|ring| ring.into_iter().map(glam::DVec2::from).collect())
        .collect())
}

/// Stage notifications delivered to a JavaScript function.
struct JsProgress(js_sys::Function);

impl ExportProgress for JsProgress {
    fn on_stage(&mut self, stage: ExportStage) -> Result<(), String> {
        let value = self
            .0
            .call1(&JsValue::NULL, &JsValue::from_str(stage.label()))
            .map_err(|err| js_message(&err))?;
        if value.as_bool() == Some(false) {
            return Err("cancelled".to_string());
        }
        Ok(())
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
