//! WASM-compatible diagnostic types.
//!
//! Build errors and non-fatal build warnings both reach JavaScript as
//! [`Diagnostic`] values, distinguished by [`Severity`].

use pipeline_types::BuildWarning;
use trail_mesh::{BuildError, ErrorKind};
use wasm_bindgen::prelude::*;

/// Diagnostic severity for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message for JavaScript.
///
/// `code` is a stable identifier the UI can branch on; `message` is for
/// display.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const diag = handle.warnings().get(0);
/// // if (diag.code() === "textScaledToFit") showHint(diag.message());
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: String,
    message: String,
}

#[wasm_bindgen]
impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> String {
        self.code.clone()
    }

    pub fn message(&self) -> String {
        self.message.clone()
    }

    /// Converts this diagnostic to a plain JavaScript object.
    ///
    /// Worker → main thread messages cannot carry wasm-bindgen wrappers.
    pub fn to_js_object(&self) -> JsValue {
        use js_sys::{Object, Reflect};

        let obj = Object::new();
        // Setting plain data properties on a fresh object cannot fail.
        let _ = Reflect::set(&obj, &"severity".into(), &JsValue::from(self.severity as i32));
        let _ = Reflect::set(&obj, &"code".into(), &JsValue::from_str(&self.code));
        let _ = Reflect::set(&obj, &"message".into(), &JsValue::from_str(&self.message));
        JsValue::from(obj)
    }
}

impl Diagnostic {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Rust-side accessor; the JS getters return owned strings.
    pub fn code_str(&self) -> &str {
        &self.code
    }
}

impl From<&BuildWarning> for Diagnostic {
    fn from(warning: &BuildWarning) -> Self {
        let (code, message) = match *warning {
            BuildWarning::PathOverlapsPlatform { points } => (
                "pathOverlapsPlatform",
                format!("{points} track points run over the text platform"),
            ),
            BuildWarning::TextScaledToFit { scale } => (
                "textScaledToFit",
                format!("text was scaled to {:.0}% to fit the platform", scale * 100.0),
            ),
        };
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            message,
        }
    }
}

impl From<BuildError> for Diagnostic {
    fn from(err: BuildError) -> Self {
        let code = match err.kind() {
            ErrorKind::Precondition => "invalidInput",
            ErrorKind::EmptyResult => "emptyResult",
            ErrorKind::Downstream => "downstream",
            ErrorKind::Aborted => "aborted",
        };
        Self::error(code, err.to_string())
    }
}

impl From<serde_json::Error> for Diagnostic {
    fn from(err: serde_json::Error) -> Self {
        Self::error("invalidRequest", format!("malformed request: {err}"))
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A collection of diagnostics.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct DiagnosticList {
    diagnostics: Vec<Diagnostic>,
}

#[wasm_bindgen]
impl DiagnosticList {
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns the diagnostic at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Diagnostic> {
        self.diagnostics.get(index).cloned()
    }
}

impl DiagnosticList {
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl<'a> FromIterator<&'a BuildWarning> for DiagnosticList {
    fn from_iter<I: IntoIterator<Item = &'a BuildWarning>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().map(Diagnostic::from).collect(),
        }
    }
}
