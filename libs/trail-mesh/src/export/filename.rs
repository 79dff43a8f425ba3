//! Download names for exported models.

use pipeline_types::BuildRequest;

const FALLBACK_STEM: &str = "trail";

/// Builds `<stem>_<shape>_<width>mm_x<multiplier>_<unix_seconds>.stl`.
///
/// The stem is `base` without its last extension, restricted to ASCII
/// letters, digits, `-` and `_`.
///
/// ```
/// use trail_mesh::export::export_filename;
/// use pipeline_types::{BuildRequest, Fidelity, ShapeKind};
///
/// let request = BuildRequest {
///     grid: Vec::new(),
///     track: Vec::new(),
///     width: 120.0,
///     elevation_multiplier: 1.5,
///     shape: ShapeKind::Hexagon,
///     rotation_degrees: 0.0,
///     emboss_text: None,
///     platform_height: None,
///     fidelity: Fidelity::Full,
/// };
/// assert_eq!(
///     export_filename("Morning Ride.gpx", &request, 1_700_000_000),
///     "Morning_Ride_hexagon_120mm_x1.5_1700000000.stl"
/// );
/// ```
pub fn export_filename(base: &str, request: &BuildRequest, unix_seconds: u64) -> String {
    format!(
        "{}_{}_{}mm_x{}_{}.stl",
        sanitize_stem(base),
        request.shape,
        compact_number(request.width),
        compact_number(request.elevation_multiplier),
        unix_seconds
    )
}

fn sanitize_stem(base: &str) -> String {
    let file = base.rsplit(['/', '\\']).next().unwrap_or(base);
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };

    let mut out = String::with_capacity(stem.len());
    for c in stem.trim().chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' };
        if !(c == '_' && out.ends_with('_')) {
            out.push(c);
        }
    }
    let out = out.trim_matches('_');
    if out.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        out.to_string()
    }
}

/// Up to two decimals, trailing zeros removed.
fn compact_number(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}
