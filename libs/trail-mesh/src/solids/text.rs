//! # Embossed Text
//!
//! Glyph outlines come from an external [`GlyphOutliner`]. Contours are
//! grouped into outer rings and holes, fitted onto the platform and
//! extruded upward from its top face.

use config::BuildConfig;
use glam::DVec2;
use pipeline_types::{BuildWarning, Orientation, SolidRole};

use super::extrude::{extrude, Polygon2D};
use super::platform::PlatformLayout;
use super::Solid;
use crate::error::{BuildError, BuildResult};
use crate::mesh::Mesh;
use crate::shape::{polygon_contains, signed_area};

/// Converts text into closed 2D contours.
///
/// `size` is the nominal glyph height in output units. Contour
/// orientation is free; holes are detected geometrically.
pub trait GlyphOutliner {
    fn outline(&self, text: &str, size: f64) -> Result<Vec<Vec<DVec2>>, String>;
}

impl<F> GlyphOutliner for F
where
    F: Fn(&str, f64) -> Result<Vec<Vec<DVec2>>, String>,
{
    fn outline(&self, text: &str, size: f64) -> Result<Vec<Vec<DVec2>>, String> {
        self(text, size)
    }
}

/// Extruded text and the fit warning, if it had to shrink.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSolid {
    pub solid: Solid,
    pub warning: Option<BuildWarning>,
}

/// Outlines `text`, fits it onto `layout` and extrudes it.
///
/// The nominal size is `platform depth × text_size_factor`. If the outline
/// is wider than `text_max_width_ratio` of the platform (or taller than
/// `text_max_height_ratio` of its depth) it is scaled down uniformly and a
/// [`BuildWarning::TextScaledToFit`] is returned.
pub fn build_text(
    text: &str,
    outliner: &dyn GlyphOutliner,
    layout: &PlatformLayout,
    config: &BuildConfig,
) -> BuildResult<TextSolid> {
    let size = layout.depth() * config.text_size_factor;
    let contours: Vec<Vec<DVec2>> = outliner
        .outline(text, size)
        .map_err(BuildError::glyph)?
        .into_iter()
        .filter(|c| c.len() >= 3 && c.iter().all(|p| p.is_finite()))
        .collect();

    let empty = TextSolid {
        solid: Solid::new(SolidRole::Text, Orientation::Outward, Mesh::new()),
        warning: None,
    };
    let Some((min, max)) = contour_bounds(&contours) else {
        return Ok(empty);
    };
    let extent = max - min;
    if extent.x <= 0.0 || extent.y <= 0.0 {
        return Ok(empty);
    }

    let max_width = layout.width() * config.text_max_width_ratio;
    let max_height = layout.depth() * config.text_max_height_ratio;
    let scale = (max_width / extent.x).min(max_height / extent.y).min(1.0);
    let warning = (scale < 1.0).then_some(BuildWarning::TextScaledToFit { scale });

    let center = (min + max) / 2.0;
    let target = layout.center();
    let placed: Vec<Vec<DVec2>> = contours
        .into_iter()
        .map(|c| c.into_iter().map(|p| (p - center) * scale + target).collect())
        .collect();

    let top = layout.top_z + config.text_emboss_height;
    let mut mesh = Mesh::new();
    for polygon in group_contours(placed) {
        mesh.merge(&extrude(&polygon, layout.top_z, top));
    }

    Ok(TextSolid {
        solid: Solid::new(SolidRole::Text, Orientation::Outward, mesh),
        warning,
    })
}

fn contour_bounds(contours: &[Vec<DVec2>]) -> Option<(DVec2, DVec2)> {
    let mut points = contours.iter().flatten();
    let first = *points.next()?;
    Some(points.fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))))
}

/// Splits contours into polygons with holes.
///
/// The largest contour's orientation marks outer rings. Each opposite
/// contour becomes a hole of the smallest outer ring containing its first
/// vertex; orphans are dropped.
fn group_contours(contours: Vec<Vec<DVec2>>) -> Vec<Polygon2D> {
    let areas: Vec<f64> = contours.iter().map(|c| signed_area(c)).collect();
    let Some(outer_sign) = areas
        .iter()
        .copied()
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .map(f64::signum)
    else {
        return Vec::new();
    };

    let mut outers: Vec<(usize, Polygon2D)> = Vec::new();
    let mut holes = Vec::new();
    for (i, contour) in contours.into_iter().enumerate() {
        if areas[i] == 0.0 {
            continue;
        }
        if areas[i].signum() == outer_sign {
            outers.push((i, Polygon2D::new(contour)));
        } else {
            holes.push(contour);
        }
    }

    for hole in holes {
        let owner = outers
            .iter_mut()
            .filter(|(_, p)| polygon_contains(&p.outer, hole[0]))
            .min_by(|(a, _), (b, _)| areas[*a].abs().total_cmp(&areas[*b].abs()));
        if let Some((_, polygon)) = owner {
            polygon.holes.push(hole);
        }
    }

    outers.into_iter().map(|(_, p)| p).collect()
}
