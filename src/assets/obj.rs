//! Minimal Wavefront OBJ/MTL reader
//!
//! Only what collision and flat shading need: vertex extents from `v`
//! statements and the first diffuse colour (`Kd`) of a material library.
//! Everything else in the files is skipped.

use glam::Vec3;

use super::AssetError;
use crate::sim::Aabb;

/// Parse up to `N` whitespace-separated floats
fn parse_floats<'a, const N: usize>(mut parts: impl Iterator<Item = &'a str>) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = parts.next()?.parse().ok()?;
    }
    Some(out)
}

/// Local-space bounds of every vertex in an OBJ file
pub fn parse_obj_bounds(file: &'static str, src: &str) -> Result<Aabb, AssetError> {
    let mut bounds = Aabb::EMPTY;

    for (index, line) in src.lines().enumerate() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("v") {
            continue;
        }
        let [x, y, z] = parse_floats::<3>(parts).ok_or_else(|| AssetError::Malformed {
            file,
            line: index + 1,
            reason: "expected three vertex coordinates".to_string(),
        })?;
        bounds = bounds.expand_to(Vec3::new(x, y, z));
    }

    if bounds.is_empty() {
        return Err(AssetError::NoGeometry(file));
    }
    Ok(bounds)
}

/// First `Kd` (diffuse colour) in a material library, if any
pub fn parse_mtl_color(file: &'static str, src: &str) -> Result<Option<[f32; 3]>, AssetError> {
    for (index, line) in src.lines().enumerate() {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("Kd") {
            continue;
        }
        return parse_floats::<3>(parts)
            .map(Some)
            .ok_or_else(|| AssetError::Malformed {
                file,
                line: index + 1,
                reason: "expected three colour components".to_string(),
            });
    }
    Ok(None)
}
