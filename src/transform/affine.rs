//! Affine matrix helpers.
//!
//! Matrices use the `[[a, c, e], [b, d, f]]` layout, which is also the coefficient
//! order of [`Affine::as_coeffs`].

use crate::foundation::core::{Affine, NodeTransform, Vec2};
use crate::foundation::error::{StagehandError, StagehandResult};

/// Decompose a 2D affine matrix into node transform state.
///
/// Rotation is folded into the two skew axes, so `rotation_deg` is always zero.
/// Non-finite input propagates into the result; callers validate at parse time
/// with [`parse_matrix`].
pub fn decompose(m: Affine) -> NodeTransform {
    let [a, b, c, d, e, f] = m.as_coeffs();
    NodeTransform {
        translate: Vec2::new(e, f),
        scale: Vec2::new(a.hypot(b), c.hypot(d)),
        rotation_deg: 0.0,
        skew_deg: Vec2::new((-c).atan2(d).to_degrees(), b.atan2(a).to_degrees()),
    }
}

/// Parse the exporter's `"a,b,c,d,e,f"` matrix string.
///
/// Exactly six finite numbers are required.
pub fn parse_matrix(s: &str) -> StagehandResult<Affine> {
    let mut coeffs = [0.0f64; 6];
    let mut n = 0usize;
    for part in s.split(',') {
        if n == coeffs.len() {
            return Err(StagehandError::validation(format!(
                "transform matrix '{s}' has more than 6 components"
            )));
        }
        let v: f64 = part.trim().parse().map_err(|e| {
            StagehandError::validation(format!("transform matrix '{s}': component {n}: {e}"))
        })?;
        if !v.is_finite() {
            return Err(StagehandError::validation(format!(
                "transform matrix '{s}': component {n} is not finite"
            )));
        }
        coeffs[n] = v;
        n += 1;
    }
    if n != coeffs.len() {
        return Err(StagehandError::validation(format!(
            "transform matrix '{s}' has {n} components, expected 6"
        )));
    }
    Ok(Affine::new(coeffs))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
