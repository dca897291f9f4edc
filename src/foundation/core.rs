use std::{fmt, str::FromStr};

use crate::foundation::error::{StagehandError, StagehandResult};

pub use kurbo::{Affine, Vec2};

/// Caller-assigned identity of a display object, unique among siblings.
///
/// On the wire the value `0` is reserved for "no object" (see
/// [`ObjectId::from_place_after`]).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Interpret a wire `placeAfter` value, where `0` denotes "none".
    pub fn from_place_after(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = StagehandError;

    fn from_str(s: &str) -> StagehandResult<Self> {
        parse_u32(s, "objectId").map(Self)
    }
}

/// Identifier of a character (shape, bitmap, text, sound or nested timeline).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CharId(pub u32);

impl fmt::Display for CharId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "char:{}", self.0)
    }
}

impl FromStr for CharId {
    type Err = StagehandError;

    fn from_str(s: &str) -> StagehandResult<Self> {
        parse_u32(s, "charid").map(Self)
    }
}

fn parse_u32(s: &str, field: &str) -> StagehandResult<u32> {
    s.trim()
        .parse::<u32>()
        .map_err(|e| StagehandError::validation(format!("invalid {field} '{s}': {e}")))
}

/// Decomposed transform state of a display node.
///
/// Angles are in degrees. Rotation is kept for completeness but the
/// decomposer folds rotation into the two skew angles and leaves it at zero.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeTransform {
    /// Translation `(x, y)`.
    pub translate: Vec2,
    /// Non-uniform scale `(scaleX, scaleY)`.
    pub scale: Vec2,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Skew angles `(skewX, skewY)` in degrees.
    pub skew_deg: Vec2,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            rotation_deg: 0.0,
            skew_deg: Vec2::ZERO,
        }
    }
}

impl NodeTransform {
    /// Rebuild the affine matrix this transform describes.
    pub fn to_affine(self) -> Affine {
        let rot = self.rotation_deg.to_radians();
        let skew_x = self.skew_deg.x.to_radians() + rot;
        let skew_y = self.skew_deg.y.to_radians() + rot;
        Affine::new([
            skew_y.cos() * self.scale.x,
            skew_y.sin() * self.scale.x,
            -skew_x.sin() * self.scale.y,
            skew_x.cos() * self.scale.y,
            self.translate.x,
            self.translate.y,
        ])
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.translate.is_finite()
            && self.scale.is_finite()
            && self.rotation_deg.is_finite()
            && self.skew_deg.is_finite()
    }
}
