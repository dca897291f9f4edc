use std::{collections::BTreeMap, sync::Arc};

use crate::foundation::core::CharId;
use crate::timeline::model::Timeline;

/// One SVG-like path of a vector shape.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePath {
    /// Path data.
    #[serde(default)]
    pub d: String,
    /// Fill paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Solid color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Stroke paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Stroke width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<String>,
    /// Stroke cap style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_linecap: Option<String>,
    /// Stroke join style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_linejoin: Option<String>,
    /// Color opacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_opacity: Option<String>,
}

/// Vector shape asset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapeAsset {
    /// Paths in paint order.
    #[serde(rename = "path", default)]
    pub paths: Vec<ShapePath>,
}

/// Bitmap asset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitmapAsset {
    /// Width in pixels.
    #[serde(deserialize_with = "crate::foundation::wire::de_u32")]
    pub width: u32,
    /// Height in pixels.
    #[serde(deserialize_with = "crate::foundation::wire::de_u32")]
    pub height: u32,
    /// Relative image path.
    pub bitmap_path: String,
}

/// Static text asset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAsset {
    /// Text content.
    pub display_text: String,
    /// `"<weight> <size> <family>"` font string.
    #[serde(default)]
    pub font: String,
    /// CSS color.
    #[serde(default)]
    pub color: String,
}

/// Sound asset. Sounds never resolve to a renderable character.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundAsset {
    /// Relative audio path.
    pub sound_path: String,
}

/// Result of resolving a character id.
#[derive(Clone, Copy, Debug)]
pub enum Resolved<'a> {
    /// Vector shape.
    Shape(&'a ShapeAsset),
    /// Bitmap.
    Bitmap(&'a BitmapAsset),
    /// Static text.
    Text(&'a TextAsset),
    /// Nested timeline definition.
    Timeline(&'a Arc<Timeline>),
}

/// Read-only character lookup used during playback.
///
/// Implementations must be total and side-effect free: the same id resolves to
/// the same asset for the lifetime of an animator.
pub trait ResourceResolver {
    /// Resolve a character id, or `None` when it names nothing renderable.
    fn resolve(&self, char_id: CharId) -> Option<Resolved<'_>>;
}

/// In-memory asset table.
#[derive(Clone, Debug, Default)]
pub struct AssetLibrary {
    shapes: BTreeMap<CharId, ShapeAsset>,
    bitmaps: BTreeMap<CharId, BitmapAsset>,
    texts: BTreeMap<CharId, TextAsset>,
    sounds: BTreeMap<CharId, SoundAsset>,
    timelines: BTreeMap<CharId, Arc<Timeline>>,
}

impl AssetLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape.
    pub fn insert_shape(&mut self, id: CharId, shape: ShapeAsset) -> &mut Self {
        self.shapes.insert(id, shape);
        self
    }

    /// Register a bitmap.
    pub fn insert_bitmap(&mut self, id: CharId, bitmap: BitmapAsset) -> &mut Self {
        self.bitmaps.insert(id, bitmap);
        self
    }

    /// Register a text.
    pub fn insert_text(&mut self, id: CharId, text: TextAsset) -> &mut Self {
        self.texts.insert(id, text);
        self
    }

    /// Register a sound.
    pub fn insert_sound(&mut self, id: CharId, sound: SoundAsset) -> &mut Self {
        self.sounds.insert(id, sound);
        self
    }

    /// Register a nested timeline.
    pub fn insert_timeline(&mut self, id: CharId, timeline: Arc<Timeline>) -> &mut Self {
        self.timelines.insert(id, timeline);
        self
    }

    /// Sound registered under `id`.
    pub fn sound(&self, id: CharId) -> Option<&SoundAsset> {
        self.sounds.get(&id)
    }

    /// Counts per asset kind: `(shapes, bitmaps, texts, sounds, timelines)`.
    pub fn counts(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.shapes.len(),
            self.bitmaps.len(),
            self.texts.len(),
            self.sounds.len(),
            self.timelines.len(),
        )
    }

    /// Nested timelines with their character ids.
    pub fn timelines(&self) -> impl Iterator<Item = (CharId, &Arc<Timeline>)> {
        self.timelines.iter().map(|(id, t)| (*id, t))
    }
}

impl ResourceResolver for AssetLibrary {
    fn resolve(&self, char_id: CharId) -> Option<Resolved<'_>> {
        if let Some(s) = self.shapes.get(&char_id) {
            return Some(Resolved::Shape(s));
        }
        if let Some(b) = self.bitmaps.get(&char_id) {
            return Some(Resolved::Bitmap(b));
        }
        if let Some(t) = self.texts.get(&char_id) {
            return Some(Resolved::Text(t));
        }
        self.timelines.get(&char_id).map(Resolved::Timeline)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/library.rs"]
mod tests;
