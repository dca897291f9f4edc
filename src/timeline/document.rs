use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use crate::assets::library::{AssetLibrary, BitmapAsset, ShapeAsset, SoundAsset, TextAsset};
use crate::foundation::core::CharId;
use crate::foundation::error::{StagehandError, StagehandResult};
use crate::timeline::model::{Timeline, TimelineDef};

/// Exporter document as written to disk.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct DocumentDef {
    /// Vector shapes.
    #[serde(rename = "Shape", default)]
    pub shapes: Vec<Entry<ShapeAsset>>,
    /// Bitmaps.
    #[serde(rename = "Bitmaps", default)]
    pub bitmaps: Vec<Entry<BitmapAsset>>,
    /// Sounds.
    #[serde(rename = "Sounds", default)]
    pub sounds: Vec<Entry<SoundAsset>>,
    /// Static texts.
    #[serde(rename = "Text", default)]
    pub texts: Vec<Entry<TextAsset>>,
    /// Main timeline (no `charid`) and nested timelines.
    #[serde(rename = "Timeline", default)]
    pub timelines: Vec<TimelineDef>,
}

/// An asset record keyed by `charid`.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Entry<T> {
    /// Character id.
    #[serde(deserialize_with = "crate::foundation::wire::de_scalar")]
    pub charid: String,
    /// Asset payload, flattened next to `charid`.
    #[serde(flatten)]
    pub asset: T,
}

/// A loaded document: asset library plus the main timeline.
#[derive(Clone, Debug)]
pub struct Document {
    library: AssetLibrary,
    root: Option<Arc<Timeline>>,
}

impl Document {
    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StagehandResult<Self> {
        let def: DocumentDef = serde_json::from_reader(r)
            .map_err(|e| StagehandError::serde(format!("parse document JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse a document from a JSON string.
    pub fn from_json_str(s: &str) -> StagehandResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StagehandResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StagehandError::validation(format!("open document JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Compile a parsed document.
    ///
    /// Every timeline is validated here so playback never sees malformed commands.
    #[tracing::instrument(skip(def))]
    pub fn from_def(def: DocumentDef) -> StagehandResult<Self> {
        let mut library = AssetLibrary::new();
        for e in def.shapes {
            library.insert_shape(e.charid.parse()?, e.asset);
        }
        for e in def.bitmaps {
            library.insert_bitmap(e.charid.parse()?, e.asset);
        }
        for e in def.sounds {
            library.insert_sound(e.charid.parse()?, e.asset);
        }
        for e in def.texts {
            library.insert_text(e.charid.parse()?, e.asset);
        }

        let mut root = None;
        for tl in &def.timelines {
            let compiled = Timeline::from_def(tl)
                .map_err(|e| StagehandError::validation(format!("timeline {}: {e}", label(tl))))?
                .into_shared();
            match tl.charid.as_deref() {
                None => {
                    if root.replace(compiled).is_some() {
                        return Err(StagehandError::validation(
                            "document has more than one main timeline",
                        ));
                    }
                }
                Some(id) => {
                    library.insert_timeline(id.parse::<CharId>()?, compiled);
                }
            }
        }

        Ok(Self { library, root })
    }

    /// Asset library (also the playback resolver).
    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }

    /// Main timeline, if the document declares one.
    pub fn root_timeline(&self) -> Option<&Arc<Timeline>> {
        self.root.as_ref()
    }

    /// Split into library and main timeline.
    pub fn into_parts(self) -> (AssetLibrary, Option<Arc<Timeline>>) {
        (self.library, self.root)
    }
}

fn label(tl: &TimelineDef) -> String {
    match &tl.charid {
        Some(id) => format!("'{id}'"),
        None => "main".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/document.rs"]
mod tests;
