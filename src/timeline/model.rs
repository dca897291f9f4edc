use std::sync::Arc;

use crate::foundation::core::{Affine, CharId, ObjectId};
use crate::foundation::error::{StagehandError, StagehandResult};
use crate::transform::affine::parse_matrix;

/// Raw timeline as written by the exporter.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct TimelineDef {
    /// Character id of a nested timeline; absent for the main timeline.
    #[serde(
        default,
        deserialize_with = "crate::foundation::wire::de_opt_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub charid: Option<String>,
    /// Frames in playback order.
    #[serde(rename = "Frame", default)]
    pub frames: Vec<FrameDef>,
}

/// Raw frame: one tick's worth of command descriptors.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct FrameDef {
    /// Exporter frame number (informational).
    #[serde(
        default,
        deserialize_with = "crate::foundation::wire::de_opt_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub num: Option<String>,
    /// Command descriptors in declared order.
    #[serde(rename = "Command", default)]
    pub commands: Vec<CommandDef>,
}

/// Raw command descriptor. Every scalar may be a JSON string or number.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDef {
    /// `Place`, `Move`, `Remove`, `UpdateZOrder`, `UpdateVisibility`, or an
    /// exporter type the runtime does not implement.
    #[serde(deserialize_with = "crate::foundation::wire::de_scalar")]
    pub cmd_type: String,
    /// Placed character (Place only).
    #[serde(
        default,
        deserialize_with = "crate::foundation::wire::de_opt_scalar",
        skip_serializing_if = "Option::is_none",
        rename = "charid"
    )]
    pub charid: Option<String>,
    /// Target object.
    #[serde(
        default,
        deserialize_with = "crate::foundation::wire::de_opt_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub object_id: Option<String>,
    /// Sibling the object is placed before; `0` means none.
    #[serde(
        default,
        deserialize_with = "crate::foundation::wire::de_opt_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub place_after: Option<String>,
    /// `"a,b,c,d,e,f"` matrix (Place and Move).
    #[serde(
        default,
        deserialize_with = "crate::foundation::wire::de_opt_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub transform_matrix: Option<String>,
    /// `"true"` / `"false"` (UpdateVisibility). Non-string values are dropped.
    #[serde(
        default,
        deserialize_with = "crate::foundation::wire::de_opt_string_only",
        skip_serializing_if = "Option::is_none"
    )]
    pub visibility: Option<String>,
}

/// A validated frame command.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameCommand {
    /// Declare an object on this frame.
    Place {
        /// Character to instantiate.
        char_id: CharId,
        /// Identity of the placed object.
        object_id: ObjectId,
        /// Sibling to insert before, if any.
        place_after: Option<ObjectId>,
        /// Object matrix.
        matrix: Affine,
    },
    /// Re-transform an existing object.
    Move {
        /// Target object.
        object_id: ObjectId,
        /// New matrix.
        matrix: Affine,
    },
    /// Remove an object.
    Remove {
        /// Target object.
        object_id: ObjectId,
    },
    /// Reposition an object in z-order.
    UpdateZOrder {
        /// Target object.
        object_id: ObjectId,
        /// Sibling to move before, if any.
        place_after: Option<ObjectId>,
    },
    /// Toggle visibility.
    UpdateVisibility {
        /// Target object.
        object_id: ObjectId,
        /// Resolved flag (see [`parse_visibility`]).
        visible: bool,
    },
    /// Exporter command type the runtime does not implement.
    Unsupported {
        /// The raw `cmdType`.
        cmd_type: String,
    },
}

impl FrameCommand {
    /// Place command with no sibling constraint.
    pub fn place(char_id: u32, object_id: u32, matrix: Affine) -> Self {
        Self::Place {
            char_id: CharId(char_id),
            object_id: ObjectId(object_id),
            place_after: None,
            matrix,
        }
    }

    /// Place command inserted before `place_after` (`0` for none).
    pub fn place_before(char_id: u32, object_id: u32, place_after: u32, matrix: Affine) -> Self {
        Self::Place {
            char_id: CharId(char_id),
            object_id: ObjectId(object_id),
            place_after: ObjectId::from_place_after(place_after),
            matrix,
        }
    }

    /// Object this command targets, if any.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Place { object_id, .. }
            | Self::Move { object_id, .. }
            | Self::Remove { object_id }
            | Self::UpdateZOrder { object_id, .. }
            | Self::UpdateVisibility { object_id, .. } => Some(*object_id),
            Self::Unsupported { .. } => None,
        }
    }

    /// Compile a raw descriptor.
    pub fn from_def(def: &CommandDef) -> StagehandResult<Self> {
        let object_id = || -> StagehandResult<ObjectId> {
            def.object_id
                .as_deref()
                .ok_or_else(|| {
                    StagehandError::validation(format!("{} command without objectId", def.cmd_type))
                })?
                .parse()
        };
        let place_after = || -> StagehandResult<Option<ObjectId>> {
            match def.place_after.as_deref() {
                None => Ok(None),
                Some(s) => Ok(ObjectId::from_place_after(s.parse::<ObjectId>()?.0)),
            }
        };
        let matrix = || -> StagehandResult<Affine> {
            match def.transform_matrix.as_deref() {
                None => Ok(Affine::IDENTITY),
                Some(s) => parse_matrix(s),
            }
        };

        Ok(match def.cmd_type.as_str() {
            "Place" => Self::Place {
                char_id: def
                    .charid
                    .as_deref()
                    .ok_or_else(|| StagehandError::validation("Place command without charid"))?
                    .parse()?,
                object_id: object_id()?,
                place_after: place_after()?,
                matrix: matrix()?,
            },
            "Move" => Self::Move {
                object_id: object_id()?,
                matrix: matrix()?,
            },
            "Remove" => Self::Remove {
                object_id: object_id()?,
            },
            "UpdateZOrder" => Self::UpdateZOrder {
                object_id: object_id()?,
                place_after: place_after()?,
            },
            "UpdateVisibility" => Self::UpdateVisibility {
                object_id: object_id()?,
                visible: parse_visibility(def.visibility.as_deref()),
            },
            other => Self::Unsupported {
                cmd_type: other.to_string(),
            },
        })
    }
}

/// Exporter visibility flag.
///
/// Only the literal, case-sensitive `"true"` means visible. `"True"`, `"1"`,
/// `"yes"`, a missing value and `"false"` all mean hidden.
pub fn parse_visibility(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// One tick's worth of commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Commands in declared order.
    pub commands: Vec<FrameCommand>,
}

impl Frame {
    /// Build a frame from commands.
    pub fn new(commands: Vec<FrameCommand>) -> Self {
        Self { commands }
    }

    /// Whether a Place in this frame declares `id`.
    pub fn places(&self, id: ObjectId) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, FrameCommand::Place { object_id, .. } if *object_id == id))
    }
}

/// Immutable compiled timeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    frames: Vec<Frame>,
}

impl Timeline {
    /// Build a timeline from frames. The frame count is fixed from here on.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Compile and validate a raw timeline.
    pub fn from_def(def: &TimelineDef) -> StagehandResult<Self> {
        let frames = def
            .frames
            .iter()
            .enumerate()
            .map(|(i, f)| {
                f.commands
                    .iter()
                    .enumerate()
                    .map(|(j, c)| {
                        FrameCommand::from_def(c).map_err(|e| {
                            StagehandError::validation(format!("frame {i}, command {j}: {e}"))
                        })
                    })
                    .collect::<StagehandResult<Vec<_>>>()
                    .map(Frame::new)
            })
            .collect::<StagehandResult<Vec<_>>>()?;
        Ok(Self { frames })
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame at `index`.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// All frames in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Wrap into the shared form consumed by animators and resolvers.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
