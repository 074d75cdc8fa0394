//! Call-site identity used to decide which frames merge.

use super::frame::Frame;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How two frames are judged to be the same call site
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityPolicy {
    /// `(function, filename)`; row and column are ignored
    #[default]
    Location,

    /// Like `Location`, but the innermost frame of a stack also keys on
    /// row and column so threads paused on different lines stay apart
    LeafLine,

    /// All four frame fields
    Exact,
}

impl IdentityPolicy {
    pub const ALL: [IdentityPolicy; 3] = [Self::Location, Self::LeafLine, Self::Exact];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::LeafLine => "leaf-line",
            Self::Exact => "exact",
        }
    }

    /// Whether row/column participate in the key of a frame
    pub fn is_positional(&self, is_innermost: bool) -> bool {
        match self {
            Self::Location => false,
            Self::LeafLine => is_innermost,
            Self::Exact => true,
        }
    }

    pub fn key(&self, frame: &Frame, is_innermost: bool) -> FrameKey {
        FrameKey::new(frame, self.is_positional(is_innermost))
    }
}

impl fmt::Display for IdentityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IdentityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown identity policy '{}' (expected location, leaf-line or exact)",
                    s
                )
            })
    }
}

/// Hashable merge key derived from a frame
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameKey {
    function: String,
    filename: String,
    position: Option<(u32, u32)>,
}

impl FrameKey {
    pub fn new(frame: &Frame, positional: bool) -> Self {
        Self {
            function: frame.function.clone(),
            filename: frame.filename.clone(),
            position: positional.then_some((frame.row, frame.column)),
        }
    }
}
