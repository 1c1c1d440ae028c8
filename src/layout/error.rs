//! Error types for the layout engine

use thiserror::Error;

/// Errors raised while laying out a diagram
#[derive(Debug, Error)]
pub enum LayoutError {
    /// An anchor's ordering precedence was queried before any line
    /// attached to it. Unattached anchors exist only between generation
    /// passes (they mark unmet dependencies); reaching sequencing with
    /// one is a programming error, not bad input.
    #[error("unattached anchor {name:?} on {side}")]
    UnattachedAnchor { side: String, name: String },
}

impl LayoutError {
    pub fn unattached(side: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnattachedAnchor {
            side: side.into(),
            name: name.into(),
        }
    }
}
