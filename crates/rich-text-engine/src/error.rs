use crate::model::{BlockType, Path};

/// Why a command was rejected.
///
/// A rejected command leaves the caller's (document, selection) pair as it
/// was; nothing is partially applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// The selection (or an explicit path) does not resolve in the document
    /// it was passed with. This means stale state reached the engine.
    #[error("structural mismatch at {path}: {detail}")]
    StructuralMismatch { path: Path, detail: String },

    /// An operation that needs a collapsed cursor got a range
    #[error("{operation} requires a collapsed selection")]
    InvalidRangeOperation { operation: &'static str },

    /// No enclosing container of the requested type
    #[error("no enclosing {kind} to unwrap")]
    NoMatchingAncestor { kind: BlockType },

    /// A widget key that no longer names an inline in the document
    #[error("no inline with key {key}")]
    UnknownInline { key: uuid::Uuid },
}

impl EditError {
    pub(crate) fn mismatch(path: &Path, detail: impl Into<String>) -> Self {
        EditError::StructuralMismatch {
            path: path.clone(),
            detail: detail.into(),
        }
    }
}
