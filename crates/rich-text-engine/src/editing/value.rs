use serde::{Deserialize, Serialize};

use crate::editing::Selection;
use crate::model::Document;

/// A document together with the selection that refers into it.
///
/// The pair is only ever replaced as a whole: every command takes one value
/// and produces the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub document: Document,
    pub selection: Selection,
}

impl Value {
    /// Pair a document with a collapsed cursor at its first text
    pub fn new(document: Document) -> Self {
        let selection = Selection::at_start(&document);
        Self {
            document,
            selection,
        }
    }

    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            document: self.document.clone(),
            selection,
        }
    }
}
