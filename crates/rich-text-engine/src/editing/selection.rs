use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::model::{Document, MarkSet, Path};

/// A position inside a text node: the text's path and a char offset
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<Path>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    /// Offset zero of the text at `path`
    pub fn start_of(path: Path) -> Self {
        Self { path, offset: 0 }
    }
}

/// Anchor and focus points relative to one document snapshot.
///
/// Anchor equal to focus is a collapsed cursor. A selection does not survive
/// a structural change on its own: commands hand back the selection that
/// matches the document they produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
    #[serde(default)]
    pub is_focused: bool,
    /// Marks queued on a collapsed cursor, overriding the marks at the cursor
    #[serde(skip)]
    pub marks: Option<MarkSet>,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self {
            anchor,
            focus,
            is_focused: false,
            marks: None,
        }
    }

    pub fn collapsed(point: Point) -> Self {
        Self::new(point.clone(), point)
    }

    /// Collapsed at the start of the first text, or at the root of an empty
    /// document
    pub fn at_start(doc: &Document) -> Self {
        let path = doc.first_text().map(|(path, _)| path).unwrap_or_default();
        Self::collapsed(Point::start_of(path))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Focus precedes anchor
    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    pub fn start(&self) -> &Point {
        if self.is_backward() {
            &self.focus
        } else {
            &self.anchor
        }
    }

    pub fn end(&self) -> &Point {
        if self.is_backward() {
            &self.anchor
        } else {
            &self.focus
        }
    }

    pub fn focused(mut self) -> Self {
        self.is_focused = true;
        self
    }

    pub fn blurred(mut self) -> Self {
        self.is_focused = false;
        self
    }

    /// Collapse onto `point`, keeping focus state and dropping pending marks
    pub fn moved_to(&self, point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
            is_focused: self.is_focused,
            marks: None,
        }
    }

    /// Rewrite both points' paths after a structural change
    pub fn map_paths<F>(&self, f: F) -> Self
    where
        F: Fn(&Path) -> Path,
    {
        Self {
            anchor: Point::new(f(&self.anchor.path), self.anchor.offset),
            focus: Point::new(f(&self.focus.path), self.focus.offset),
            is_focused: self.is_focused,
            marks: self.marks.clone(),
        }
    }

    /// Both points must name a text node of `doc` with the offset inside it
    pub fn validate(&self, doc: &Document) -> Result<(), EditError> {
        for point in [&self.anchor, &self.focus] {
            let text = doc
                .text(&point.path)
                .ok_or_else(|| EditError::mismatch(&point.path, "selection point is not a text"))?;
            if point.offset > text.len() {
                return Err(EditError::mismatch(
                    &point.path,
                    format!("offset {} past end of {}-char text", point.offset, text.len()),
                ));
            }
        }
        Ok(())
    }
}
