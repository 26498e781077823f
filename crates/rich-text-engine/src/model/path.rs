use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Child indices from the document root down to a node.
///
/// The derived ordering is document order: an ancestor sorts before its
/// descendants, and earlier siblings sort before later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the node within its parent
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn parent(&self) -> Option<Path> {
        self.0.split_last().map(|(_, rest)| Path(rest.to_vec()))
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// True when `self` is a strict ancestor of `other`
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        other.len() > self.len() && other.starts_with(self)
    }

    /// Longest shared prefix of two paths
    pub fn common_ancestor(&self, other: &Path) -> Path {
        let shared = self
            .0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count();
        Path(self.0[..shared].to_vec())
    }

    /// Rewrite this path after the siblings `lo..=hi` under `parent` were
    /// wrapped in a new node placed at index `lo`.
    pub fn after_wrap(&self, parent: &Path, lo: usize, hi: usize) -> Path {
        let depth = parent.len();
        if !parent.is_ancestor_of(self) {
            return self.clone();
        }
        let index = self.0[depth];
        let mut indices = parent.0.clone();
        if index < lo {
            return self.clone();
        } else if index <= hi {
            indices.push(lo);
            indices.push(index - lo);
        } else {
            indices.push(index - (hi - lo));
        }
        indices.extend_from_slice(&self.0[depth + 1..]);
        Path(indices)
    }

    /// Rewrite this path after the children `lo..=hi` of the `count`-child
    /// node at `container` were promoted into its place. Children before
    /// `lo` and after `hi` stay behind in containers of their own.
    pub fn after_unwrap(&self, container: &Path, lo: usize, hi: usize, count: usize) -> Path {
        let (Some(parent), Some(at)) = (container.parent(), container.last()) else {
            return self.clone();
        };
        let depth = container.len();
        let head = usize::from(lo > 0);
        let tail = usize::from(hi + 1 < count);

        let mut indices = parent.0.clone();
        if container.is_ancestor_of(self) {
            let index = self.0[depth];
            if index < lo {
                indices.extend([at, index]);
            } else if index <= hi {
                indices.push(at + head + (index - lo));
            } else {
                indices.extend([at + head + (hi - lo + 1), index - hi - 1]);
            }
            indices.extend_from_slice(&self.0[depth + 1..]);
            Path(indices)
        } else if parent.is_ancestor_of(self) && self.0[depth - 1] > at {
            let mut indices = self.0.clone();
            indices[depth - 1] += head + (hi - lo + 1) + tail - 1;
            Path(indices)
        } else {
            self.clone()
        }
    }

    /// Rewrite this path after `count` nodes were inserted under `parent`
    /// starting at index `at`.
    pub fn after_insert(&self, parent: &Path, at: usize, count: usize) -> Path {
        let depth = parent.len();
        if !parent.is_ancestor_of(self) || self.0[depth] < at {
            return self.clone();
        }
        let mut indices = self.0.clone();
        indices[depth] += count;
        Path(indices)
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "[{}]", parts.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid path: {0:?}")]
pub struct InvalidPath(pub String);

/// Parses the dotted form used by the CLI, e.g. `0.1.2`
impl FromStr for Path {
    type Err = InvalidPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
        if trimmed.is_empty() {
            return Ok(Path::root());
        }
        trimmed
            .split('.')
            .map(|part| part.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
            .map_err(|_| InvalidPath(s.to_string()))
    }
}
