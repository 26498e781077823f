//! Reading and writing values as Slate-style JSON.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::editing::{Selection, Value};
use crate::error::EditError;
use crate::model::{Document, InvariantViolation, invariants};

const SAMPLE: &str = include_str!("sample.json");

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid value JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document breaks the schema: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("stored selection does not fit the document: {0}")]
    Selection(#[from] EditError),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Serialize, Deserialize)]
struct ValueRepr {
    document: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selection: Option<Selection>,
}

impl Value {
    /// Parse a value, checking the document schema. Without a stored
    /// selection the cursor goes to the start of the first text.
    pub fn from_json(json: &str) -> Result<Value, LoadError> {
        let repr: ValueRepr = serde_json::from_str(json)?;
        invariants::check(&repr.document)?;
        let value = match repr.selection {
            Some(selection) => {
                selection.validate(&repr.document)?;
                Value {
                    document: repr.document,
                    selection,
                }
            }
            None => Value::new(repr.document),
        };
        Ok(value)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&ValueRepr {
            document: self.document.clone(),
            selection: Some(self.selection.clone()),
        })
    }
}

/// The demo document shipped with the crate
pub fn sample_value() -> Result<Value, LoadError> {
    Value::from_json(SAMPLE)
}

pub fn load_value(path: &Path) -> Result<Value, LoadError> {
    debug!("loading value from {}", path.display());
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Value::from_json(&json)
}

/// Write `value` to `path`, creating parent directories as needed
pub fn save_value(path: &Path, value: &Value) -> Result<(), LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, value.to_json()?).map_err(io_err)?;
    debug!("saved value to {}", path.display());
    Ok(())
}
