//! Archive representation of a model object.
//!
//! An archive is an ordered list of keyed, boxed attribute values stamped
//! with the class name and format version. It is serializable with serde; the
//! JSON helpers here are the canonical byte form.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ModelError, ModelResult};
use crate::value::Value;

/// Current archive format version. Archives from a newer version are rejected.
pub const ARCHIVE_VERSION: u32 = 1;

/// One archived attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedField {
    key: String,
    value: Value,
}

impl ArchivedField {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Encoded state of one model object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    class: String,
    version: u32,
    fields: Vec<ArchivedField>,
}

impl Archive {
    pub fn new(class: impl Into<String>, version: u32, fields: Vec<ArchivedField>) -> Self {
        Self {
            class: class.into(),
            version,
            fields,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn fields(&self) -> &[ArchivedField] {
        &self.fields
    }

    /// First value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    /// The single value stored under `key`.
    ///
    /// A missing or repeated key makes the archive malformed.
    pub fn field(&self, key: &str) -> ModelResult<&Value> {
        let mut matches = self.fields.iter().filter(|f| f.key == key);
        let Some(first) = matches.next() else {
            return Err(self.reject(format!("missing field `{key}`")));
        };
        if matches.next().is_some() {
            return Err(self.reject(format!("duplicate field `{key}`")));
        }
        Ok(&first.value)
    }

    /// Check that this archive was written for `class` in a supported version.
    pub fn expect_class(&self, class: &str) -> ModelResult<()> {
        if self.class != class {
            return Err(self.reject(format!("expected class {class}")));
        }
        if self.version > ARCHIVE_VERSION {
            return Err(self.reject(format!(
                "unsupported version {} (max {ARCHIVE_VERSION})",
                self.version
            )));
        }
        Ok(())
    }

    fn reject(&self, reason: String) -> ModelError {
        warn!(class = %self.class, version = self.version, %reason, "rejecting archive");
        ModelError::malformed(format!("{}: {reason}", self.class))
    }

    pub fn to_json(&self) -> ModelResult<String> {
        serde_json::to_string(self).map_err(|e| ModelError::malformed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> ModelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::malformed(e.to_string()))
    }

    pub fn to_bytes(&self) -> ModelResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ModelError::malformed(e.to_string()))
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "archive is not valid json");
            ModelError::malformed(e.to_string())
        })
    }

    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| {
            warn!(error = %e, "archive is not valid json");
            ModelError::malformed(e.to_string())
        })
    }
}
