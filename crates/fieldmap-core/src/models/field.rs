use serde::{Deserialize, Serialize};
use std::fmt;

use super::Boundary;

/// Identifier of a field record owned by the storage layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub String);

impl FieldId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The slice of a field record the overlay needs.
///
/// Persistence of boundary and area stays with the caller; nothing in
/// fieldmap writes a record back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub id: FieldId,
    pub boundary: Option<Boundary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ndvi_value: Option<f64>,
}

impl FieldRecord {
    pub fn new(id: impl Into<FieldId>, boundary: Option<Boundary>) -> Self {
        Self { id: id.into(), boundary, current_ndvi_value: None }
    }

    pub fn with_ndvi(mut self, value: f64) -> Self {
        self.current_ndvi_value = Some(value);
        self
    }
}
