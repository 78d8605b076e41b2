//! Field metadata for describing what an instrument reports

use serde::{Deserialize, Serialize};

/// Type of data a field contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Text data (e.g., a device name or status string)
    Text,
    /// Numerical data (e.g., a voltage reading)
    Numerical,
    /// On/off state
    Boolean,
}

/// Metadata describing a single instrument field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Key under which the instrument reports the value
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Type of data this field contains
    pub field_type: FieldType,
    /// Unit of measurement, if any (e.g., "V", "mA")
    #[serde(default)]
    pub unit: Option<String>,
}

impl FieldMetadata {
    /// Create a new field metadata
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            unit: None,
        }
    }
}
