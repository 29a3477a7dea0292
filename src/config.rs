use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::brush::{ToolMode, MAX_PEN_SIZE, MIN_PEN_SIZE};
use crate::codec::{Radix, DEFAULT_ARRAY_NAME, DEFAULT_ELEMENT_TYPE};
use crate::errors::{GridError, Result};
use crate::resize::MAX_DIMENSION;
use crate::undo::DEFAULT_UNDO_CAPACITY;

/// Start-up settings of an editor session. Every field is optional in the
/// JSON form and falls back to the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub width: u16,
    pub height: u16,
    pub max_dimension: u16,
    pub pen_size: u8,
    pub mode: ToolMode,
    pub radix: Radix,
    pub element_type: String,
    pub array_name: String,
    pub undo_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            max_dimension: MAX_DIMENSION,
            pen_size: MIN_PEN_SIZE,
            mode: ToolMode::Fill,
            radix: Radix::Hex,
            element_type: DEFAULT_ELEMENT_TYPE.to_string(),
            array_name: DEFAULT_ARRAY_NAME.to_string(),
            undo_capacity: DEFAULT_UNDO_CAPACITY,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<EditorConfig> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<EditorConfig> {
        let json = fs::read_to_string(path).map_err(|e| {
            GridError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        EditorConfig::from_json_str(&json)
    }

    /// Checks the values that the editor cannot clamp on its own.
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(GridError::Config(
                "max_dimension must be positive".to_string(),
            ));
        }
        if self.width == 0
            || self.height == 0
            || self.width > self.max_dimension
            || self.height > self.max_dimension
        {
            return Err(GridError::Config(format!(
                "grid size {}x{} must be within 1..={}",
                self.width, self.height, self.max_dimension
            )));
        }
        if !(MIN_PEN_SIZE..=MAX_PEN_SIZE).contains(&self.pen_size) {
            return Err(GridError::Config(format!(
                "pen_size must be within {}..={}",
                MIN_PEN_SIZE, MAX_PEN_SIZE
            )));
        }
        if self.element_type.trim().is_empty()
            || self.array_name.trim().is_empty()
        {
            return Err(GridError::Config(
                "element_type and array_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EditorConfig;
    use crate::brush::ToolMode;
    use crate::codec::Radix;
    use crate::errors::GridError;

    #[test]
    fn defaults() {
        let config = EditorConfig::default();
        assert_eq!((config.width, config.height), (16, 16));
        assert_eq!(config.max_dimension, 128);
        assert_eq!(config.pen_size, 1);
        assert_eq!(config.undo_capacity, 100);
        assert_eq!(config.radix, Radix::Hex);
        assert!(config.validate().is_ok());
    }

    /// Missing fields fall back to their defaults.
    #[test]
    fn partial_json_is_merged_with_defaults() {
        let config = EditorConfig::from_json_str(
            r#"{ "width": 8, "height": 4, "radix": "binary", "mode": "erase" }"#,
        )
        .unwrap();
        assert_eq!((config.width, config.height), (8, 4));
        assert_eq!(config.radix, Radix::Binary);
        assert_eq!(config.mode, ToolMode::Erase);
        assert_eq!(config.element_type, "uint8_t");
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            EditorConfig::from_json_str("{ width: "),
            Err(GridError::Config(_))
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(EditorConfig::from_json_str(r#"{ "width": 0 }"#).is_err());
        assert!(EditorConfig::from_json_str(r#"{ "height": 200 }"#).is_err());
        assert!(EditorConfig::from_json_str(r#"{ "pen_size": 11 }"#).is_err());
        assert!(
            EditorConfig::from_json_str(r#"{ "array_name": " " }"#).is_err()
        );
    }
}
