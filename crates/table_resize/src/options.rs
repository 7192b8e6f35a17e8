//! Resize configuration

use crate::{Axis, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling hit-testing and minimum sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeOptions {
    /// Distance from a cell border, in pixels, that counts as hitting it
    pub handle_width: f32,
    /// Smallest width a drag can produce
    pub cell_min_width: f32,
    /// Smallest height a drag can produce
    pub cell_min_height: f32,
    /// Width assumed for columns without an explicit width when laying out
    pub default_cell_min_width: f32,
    /// Whether the trailing border of the last column can be dragged
    pub last_column_resizable: bool,
    /// Whether row borders are hit-tested at all
    pub row_resizing: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            handle_width: 5.0,
            cell_min_width: 25.0,
            cell_min_height: 25.0,
            default_cell_min_width: 100.0,
            last_column_resizable: true,
            row_resizing: true,
        }
    }
}

impl ResizeOptions {
    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load options from a JSON file, falling back to defaults when the file
    /// is missing or unparsable
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        match Self::from_json_str(&content) {
            Ok(options) => Ok(options),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Failed to parse resize options, using defaults: {}",
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Smallest size a drag can produce on `axis`
    pub fn min_size(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Column => self.cell_min_width,
            Axis::Row => self.cell_min_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let options = ResizeOptions::default();
        assert_eq!(options.handle_width, 5.0);
        assert_eq!(options.cell_min_width, 25.0);
        assert_eq!(options.default_cell_min_width, 100.0);
        assert!(options.last_column_resizable);
        assert!(options.row_resizing);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options =
            ResizeOptions::from_json_str(r#"{"handle_width": 8, "row_resizing": false}"#).unwrap();
        assert_eq!(options.handle_width, 8.0);
        assert!(!options.row_resizing);
        assert_eq!(options.cell_min_height, 25.0);
    }

    #[test]
    fn test_load_falls_back_on_bad_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("resize.json");

        assert_eq!(ResizeOptions::load(&path).unwrap(), ResizeOptions::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(ResizeOptions::load(&path).unwrap(), ResizeOptions::default());

        std::fs::write(&path, r#"{"cell_min_width": 40}"#).unwrap();
        assert_eq!(ResizeOptions::load(&path).unwrap().cell_min_width, 40.0);
    }

    #[test]
    fn test_min_size_per_axis() {
        let options = ResizeOptions {
            cell_min_height: 12.0,
            ..Default::default()
        };
        assert_eq!(options.min_size(Axis::Column), 25.0);
        assert_eq!(options.min_size(Axis::Row), 12.0);
    }
}
