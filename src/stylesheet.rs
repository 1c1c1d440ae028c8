//! Presentation theme for SVG output
//!
//! Geometry is fixed by the layout engine; the stylesheet only carries
//! presentation: the text face, stroke colour, and the dash pattern
//! marking unsatisfied flows. Loadable from TOML so diagrams can match
//! house style without touching the renderer.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("failed to read stylesheet file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse stylesheet TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Presentation settings for rendered diagrams
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// CSS font-family for all text
    pub font_family: String,
    /// Font size in pixels
    pub font_size: f64,
    /// Stroke colour for boxes, lines and arrowheads
    pub stroke: String,
    /// Dash pattern applied to unsatisfied flows
    pub unsatisfied_dasharray: String,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            font_family: r#""Helvetica Neue", Helvetica, Arial, sans-serif"#.to_string(),
            font_size: 12.0,
            stroke: "black".to_string(),
            unsatisfied_dasharray: "4,2".to_string(),
        }
    }
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize, Default)]
struct TomlStylesheet {
    font: Option<TomlFont>,
    line: Option<TomlLine>,
}

#[derive(Deserialize)]
struct TomlFont {
    family: Option<String>,
    size: Option<f64>,
}

#[derive(Deserialize)]
struct TomlLine {
    stroke: Option<String>,
    unsatisfied_dasharray: Option<String>,
}

impl Stylesheet {
    /// Load stylesheet from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from a TOML string, missing keys keeping their
    /// defaults
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;
        let mut stylesheet = Self::default();
        if let Some(font) = parsed.font {
            if let Some(family) = font.family {
                stylesheet.font_family = family;
            }
            if let Some(size) = font.size {
                stylesheet.font_size = size;
            }
        }
        if let Some(line) = parsed.line {
            if let Some(stroke) = line.stroke {
                stylesheet.stroke = stroke;
            }
            if let Some(dasharray) = line.unsatisfied_dasharray {
                stylesheet.unsatisfied_dasharray = dasharray;
            }
        }
        Ok(stylesheet)
    }
}
