//! idef0 - IDEF0 functional-decomposition diagrams from a tiny DSL
//!
//! This library parses newline-delimited `<Noun> <verb> <Noun>`
//! statements into a process tree, lays out one node's decomposition
//! (boxes ordered to minimize feedback, flows classified and routed
//! with negotiated clearances), and renders the result as SVG.
//!
//! # Example
//!
//! ```rust
//! let svg = idef0::render("Kitchen is composed of Boil Water").unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("Boil Water"));
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod renderer;
pub mod stylesheet;

pub use error::ParseError;
pub use layout::{Diagram, LayoutError, LineKind};
pub use model::{ModelError, ProcessTree};
pub use parser::{parse, Document};
pub use renderer::render_svg;
pub use stylesheet::Stylesheet;

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error building the process tree
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The requested process does not exist
    #[error("process not found: {0:?}")]
    ProcessNotFound(String),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Presentation theme
    pub stylesheet: Stylesheet,
    /// Process whose decomposition to render; the root process if unset
    pub process: Option<String>,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stylesheet
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Select the process to render
    pub fn with_process(mut self, process: impl Into<String>) -> Self {
        self.process = Some(process.into());
        self
    }
}

/// Parse, lay out and return the diagram without rendering it
///
/// Useful for inspecting the computed layout; `process` selects which
/// node's decomposition to build (the root process when `None`).
pub fn diagram(source: &str, process: Option<&str>) -> Result<Diagram, RenderError> {
    let document = parse(source)?;
    let tree = ProcessTree::from_statements(&document.statements)?;
    let index = match process {
        Some(name) => tree
            .find(name)
            .ok_or_else(|| RenderError::ProcessNotFound(name.to_string()))?,
        None => tree.root()?,
    };
    let mut diagram = tree.decomposition(index);
    diagram.build()?;
    Ok(diagram)
}

/// Render DSL source to SVG with default configuration
///
/// # Example
///
/// ```rust
/// let svg = idef0::render(
///     "Cafe is composed of Brew Coffee\n\
///      Cafe receives Beans\n\
///      Brew Coffee receives Beans\n\
///      Brew Coffee produces Coffee\n\
///      Cafe produces Coffee",
/// )
/// .unwrap();
/// assert!(svg.contains("Brew Coffee"));
/// assert!(svg.contains("<rect"));
/// ```
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render DSL source to SVG with custom configuration
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let diagram = diagram(source, config.process.as_deref())?;
    Ok(render_svg(&diagram, &config.stylesheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_process() {
        let svg = render("Kitchen is composed of Boil Water").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("Boil Water"));
    }

    #[test]
    fn test_render_selected_process() {
        let source = "Cafe is composed of Brew Coffee\n\
                      Brew Coffee is composed of Grind Beans\n\
                      Grind Beans receives Beans\n";
        let config = RenderConfig::new().with_process("Brew Coffee");
        let svg = render_with_config(source, config).unwrap();
        assert!(svg.contains("Grind Beans"));
    }

    #[test]
    fn test_unknown_process_is_an_error() {
        let config = RenderConfig::new().with_process("Nowhere");
        let err = render_with_config("A produces B", config).unwrap_err();
        assert!(matches!(err, RenderError::ProcessNotFound(_)));
    }

    #[test]
    fn test_parse_errors_surface() {
        let err = render("Kitchen devours Meals").unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }

    #[test]
    fn test_output_is_deterministic() {
        let source = "Shop is composed of Buy\n\
                      Shop is composed of Sell\n\
                      Buy produces Stock\n\
                      Sell receives Stock\n\
                      Sell produces Reorder Advice\n\
                      Buy respects Reorder Advice\n";
        assert_eq!(render(source).unwrap(), render(source).unwrap());
    }
}
