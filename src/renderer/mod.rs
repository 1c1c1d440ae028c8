//! SVG renderer for laid-out diagrams
//!
//! Takes a built `Diagram` and produces an SVG document string; all
//! geometry decisions were made by the layout engine.

pub mod svg;

pub use svg::render_svg;
