//! Layout engine for IDEF0 decomposition diagrams
//!
//! This module owns the hard part of the renderer: ordering activity
//! boxes to minimize feedback lines, classifying flows into line kinds,
//! sequencing the anchors along each box side, negotiating per-side
//! clearance lanes, and extending the drawing bounds for boundary
//! crossings and labels.

pub mod boxes;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod line;
mod ordering;
pub mod route;

pub use boxes::{Anchor, NodeId, ProcessBox, Side, SideId, SideName};
pub use diagram::Diagram;
pub use error::LayoutError;
pub use geometry::{Alignment, Bounds, BoundsExtension, Label, Point};
pub use line::{Line, LineContext, LineKind, Precedence};
pub use route::LineTrack;

/// Base drawing distance: anchor spacing, lane width, outer margin
pub const UNIT: f64 = 20.0;

/// Fixed width of an activity box
pub const BOX_WIDTH: f64 = 180.0;

/// Minimum height of an activity box
pub const MIN_BOX_HEIGHT: f64 = 60.0;

/// Radius of the quarter-circle fillets joining line segments
pub const FILLET_RADIUS: f64 = 10.0;
