//! The box/side/anchor model
//!
//! A diagram is a set of activity boxes plus the diagram's own boundary;
//! each box exposes four sides, and each side owns the named anchors that
//! flow lines attach to. Sides and anchors are addressed by value ids
//! (`SideId`) rather than references, so lines can hold on to them
//! without ownership cycles.

use crate::layout::geometry::Point;
use crate::layout::{BOX_WIDTH, MIN_BOX_HEIGHT, UNIT};

/// A node a line endpoint can belong to: an activity box or the diagram
/// boundary itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// The diagram's own boundary
    Boundary,
    /// An activity box, by stable declaration index
    Process(usize),
}

/// One of the four sides of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideName {
    Top,
    Bottom,
    Left,
    Right,
}

impl SideName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideName::Top => "top",
            SideName::Bottom => "bottom",
            SideName::Left => "left",
            SideName::Right => "right",
        }
    }
}

/// Identifies one side of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SideId {
    pub node: NodeId,
    pub side: SideName,
}

impl SideId {
    pub fn new(node: NodeId, side: SideName) -> Self {
        Self { node, side }
    }
}

/// A named attachment point on a side
///
/// Anchors are created by dependency declarations and start life
/// unattached; the attach pass wires lines to them. Ordering precedence
/// is derived from the attached lines, so querying it on an unattached
/// anchor is a contract violation (handled at the diagram level).
#[derive(Debug, Clone)]
pub struct Anchor {
    name: String,
    sequence: usize,
    lines: Vec<usize>,
}

impl Anchor {
    fn new(name: String, sequence: usize) -> Self {
        Self {
            name,
            sequence,
            lines: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position index along the owning side, 0..k-1 after sequencing
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn is_attached(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Indices of the lines attached to this anchor
    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    fn attach(&mut self, line: usize) {
        if !self.lines.contains(&line) {
            self.lines.push(line);
        }
    }
}

/// One side of a box: an ordered set of anchors, unique by name, plus
/// the margin negotiated for lines routed along this side
#[derive(Debug, Clone)]
pub struct Side {
    id: SideId,
    anchors: Vec<Anchor>,
    margin: f64,
}

impl Side {
    pub(crate) fn new(id: SideId) -> Self {
        Self {
            id,
            anchors: Vec::new(),
            margin: 0.0,
        }
    }

    pub fn id(&self) -> SideId {
        self.id
    }

    /// Declare an expectation: get or create the anchor with this name
    pub(crate) fn expects(&mut self, name: &str) {
        if !self.expects_name(name) {
            let sequence = self.anchors.len();
            self.anchors.push(Anchor::new(name.to_string(), sequence));
        }
    }

    pub fn expects_name(&self, name: &str) -> bool {
        self.anchors.iter().any(|a| a.name == name)
    }

    pub fn anchor(&self, name: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.name == name)
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Names of anchors nothing has attached to yet
    pub fn unattached_names(&self) -> Vec<String> {
        self.anchors
            .iter()
            .filter(|a| !a.is_attached())
            .map(|a| a.name.clone())
            .collect()
    }

    /// Space the neighbouring box or diagram edge must reserve for lines
    /// routed along this side
    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub(crate) fn set_margin(&mut self, margin: f64) {
        self.margin = margin;
    }

    /// Ensure the anchor exists and record the line against it
    pub(crate) fn attach(&mut self, name: &str, line: usize) {
        self.expects(name);
        if let Some(anchor) = self.anchors.iter_mut().find(|a| a.name == name) {
            anchor.attach(line);
        }
    }

    /// Reorder anchors by the given old indices and renumber 0..k-1
    pub(crate) fn apply_order(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.anchors.len());
        let mut reordered = Vec::with_capacity(self.anchors.len());
        for (sequence, &old) in order.iter().enumerate() {
            let mut anchor = self.anchors[old].clone();
            anchor.sequence = sequence;
            reordered.push(anchor);
        }
        self.anchors = reordered;
    }
}

/// The four sides of a node, boundary or box
#[derive(Debug, Clone)]
pub struct SideSet {
    pub top: Side,
    pub bottom: Side,
    pub left: Side,
    pub right: Side,
}

impl SideSet {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            top: Side::new(SideId::new(node, SideName::Top)),
            bottom: Side::new(SideId::new(node, SideName::Bottom)),
            left: Side::new(SideId::new(node, SideName::Left)),
            right: Side::new(SideId::new(node, SideName::Right)),
        }
    }

    pub fn get(&self, side: SideName) -> &Side {
        match side {
            SideName::Top => &self.top,
            SideName::Bottom => &self.bottom,
            SideName::Left => &self.left,
            SideName::Right => &self.right,
        }
    }

    pub(crate) fn get_mut(&mut self, side: SideName) -> &mut Side {
        match side {
            SideName::Top => &mut self.top,
            SideName::Bottom => &mut self.bottom,
            SideName::Left => &mut self.left,
            SideName::Right => &mut self.right,
        }
    }
}

/// An activity box in the decomposition
///
/// Fixed width; height grows with the busier of the left/right sides so
/// every anchor fits at unit spacing.
#[derive(Debug, Clone)]
pub struct ProcessBox {
    name: String,
    origin: Point,
    sequence: usize,
    sides: SideSet,
}

impl ProcessBox {
    pub(crate) fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            origin: Point::ORIGIN,
            sequence: index,
            sides: SideSet::new(NodeId::Process(index)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position in the final left-to-right ordering
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub(crate) fn set_sequence(&mut self, sequence: usize) {
        self.sequence = sequence;
    }

    pub fn side(&self, side: SideName) -> &Side {
        self.sides.get(side)
    }

    pub(crate) fn side_mut(&mut self, side: SideName) -> &mut Side {
        self.sides.get_mut(side)
    }

    pub fn width(&self) -> f64 {
        BOX_WIDTH
    }

    pub fn height(&self) -> f64 {
        let busiest = self
            .sides
            .left
            .anchor_count()
            .max(self.sides.right.anchor_count());
        MIN_BOX_HEIGHT.max(busiest as f64 * UNIT + UNIT)
    }

    pub fn x1(&self) -> f64 {
        self.origin.x
    }

    pub fn y1(&self) -> f64 {
        self.origin.y
    }

    pub fn x2(&self) -> f64 {
        self.x1() + self.width()
    }

    pub fn y2(&self) -> f64 {
        self.y1() + self.height()
    }

    pub(crate) fn move_to(&mut self, top_left: Point) {
        self.origin = top_left;
    }

    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        self.origin = self.origin.translate(dx, dy);
    }

    /// Declare a received input (left side)
    pub fn receives(&mut self, name: &str) {
        self.sides.left.expects(name);
    }

    /// Declare a produced output (right side)
    pub fn produces(&mut self, name: &str) {
        self.sides.right.expects(name);
    }

    /// Declare a respected guidance (top side)
    pub fn respects(&mut self, name: &str) {
        self.sides.top.expects(name);
    }

    /// Declare a required mechanism (bottom side)
    pub fn requires(&mut self, name: &str) {
        self.sides.bottom.expects(name);
    }

    /// Static ordering key: heavy producers sort early, heavy consumers
    /// sort late
    pub fn precedence_key(&self) -> (i64, i64) {
        let consumed = self.sides.left.anchor_count()
            + self.sides.top.anchor_count()
            + self.sides.bottom.anchor_count();
        (-(self.sides.right.anchor_count() as i64), consumed as i64)
    }

    /// Screen position of an anchor on the given side
    ///
    /// Anchors are centred on the side at unit spacing; position follows
    /// the anchor's sequence index.
    pub fn anchor_position(&self, side: SideName, name: &str) -> Option<Point> {
        let side_ref = self.sides.get(side);
        let anchor = side_ref.anchor(name)?;
        let count = side_ref.anchor_count();
        let offset = anchor.sequence() as f64 * UNIT - UNIT * (count as f64 - 1.0) / 2.0;
        Some(match side {
            SideName::Left => Point::new(self.x1(), self.y1() + self.height() / 2.0 + offset),
            SideName::Right => Point::new(self.x2(), self.y1() + self.height() / 2.0 + offset),
            SideName::Top => Point::new(self.x1() + self.width() / 2.0 + offset, self.y1()),
            SideName::Bottom => Point::new(self.x1() + self.width() / 2.0 + offset, self.y2()),
        })
    }
}
