//! The diagram orchestrator
//!
//! A `Diagram` owns the activity boxes of one decomposition plus its own
//! boundary sides, and runs the layout pipeline: sequence boxes →
//! generate lines → attach → synthesize unsatisfied flows → sequence
//! anchors → negotiate clearances and place boxes → extend bounds and
//! resolve label overlap → normalize coordinates.
//!
//! Lines are regenerated wholesale whenever the box ordering changes;
//! nothing mutates a stale line in place.

use std::collections::HashSet;

use crate::layout::boxes::{NodeId, ProcessBox, Side, SideId, SideName, SideSet};
use crate::layout::error::LayoutError;
use crate::layout::geometry::{Bounds, BoundsExtension, Label, Point};
use crate::layout::line::{Line, LineContext, LineKind};
use crate::layout::{ordering, UNIT};

/// An IDEF0 decomposition diagram
#[derive(Debug, Clone)]
pub struct Diagram {
    name: String,
    boundary: SideSet,
    boxes: Vec<ProcessBox>,
    order: Vec<usize>,
    lines: Vec<Line>,
    width: f64,
    height: f64,
    extension: BoundsExtension,
}

impl Diagram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boundary: SideSet::new(NodeId::Boundary),
            boxes: Vec::new(),
            order: Vec::new(),
            lines: Vec::new(),
            width: 0.0,
            height: 0.0,
            extension: BoundsExtension::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Final drawing width, valid after `build`
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The boundary rectangle: origin is fixed, size set by layout
    pub fn x1(&self) -> f64 {
        0.0
    }

    pub fn y1(&self) -> f64 {
        0.0
    }

    pub fn x2(&self) -> f64 {
        self.x1() + self.width
    }

    pub fn y2(&self) -> f64 {
        self.y1() + self.height
    }

    /// Margin accumulated beyond the tight bounds, per compass direction
    pub fn extension(&self) -> BoundsExtension {
        self.extension
    }

    // boundary declarations: what the decomposition as a whole consumes
    // and produces

    pub fn receives(&mut self, name: &str) {
        self.boundary.left.expects(name);
    }

    pub fn produces(&mut self, name: &str) {
        self.boundary.right.expects(name);
    }

    pub fn respects(&mut self, name: &str) {
        self.boundary.top.expects(name);
    }

    pub fn requires(&mut self, name: &str) {
        self.boundary.bottom.expects(name);
    }

    /// Get or create the activity box with this name
    pub fn box_entry(&mut self, name: &str) -> &mut ProcessBox {
        let index = match self.boxes.iter().position(|b| b.name() == name) {
            Some(i) => i,
            None => {
                let index = self.boxes.len();
                self.boxes.push(ProcessBox::new(name, index));
                self.order.push(index);
                index
            }
        };
        &mut self.boxes[index]
    }

    pub fn boxes(&self) -> &[ProcessBox] {
        &self.boxes
    }

    pub fn find_box(&self, name: &str) -> Option<&ProcessBox> {
        self.boxes.iter().find(|b| b.name() == name)
    }

    /// Boxes in final left-to-right order
    pub fn ordered_boxes(&self) -> impl Iterator<Item = &ProcessBox> + '_ {
        self.order.iter().map(move |&i| &self.boxes[i])
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn backward_line_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind().is_backward())
            .count()
    }

    pub fn boundary_side(&self, side: SideName) -> &Side {
        self.boundary.get(side)
    }

    pub(crate) fn side(&self, id: SideId) -> &Side {
        match id.node {
            NodeId::Boundary => self.boundary.get(id.side),
            NodeId::Process(i) => self.boxes[i].side(id.side),
        }
    }

    fn side_mut(&mut self, id: SideId) -> &mut Side {
        match id.node {
            NodeId::Boundary => self.boundary.get_mut(id.side),
            NodeId::Process(i) => self.boxes[i].side_mut(id.side),
        }
    }

    pub(crate) fn process(&self, node: NodeId) -> Option<&ProcessBox> {
        match node {
            NodeId::Boundary => None,
            NodeId::Process(i) => self.boxes.get(i),
        }
    }

    fn side_label(&self, id: SideId) -> String {
        let owner = match id.node {
            NodeId::Boundary => self.name.as_str(),
            NodeId::Process(i) => self.boxes[i].name(),
        };
        format!("{}.{}", owner, id.side.as_str())
    }

    /// Run the whole layout pipeline
    pub fn build(&mut self) -> Result<(), LayoutError> {
        self.sequence_boxes();
        let order = self.order.clone();
        self.lines = self.generate_lines_for(&order);
        self.attach_lines();
        self.create_unsatisfied_lines();
        self.sequence_anchors()?;
        self.layout();
        Ok(())
    }

    /// Order boxes left to right, minimizing backward lines
    pub fn sequence_boxes(&mut self) {
        self.order = ordering::search(self);
        let order = self.order.clone();
        for (sequence, &i) in order.iter().enumerate() {
            self.boxes[i].set_sequence(sequence);
        }
    }

    /// Backward-line count of a candidate ordering
    pub(crate) fn backward_count(&self, order: &[usize]) -> usize {
        self.generate_lines_for(order)
            .iter()
            .filter(|l| l.kind().is_backward())
            .count()
    }

    fn positions(&self, order: &[usize]) -> Vec<usize> {
        let mut pos = vec![0; self.boxes.len()];
        for (p, &i) in order.iter().enumerate() {
            pos[i] = p;
        }
        pos
    }

    /// Generate the satisfied line set for the given box ordering
    ///
    /// One line per (name, kind) match between a producing side and a
    /// consuming expectation. Consuming anchors are fed at most once;
    /// generation order (boundary first, then sources left to right)
    /// picks the winner.
    fn generate_lines_for(&self, order: &[usize]) -> Vec<Line> {
        let pos = self.positions(order);
        let mut lines = Vec::new();
        let mut fed: HashSet<(usize, SideName, String)> = HashSet::new();

        for &t in order {
            let target = &self.boxes[t];

            for anchor in self.boundary.left.anchors() {
                let name = anchor.name();
                if target.side(SideName::Left).expects_name(name)
                    && fed.insert((t, SideName::Left, name.to_string()))
                {
                    lines.push(Line::new(
                        LineKind::ExternalInput,
                        NodeId::Boundary,
                        NodeId::Process(t),
                        name,
                    ));
                }
            }
            for anchor in self.boundary.top.anchors() {
                let name = anchor.name();
                if target.side(SideName::Top).expects_name(name)
                    && fed.insert((t, SideName::Top, name.to_string()))
                {
                    lines.push(Line::new(
                        LineKind::ExternalGuidance,
                        NodeId::Boundary,
                        NodeId::Process(t),
                        name,
                    ));
                }
            }
            for anchor in self.boundary.bottom.anchors() {
                let name = anchor.name();
                if target.side(SideName::Bottom).expects_name(name)
                    && fed.insert((t, SideName::Bottom, name.to_string()))
                {
                    lines.push(Line::new(
                        LineKind::ExternalMechanism,
                        NodeId::Boundary,
                        NodeId::Process(t),
                        name,
                    ));
                }
            }
            for anchor in target.side(SideName::Right).anchors() {
                let name = anchor.name();
                if self.boundary.right.expects_name(name) {
                    lines.push(Line::new(
                        LineKind::ExternalOutput,
                        NodeId::Process(t),
                        NodeId::Boundary,
                        name,
                    ));
                }
            }

            for &s in order {
                let forward = pos[s] < pos[t];
                let backward = pos[s] > pos[t];
                for anchor in self.boxes[s].side(SideName::Right).anchors() {
                    let name = anchor.name();
                    if forward
                        && target.side(SideName::Left).expects_name(name)
                        && fed.insert((t, SideName::Left, name.to_string()))
                    {
                        lines.push(Line::new(
                            LineKind::ForwardInput,
                            NodeId::Process(s),
                            NodeId::Process(t),
                            name,
                        ));
                    }
                    if forward
                        && target.side(SideName::Top).expects_name(name)
                        && fed.insert((t, SideName::Top, name.to_string()))
                    {
                        lines.push(Line::new(
                            LineKind::ForwardGuidance,
                            NodeId::Process(s),
                            NodeId::Process(t),
                            name,
                        ));
                    }
                    if forward
                        && target.side(SideName::Bottom).expects_name(name)
                        && fed.insert((t, SideName::Bottom, name.to_string()))
                    {
                        lines.push(Line::new(
                            LineKind::ForwardMechanism,
                            NodeId::Process(s),
                            NodeId::Process(t),
                            name,
                        ));
                    }
                    if backward
                        && target.side(SideName::Left).expects_name(name)
                        && fed.insert((t, SideName::Left, name.to_string()))
                    {
                        lines.push(Line::new(
                            LineKind::BackwardInput,
                            NodeId::Process(s),
                            NodeId::Process(t),
                            name,
                        ));
                    }
                    if backward
                        && target.side(SideName::Top).expects_name(name)
                        && fed.insert((t, SideName::Top, name.to_string()))
                    {
                        lines.push(Line::new(
                            LineKind::BackwardGuidance,
                            NodeId::Process(s),
                            NodeId::Process(t),
                            name,
                        ));
                    }
                    if (backward || s == t)
                        && target.side(SideName::Bottom).expects_name(name)
                        && fed.insert((t, SideName::Bottom, name.to_string()))
                    {
                        lines.push(Line::new(
                            LineKind::BackwardMechanism,
                            NodeId::Process(s),
                            NodeId::Process(t),
                            name,
                        ));
                    }
                }
            }
        }

        lines
    }

    /// Wire every line to its endpoint anchors
    pub fn attach_lines(&mut self) {
        for idx in 0..self.lines.len() {
            self.attach_line(idx);
        }
    }

    fn attach_line(&mut self, idx: usize) {
        let (source_side, target_side, name) = {
            let line = &self.lines[idx];
            (
                line.source_attach_side(),
                line.target_attach_side(),
                line.name().to_string(),
            )
        };
        if let Some(side) = source_side {
            self.side_mut(side).attach(&name, idx);
        }
        if let Some(side) = target_side {
            self.side_mut(side).attach(&name, idx);
        }
    }

    /// Turn every still-unattached anchor into a dashed external flow
    ///
    /// The missing name is registered as an expectation on the matching
    /// boundary side, keeping the diagram internally consistent.
    pub fn create_unsatisfied_lines(&mut self) {
        let mut missing: Vec<(usize, SideName, String)> = Vec::new();
        for &i in &self.order {
            for side in [
                SideName::Left,
                SideName::Top,
                SideName::Bottom,
                SideName::Right,
            ] {
                for name in self.boxes[i].side(side).unattached_names() {
                    missing.push((i, side, name));
                }
            }
        }

        for (i, side, name) in missing {
            let line = match side {
                SideName::Left => {
                    self.boundary.left.expects(&name);
                    Line::new(
                        LineKind::UnsatisfiedInput,
                        NodeId::Boundary,
                        NodeId::Process(i),
                        name,
                    )
                }
                SideName::Top => {
                    self.boundary.top.expects(&name);
                    Line::new(
                        LineKind::UnsatisfiedGuidance,
                        NodeId::Boundary,
                        NodeId::Process(i),
                        name,
                    )
                }
                SideName::Bottom => {
                    self.boundary.bottom.expects(&name);
                    Line::new(
                        LineKind::UnsatisfiedMechanism,
                        NodeId::Boundary,
                        NodeId::Process(i),
                        name,
                    )
                }
                SideName::Right => {
                    self.boundary.right.expects(&name);
                    Line::new(
                        LineKind::UnsatisfiedOutput,
                        NodeId::Process(i),
                        NodeId::Boundary,
                        name,
                    )
                }
            };
            let idx = self.lines.len();
            self.lines.push(line);
            self.attach_line(idx);
        }
    }

    pub(crate) fn line_context(&self, line: &Line) -> LineContext {
        let sequence_of = |node: NodeId| match node {
            NodeId::Boundary => 0,
            NodeId::Process(i) => self.boxes[i].sequence() as i64,
        };
        let anchor_sequence = |side: Option<SideId>| {
            side.and_then(|s| self.side(s).anchor(line.name()))
                .map(|a| a.sequence() as i64)
                .unwrap_or(0)
        };
        LineContext {
            source_sequence: sequence_of(line.source()),
            target_sequence: sequence_of(line.target()),
            source_anchor_sequence: anchor_sequence(line.source_attach_side()),
            target_anchor_sequence: anchor_sequence(line.target_attach_side()),
        }
    }

    /// Sort every side's anchors by precedence and renumber them 0..k-1
    ///
    /// Left/top/bottom sides first: right-side precedence tuples read
    /// target-anchor sequences, which live on left/top/bottom sides of
    /// other boxes. Sort keys are computed once against the pre-sort
    /// sequences, then applied.
    pub fn sequence_anchors(&mut self) -> Result<(), LayoutError> {
        let mut sides: Vec<SideId> = Vec::new();
        for &i in &self.order {
            for side in [SideName::Top, SideName::Bottom, SideName::Left] {
                sides.push(SideId::new(NodeId::Process(i), side));
            }
        }
        for &i in &self.order {
            sides.push(SideId::new(NodeId::Process(i), SideName::Right));
        }

        for side_id in sides {
            let order = self.anchor_order(side_id)?;
            self.side_mut(side_id).apply_order(&order);
        }
        Ok(())
    }

    fn anchor_order(&self, side_id: SideId) -> Result<Vec<usize>, LayoutError> {
        let side = self.side(side_id);
        let mut keyed = Vec::with_capacity(side.anchor_count());
        for (index, anchor) in side.anchors().iter().enumerate() {
            if !anchor.is_attached() {
                return Err(LayoutError::unattached(
                    self.side_label(side_id),
                    anchor.name(),
                ));
            }
            let key = anchor
                .lines()
                .iter()
                .map(|&l| {
                    let line = &self.lines[l];
                    let ctx = self.line_context(line);
                    (
                        line.clearance_group(side_id).unwrap_or(0),
                        line.anchor_precedence(side_id, &ctx).unwrap_or_default(),
                        line.name().to_string(),
                    )
                })
                .min()
                .expect("attached anchor has at least one line");
            keyed.push((key, index));
        }
        keyed.sort();
        Ok(keyed.into_iter().map(|(_, index)| index).collect())
    }

    /// Place boxes on the staircase, negotiate clearances, extend the
    /// bounds, resolve label overlap, and normalize coordinates
    pub fn layout(&mut self) {
        let order = self.order.clone();
        let mut point = Point::ORIGIN;
        for &i in &order {
            self.boxes[i].move_to(point);
            for side in [
                SideName::Top,
                SideName::Bottom,
                SideName::Left,
                SideName::Right,
            ] {
                self.negotiate_side(SideId::new(NodeId::Process(i), side));
            }
            let top_margin = self.boxes[i].side(SideName::Top).margin();
            self.boxes[i].translate(0.0, top_margin);
            let (x, y) = {
                let b = &self.boxes[i];
                (
                    b.x2() + b.side(SideName::Right).margin(),
                    b.y2() + b.side(SideName::Bottom).margin(),
                )
            };
            point = Point::new(x, y);
        }

        self.extend_boundary_stems();
        self.resolve_label_overlaps();
        self.normalize();
    }

    /// Partition the lines clearing a side into lanes and derive the
    /// side's margin
    fn negotiate_side(&mut self, side_id: SideId) {
        use std::collections::BTreeMap;

        let mut groups: BTreeMap<i64, Vec<(Vec<i64>, String, usize)>> = BTreeMap::new();
        for (idx, line) in self.lines.iter().enumerate() {
            if !line.clears(side_id) {
                continue;
            }
            let group = line.clearance_group(side_id).unwrap_or(0);
            let ctx = self.line_context(line);
            let precedence = line.clearance_precedence(side_id, &ctx).unwrap_or_default();
            groups
                .entry(group)
                .or_default()
                .push((precedence, line.name().to_string(), idx));
        }

        let mut widest_group = 0;
        let mut lanes: Vec<(usize, f64)> = Vec::new();
        for members in groups.values_mut() {
            members.sort();
            widest_group = widest_group.max(members.len());
            for (lane, (_, _, idx)) in members.iter().enumerate() {
                lanes.push((*idx, UNIT * (1.0 + lane as f64)));
            }
        }
        for (idx, distance) in lanes {
            self.lines[idx].clear(side_id, distance);
        }
        self.side_mut(side_id)
            .set_margin(UNIT * (1.0 + widest_group as f64));
    }

    /// Stretch boundary stems so their free ends clear the global
    /// bounds by two units
    fn extend_boundary_stems(&mut self) {
        let bounds = self.content_bounds();
        for idx in 0..self.lines.len() {
            let (kind, side) = {
                let line = &self.lines[idx];
                (line.kind(), line.target_attach_side())
            };
            if !kind.is_boundary_stem() {
                continue;
            }
            let Some(side) = side else { continue };
            let anchor_y = self.track(idx).y2;
            let wanted = match kind {
                LineKind::ExternalGuidance | LineKind::UnsatisfiedGuidance => {
                    (anchor_y - bounds.y1) + 2.0 * UNIT
                }
                _ => (bounds.y2 - anchor_y) + 2.0 * UNIT,
            };
            if wanted > self.lines[idx].clearance_from(side) {
                self.lines[idx].clear(side, wanted);
            }
        }
    }

    /// Greedy label-collision resolver
    ///
    /// Boundary stems widen their clearance one unit at a time while
    /// their label overlaps any label already fixed; everything else
    /// stays put. Bounded by the label count: each mover joins the
    /// fixed set once it stops overlapping.
    fn resolve_label_overlaps(&mut self) {
        let mut fixed: Vec<Label> = Vec::new();
        for idx in 0..self.lines.len() {
            if !self.lines[idx].kind().is_boundary_stem() {
                fixed.push(self.line_label(idx));
            }
        }

        for idx in 0..self.lines.len() {
            let (kind, side) = {
                let line = &self.lines[idx];
                (line.kind(), line.target_attach_side())
            };
            if !kind.is_boundary_stem() {
                continue;
            }
            let Some(side) = side else { continue };
            loop {
                let label = self.line_label(idx);
                if fixed.iter().any(|other| label.overlaps(other)) {
                    let widened = self.lines[idx].clearance_from(side) + UNIT;
                    self.lines[idx].clear(side, widened);
                } else {
                    fixed.push(label);
                    break;
                }
            }
        }
    }

    /// Translate everything into non-negative coordinates and size the
    /// boundary to the content plus the outer margin
    fn normalize(&mut self) {
        let boxes_extent = self.boxes_bounds();
        let mut extension = BoundsExtension::default();
        for idx in 0..self.lines.len() {
            let extent = self.extent_with_label(idx);
            extension.extend_west(-extent.x1);
            extension.extend_north(-extent.y1);
            if let Some(b) = boxes_extent {
                extension.extend_east(extent.x2 - b.x2);
                extension.extend_south(extent.y2 - b.y2);
            }
        }

        let dx = extension.west() + UNIT;
        let dy = extension.north() + UNIT;
        for b in &mut self.boxes {
            b.translate(dx, dy);
        }
        self.extension = extension;

        let content = self.content_bounds_with_labels();
        self.width = content.x2 + UNIT;
        self.height = content.y2 + UNIT;
    }

    fn boxes_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for b in &self.boxes {
            let rect = Bounds::new(b.x1(), b.y1(), b.x2(), b.y2());
            bounds = Some(match bounds {
                Some(acc) => acc.merge(&rect),
                None => rect,
            });
        }
        bounds
    }

    /// Tight rectangle over boxes and line routes
    pub(crate) fn content_bounds(&self) -> Bounds {
        let mut bounds = self.boxes_bounds();
        for idx in 0..self.lines.len() {
            let extent = self.route_extent(idx);
            bounds = Some(match bounds {
                Some(acc) => acc.merge(&extent),
                None => extent,
            });
        }
        bounds.unwrap_or(Bounds::at(Point::ORIGIN))
    }

    fn content_bounds_with_labels(&self) -> Bounds {
        let mut bounds = self.boxes_bounds();
        for idx in 0..self.lines.len() {
            let extent = self.extent_with_label(idx);
            bounds = Some(match bounds {
                Some(acc) => acc.merge(&extent),
                None => extent,
            });
        }
        bounds.unwrap_or(Bounds::at(Point::ORIGIN))
    }
}
