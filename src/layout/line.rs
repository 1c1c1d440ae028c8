//! The flow-line taxonomy
//!
//! Every flow between two boxes (or a box and the diagram boundary) is a
//! `Line` whose concrete kind is fixed at generation time by where its
//! endpoints attach and by the relative order of source and target in
//! the box sequence. The kinds form a closed set, so the per-kind rules
//! (which sides to clear, lane grouping, ordering tuples, attachment
//! sides) live in match tables here rather than a subclass hierarchy.

use std::collections::HashMap;

use crate::layout::boxes::{NodeId, SideId, SideName};
use crate::layout::UNIT;

/// Multi-key ordering tuple, compared lexicographically
pub type Precedence = Vec<i64>;

/// Sequence numbers a line's ordering tuples are built from
///
/// Box sequences come from the ordering search; anchor sequences from
/// the anchor sequencing pass. Entries that do not apply to a kind (the
/// boundary has no sequence) are never read by its tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineContext {
    pub source_sequence: i64,
    pub target_sequence: i64,
    pub source_anchor_sequence: i64,
    pub target_anchor_sequence: i64,
}

/// The closed set of flow-line kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    ExternalInput,
    ExternalOutput,
    ExternalGuidance,
    ExternalMechanism,
    UnsatisfiedInput,
    UnsatisfiedOutput,
    UnsatisfiedGuidance,
    UnsatisfiedMechanism,
    ForwardInput,
    ForwardGuidance,
    ForwardMechanism,
    BackwardInput,
    BackwardGuidance,
    BackwardMechanism,
}

impl LineKind {
    /// Feedback flows: source follows target in the box ordering
    pub fn is_backward(&self) -> bool {
        matches!(
            self,
            LineKind::BackwardInput | LineKind::BackwardGuidance | LineKind::BackwardMechanism
        )
    }

    /// Flows with one endpoint on the diagram boundary
    pub fn is_external(&self) -> bool {
        !matches!(
            self,
            LineKind::ForwardInput
                | LineKind::ForwardGuidance
                | LineKind::ForwardMechanism
                | LineKind::BackwardInput
                | LineKind::BackwardGuidance
                | LineKind::BackwardMechanism
        )
    }

    /// Flows standing in for a dependency nothing satisfies
    pub fn is_unsatisfied(&self) -> bool {
        matches!(
            self,
            LineKind::UnsatisfiedInput
                | LineKind::UnsatisfiedOutput
                | LineKind::UnsatisfiedGuidance
                | LineKind::UnsatisfiedMechanism
        )
    }

    /// Vertical boundary stems whose clearance is widened by the bounds
    /// and label-overlap passes
    pub fn is_boundary_stem(&self) -> bool {
        matches!(
            self,
            LineKind::ExternalGuidance
                | LineKind::ExternalMechanism
                | LineKind::UnsatisfiedGuidance
                | LineKind::UnsatisfiedMechanism
        )
    }
}

/// A flow between two nodes
///
/// Source, target and name are fixed at construction; only the per-side
/// clearance map mutates, during negotiation and overlap resolution.
#[derive(Debug, Clone)]
pub struct Line {
    kind: LineKind,
    source: NodeId,
    target: NodeId,
    name: String,
    clearance: HashMap<SideId, f64>,
}

impl Line {
    pub(crate) fn new(kind: LineKind, source: NodeId, target: NodeId, name: impl Into<String>) -> Self {
        let mut line = Self {
            kind,
            source,
            target,
            name: name.into(),
            clearance: HashMap::new(),
        };
        // boundary stems start one unit off their box edge
        match kind {
            LineKind::ExternalGuidance | LineKind::UnsatisfiedGuidance => {
                line.clearance
                    .insert(SideId::new(line.target, SideName::Top), UNIT);
            }
            LineKind::ExternalMechanism | LineKind::UnsatisfiedMechanism => {
                line.clearance
                    .insert(SideId::new(line.target, SideName::Bottom), UNIT);
            }
            _ => {}
        }
        line
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn side_of(&self, node: NodeId, side: SideName) -> SideId {
        SideId::new(node, side)
    }

    fn src(&self, side: SideName) -> SideId {
        self.side_of(self.source, side)
    }

    fn tgt(&self, side: SideName) -> SideId {
        self.side_of(self.target, side)
    }

    /// The side of the source node this line attaches to, if any
    ///
    /// Boundary endpoints are not attached: their positions fall out of
    /// the line's own geometry, and the boundary side only carries the
    /// name as an expectation.
    pub fn source_attach_side(&self) -> Option<SideId> {
        match self.kind {
            LineKind::ForwardInput
            | LineKind::ForwardGuidance
            | LineKind::ForwardMechanism
            | LineKind::BackwardInput
            | LineKind::BackwardGuidance
            | LineKind::BackwardMechanism
            | LineKind::ExternalOutput
            | LineKind::UnsatisfiedOutput => Some(self.src(SideName::Right)),
            _ => None,
        }
    }

    /// The side of the target node this line attaches to, if any
    pub fn target_attach_side(&self) -> Option<SideId> {
        match self.kind {
            LineKind::ForwardInput
            | LineKind::BackwardInput
            | LineKind::ExternalInput
            | LineKind::UnsatisfiedInput => Some(self.tgt(SideName::Left)),
            LineKind::ForwardGuidance
            | LineKind::BackwardGuidance
            | LineKind::ExternalGuidance
            | LineKind::UnsatisfiedGuidance => Some(self.tgt(SideName::Top)),
            LineKind::ForwardMechanism
            | LineKind::BackwardMechanism
            | LineKind::ExternalMechanism
            | LineKind::UnsatisfiedMechanism => Some(self.tgt(SideName::Bottom)),
            LineKind::ExternalOutput | LineKind::UnsatisfiedOutput => None,
        }
    }

    /// Sides this line must be offset from during clearance negotiation
    pub fn sides_to_clear(&self) -> Vec<SideId> {
        match self.kind {
            LineKind::ForwardInput => vec![self.src(SideName::Right)],
            LineKind::ForwardMechanism => {
                vec![self.src(SideName::Right), self.tgt(SideName::Bottom)]
            }
            LineKind::BackwardInput => vec![
                self.src(SideName::Right),
                self.src(SideName::Bottom),
                self.tgt(SideName::Left),
            ],
            LineKind::BackwardGuidance => {
                vec![self.tgt(SideName::Top), self.src(SideName::Right)]
            }
            LineKind::BackwardMechanism => {
                vec![self.src(SideName::Right), self.src(SideName::Bottom)]
            }
            _ => Vec::new(),
        }
    }

    pub fn clears(&self, side: SideId) -> bool {
        self.sides_to_clear().contains(&side)
    }

    /// Lane tier on the given side; lower tiers draw closer to the box
    pub fn clearance_group(&self, side: SideId) -> Option<i64> {
        match self.kind {
            LineKind::ForwardInput if side == self.src(SideName::Right) => Some(3),
            LineKind::ForwardInput if side == self.tgt(SideName::Left) => Some(1),
            LineKind::ForwardGuidance if side == self.src(SideName::Right) => Some(2),
            LineKind::ForwardGuidance if side == self.tgt(SideName::Top) => Some(1),
            LineKind::ForwardMechanism if side == self.src(SideName::Right) => Some(3),
            LineKind::ForwardMechanism if side == self.tgt(SideName::Bottom) => Some(1),
            LineKind::BackwardInput if side == self.src(SideName::Right) => Some(3),
            LineKind::BackwardInput if side == self.src(SideName::Bottom) => Some(1),
            LineKind::BackwardInput if side == self.tgt(SideName::Left) => Some(1),
            LineKind::BackwardGuidance if side == self.src(SideName::Right) => Some(1),
            LineKind::BackwardGuidance if side == self.tgt(SideName::Top) => Some(3),
            LineKind::BackwardMechanism if side == self.src(SideName::Right) => Some(3),
            LineKind::BackwardMechanism if side == self.tgt(SideName::Bottom) => Some(3),
            LineKind::BackwardMechanism if side == self.src(SideName::Bottom) => Some(1),
            LineKind::ExternalInput | LineKind::UnsatisfiedInput
                if side == self.tgt(SideName::Left) =>
            {
                Some(2)
            }
            LineKind::ExternalOutput | LineKind::UnsatisfiedOutput
                if side == self.src(SideName::Right) =>
            {
                Some(2)
            }
            LineKind::ExternalGuidance | LineKind::UnsatisfiedGuidance
                if side == self.tgt(SideName::Top) =>
            {
                Some(2)
            }
            LineKind::ExternalMechanism | LineKind::UnsatisfiedMechanism
                if side == self.tgt(SideName::Bottom) =>
            {
                Some(2)
            }
            _ => None,
        }
    }

    /// Ordering of lines within a clearance group on the given side
    pub fn clearance_precedence(&self, side: SideId, ctx: &LineContext) -> Option<Precedence> {
        let s = ctx.source_sequence;
        let t = ctx.target_sequence;
        let sa = ctx.source_anchor_sequence;
        let ta = ctx.target_anchor_sequence;
        match self.kind {
            LineKind::ForwardInput if side == self.src(SideName::Right) => {
                Some(vec![2, -t, 2, -ta])
            }
            LineKind::ForwardMechanism if side == self.src(SideName::Right) => {
                Some(vec![2, -t, 1, -ta])
            }
            LineKind::ForwardMechanism if side == self.tgt(SideName::Bottom) => {
                Some(vec![-s, 1, ta])
            }
            LineKind::BackwardInput if side == self.src(SideName::Right) => Some(vec![-t, -ta]),
            LineKind::BackwardInput if side == self.src(SideName::Bottom) => {
                Some(vec![-t, 2, -ta])
            }
            LineKind::BackwardInput if side == self.tgt(SideName::Left) => Some(vec![1]),
            LineKind::BackwardGuidance if side == self.src(SideName::Right) => {
                Some(vec![1, -t, sa])
            }
            LineKind::BackwardGuidance if side == self.tgt(SideName::Top) => {
                Some(vec![1, s, -ta])
            }
            LineKind::BackwardMechanism if side == self.src(SideName::Right) => {
                Some(vec![-t, -ta])
            }
            LineKind::BackwardMechanism if side == self.src(SideName::Bottom) => {
                Some(vec![-t, 2, -ta])
            }
            _ => None,
        }
    }

    /// Ordering tuple an anchor uses to place itself among siblings
    ///
    /// Anchor order and routing-lane order are separate concerns: some
    /// kinds anchor in box-sequence order while their lanes sort the
    /// other way, which is what keeps bundles of parallel flows from
    /// crossing.
    pub fn anchor_precedence(&self, side: SideId, ctx: &LineContext) -> Option<Precedence> {
        let s = ctx.source_sequence;
        let t = ctx.target_sequence;
        let sa = ctx.source_anchor_sequence;
        let ta = ctx.target_anchor_sequence;
        if self.kind.is_external() {
            return Some(Vec::new());
        }
        match self.kind {
            LineKind::ForwardInput if side == self.tgt(SideName::Left) => Some(vec![-s]),
            LineKind::ForwardInput if side == self.src(SideName::Right) => {
                Some(vec![-2, t, -2, ta])
            }
            LineKind::ForwardGuidance if side == self.tgt(SideName::Top) => Some(vec![-s]),
            LineKind::ForwardGuidance if side == self.src(SideName::Right) => Some(vec![-t]),
            LineKind::ForwardMechanism if side == self.src(SideName::Right) => {
                Some(vec![-2, t, -1, ta])
            }
            LineKind::ForwardMechanism if side == self.tgt(SideName::Bottom) => {
                Some(vec![-s, 1, ta])
            }
            LineKind::BackwardInput if side == self.tgt(SideName::Left) => Some(vec![-s]),
            LineKind::BackwardInput if side == self.src(SideName::Right) => Some(vec![t, ta]),
            LineKind::BackwardGuidance if side == self.tgt(SideName::Top) => {
                Some(vec![-1, -s, ta])
            }
            LineKind::BackwardGuidance if side == self.src(SideName::Right) => {
                Some(vec![1, -t, sa])
            }
            LineKind::BackwardMechanism if side == self.tgt(SideName::Bottom) => Some(vec![-s]),
            LineKind::BackwardMechanism if side == self.src(SideName::Right) => {
                Some(vec![-t, -ta])
            }
            _ => None,
        }
    }

    /// Current offset of this line from the given side
    pub fn clearance_from(&self, side: SideId) -> f64 {
        self.clearance.get(&side).copied().unwrap_or(0.0)
    }

    pub(crate) fn clear(&mut self, side: SideId, distance: f64) {
        self.clearance.insert(side, distance);
    }
}
