//! Routing geometry
//!
//! Resolves each line's abstract attachment into concrete coordinates:
//! endpoints, the positions of its one or two axis-aligned bends, its
//! drawing extent, and its label. Emission of the actual SVG path lives
//! in the renderer; everything here is plain geometry so the bounds and
//! label passes can reuse it.

use crate::layout::boxes::{NodeId, SideId, SideName};
use crate::layout::diagram::Diagram;
use crate::layout::geometry::{Bounds, Label, Point};
use crate::layout::line::LineKind;

/// Resolved coordinates for one line
///
/// `(x1, y1)` is the source end, `(x2, y2)` the target end (where the
/// arrowhead lands). `x_vertical` is the x of the single vertical run
/// between two horizontal runs; `y_horizontal` the y of the long
/// horizontal run a two-bend (backward) route takes around the box.
#[derive(Debug, Clone, Copy)]
pub struct LineTrack {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub x_vertical: Option<f64>,
    pub y_horizontal: Option<f64>,
}

impl Diagram {
    fn attached_anchor_point(&self, node: NodeId, side: SideName, name: &str) -> Point {
        self.process(node)
            .and_then(|b| b.anchor_position(side, name))
            .expect("line endpoints attach to existing anchors")
    }

    fn minimum_length(&self, name: &str) -> f64 {
        10.0 + name.chars().count() as f64 * 7.0
    }

    /// Resolve the routing geometry of the line at `idx`
    pub fn track(&self, idx: usize) -> LineTrack {
        let line = &self.lines()[idx];
        let name = line.name();
        let source = line.source();
        let target = line.target();
        let cf = |node: NodeId, side: SideName| line.clearance_from(SideId::new(node, side));

        match line.kind() {
            LineKind::ForwardInput => {
                let sp = self.attached_anchor_point(source, SideName::Right, name);
                let tp = self.attached_anchor_point(target, SideName::Left, name);
                LineTrack {
                    x1: sp.x,
                    y1: sp.y,
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: Some(sp.x + cf(source, SideName::Right)),
                    y_horizontal: None,
                }
            }
            LineKind::ForwardGuidance => {
                let sp = self.attached_anchor_point(source, SideName::Right, name);
                let tp = self.attached_anchor_point(target, SideName::Top, name);
                LineTrack {
                    x1: sp.x,
                    y1: sp.y,
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: None,
                    y_horizontal: None,
                }
            }
            LineKind::ForwardMechanism => {
                let sp = self.attached_anchor_point(source, SideName::Right, name);
                let tp = self.attached_anchor_point(target, SideName::Bottom, name);
                LineTrack {
                    x1: sp.x,
                    y1: sp.y,
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: Some(sp.x + cf(source, SideName::Right)),
                    y_horizontal: Some(tp.y + cf(target, SideName::Bottom)),
                }
            }
            LineKind::BackwardInput => {
                let sp = self.attached_anchor_point(source, SideName::Right, name);
                let tp = self.attached_anchor_point(target, SideName::Left, name);
                let source_bottom = self
                    .process(source)
                    .map(|b| b.y2())
                    .unwrap_or(sp.y);
                LineTrack {
                    x1: sp.x,
                    y1: sp.y,
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: Some(sp.x + cf(source, SideName::Right)),
                    y_horizontal: Some(source_bottom + cf(source, SideName::Bottom)),
                }
            }
            LineKind::BackwardGuidance => {
                let sp = self.attached_anchor_point(source, SideName::Right, name);
                let tp = self.attached_anchor_point(target, SideName::Top, name);
                LineTrack {
                    x1: sp.x,
                    y1: sp.y,
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: Some(sp.x + cf(source, SideName::Right)),
                    y_horizontal: Some(tp.y - cf(target, SideName::Top)),
                }
            }
            LineKind::BackwardMechanism => {
                let sp = self.attached_anchor_point(source, SideName::Right, name);
                let tp = self.attached_anchor_point(target, SideName::Bottom, name);
                let source_bottom = self
                    .process(source)
                    .map(|b| b.y2())
                    .unwrap_or(sp.y);
                LineTrack {
                    x1: sp.x,
                    y1: sp.y,
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: Some(sp.x + cf(source, SideName::Right)),
                    y_horizontal: Some(source_bottom + cf(source, SideName::Bottom)),
                }
            }
            LineKind::ExternalInput | LineKind::UnsatisfiedInput => {
                let tp = self.attached_anchor_point(target, SideName::Left, name);
                let x1 = self.x1().min(tp.x - self.minimum_length(name));
                LineTrack {
                    x1,
                    y1: tp.y,
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: None,
                    y_horizontal: None,
                }
            }
            LineKind::ExternalOutput | LineKind::UnsatisfiedOutput => {
                let sp = self.attached_anchor_point(source, SideName::Right, name);
                let x2 = (sp.x + self.minimum_length(name)).max(self.x2());
                LineTrack {
                    x1: sp.x,
                    y1: sp.y,
                    x2,
                    y2: sp.y,
                    x_vertical: None,
                    y_horizontal: None,
                }
            }
            LineKind::ExternalGuidance | LineKind::UnsatisfiedGuidance => {
                let tp = self.attached_anchor_point(target, SideName::Top, name);
                LineTrack {
                    x1: tp.x,
                    y1: tp.y - cf(target, SideName::Top),
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: None,
                    y_horizontal: None,
                }
            }
            LineKind::ExternalMechanism | LineKind::UnsatisfiedMechanism => {
                let tp = self.attached_anchor_point(target, SideName::Bottom, name);
                LineTrack {
                    x1: tp.x,
                    y1: tp.y + cf(target, SideName::Bottom),
                    x2: tp.x,
                    y2: tp.y,
                    x_vertical: None,
                    y_horizontal: None,
                }
            }
        }
    }

    /// The label of the line at `idx`, positioned against its route
    pub fn line_label(&self, idx: usize) -> Label {
        let line = &self.lines()[idx];
        let name = line.name().to_string();
        let t = self.track(idx);
        let xv = t.x_vertical.unwrap_or(t.x1);
        let yh = t.y_horizontal.unwrap_or(t.y1);
        match line.kind() {
            LineKind::ForwardInput | LineKind::ForwardGuidance => {
                Label::left_aligned(name, Point::new(t.x1 + 5.0, t.y1 - 5.0))
            }
            LineKind::ForwardMechanism => {
                Label::left_aligned(name, Point::new(xv + 10.0, yh - 5.0))
            }
            LineKind::BackwardInput => {
                Label::left_aligned(name, Point::new(t.x2 + 10.0, yh - 5.0))
            }
            LineKind::BackwardGuidance => {
                Label::right_aligned(name, Point::new(xv - 10.0, yh + 15.0))
            }
            LineKind::BackwardMechanism => {
                Label::right_aligned(name, Point::new(xv - 10.0, yh - 5.0))
            }
            LineKind::ExternalInput | LineKind::UnsatisfiedInput => {
                Label::left_aligned(name, Point::new(self.x1() + 5.0, t.y1 - 5.0))
            }
            LineKind::ExternalOutput | LineKind::UnsatisfiedOutput => {
                Label::right_aligned(name, Point::new(self.x2() - 5.0, t.y2 - 5.0))
            }
            LineKind::ExternalGuidance | LineKind::UnsatisfiedGuidance => {
                Label::centred(name, Point::new(t.x1, t.y1 + 15.0))
            }
            LineKind::ExternalMechanism | LineKind::UnsatisfiedMechanism => {
                Label::centred(name, Point::new(t.x1, t.y1 - 5.0))
            }
        }
    }

    /// Corner points of the route's polyline
    fn route_points(&self, idx: usize) -> Vec<Point> {
        let t = self.track(idx);
        let xv = t.x_vertical.unwrap_or(t.x1);
        match self.lines()[idx].kind() {
            LineKind::ForwardInput => vec![
                Point::new(t.x1, t.y1),
                Point::new(xv, t.y1),
                Point::new(xv, t.y2),
                Point::new(t.x2, t.y2),
            ],
            LineKind::ForwardGuidance => vec![
                Point::new(t.x1, t.y1),
                Point::new(t.x2, t.y1),
                Point::new(t.x2, t.y2),
            ],
            LineKind::ForwardMechanism
            | LineKind::BackwardInput
            | LineKind::BackwardGuidance
            | LineKind::BackwardMechanism => {
                let yh = t.y_horizontal.unwrap_or(t.y1);
                vec![
                    Point::new(t.x1, t.y1),
                    Point::new(xv, t.y1),
                    Point::new(xv, yh),
                    Point::new(t.x2, yh),
                    Point::new(t.x2, t.y2),
                ]
            }
            _ => vec![Point::new(t.x1, t.y1), Point::new(t.x2, t.y2)],
        }
    }

    /// Tight rectangle over the route
    pub(crate) fn route_extent(&self, idx: usize) -> Bounds {
        let points = self.route_points(idx);
        let mut bounds = Bounds::at(points[0]);
        for p in &points[1..] {
            bounds = bounds.include(*p);
        }
        bounds
    }

    /// Route extent, plus the label rectangle for boundary stems
    ///
    /// Stem labels sit at the free end, outside the box grid, so they
    /// genuinely extend the drawing; every other label hugs its route.
    pub(crate) fn extent_with_label(&self, idx: usize) -> Bounds {
        let mut bounds = self.route_extent(idx);
        if self.lines()[idx].kind().is_boundary_stem() {
            let label = self.line_label(idx);
            bounds = bounds.merge(&Bounds::new(
                label.left_edge(),
                label.top_edge(),
                label.right_edge(),
                label.bottom_edge(),
            ));
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::diagram::Diagram;
    use crate::layout::UNIT;

    fn built(f: impl FnOnce(&mut Diagram)) -> Diagram {
        let mut d = Diagram::new("Test");
        f(&mut d);
        d.build().unwrap();
        d
    }

    fn line_index(d: &Diagram, kind: LineKind) -> usize {
        d.lines()
            .iter()
            .position(|l| l.kind() == kind)
            .expect("line kind present")
    }

    #[test]
    fn test_forward_input_runs_left_to_right() {
        let d = built(|d| {
            d.box_entry("Maker").produces("X");
            d.box_entry("User").receives("X");
        });
        let t = d.track(line_index(&d, LineKind::ForwardInput));
        assert!(t.x1 < t.x2, "source end left of target end");
        assert!(t.y1 < t.y2, "staircase places the target lower");
        let xv = t.x_vertical.unwrap();
        assert!(xv > t.x1 && xv < t.x2);
    }

    #[test]
    fn test_backward_guidance_routes_above_target() {
        let d = built(|d| {
            // two forward inputs pin Early before Late, so the report
            // flow has to feed back
            let early = d.box_entry("Early");
            early.respects("Report");
            early.produces("Work One");
            early.produces("Work Two");
            let late = d.box_entry("Late");
            late.produces("Report");
            late.receives("Work One");
            late.receives("Work Two");
        });
        let idx = line_index(&d, LineKind::BackwardGuidance);
        let t = d.track(idx);
        let yh = t.y_horizontal.unwrap();
        assert!(yh < t.y2, "feedback runs above the target's top edge");
        assert!(t.x_vertical.unwrap() > t.x1);
    }

    #[test]
    fn test_external_input_meets_minimum_length() {
        let d = built(|d| {
            d.receives("Hungry Customer");
            d.box_entry("Serve").receives("Hungry Customer");
        });
        let t = d.track(line_index(&d, LineKind::ExternalInput));
        assert!(t.x2 - t.x1 >= 10.0 + 15.0 * 7.0);
        assert_eq!(t.y1, t.y2);
    }

    #[test]
    fn test_guidance_stem_clears_the_bounds() {
        let d = built(|d| {
            d.respects("Plan");
            d.box_entry("Work").respects("Plan");
        });
        let t = d.track(line_index(&d, LineKind::ExternalGuidance));
        assert_eq!(t.x1, t.x2);
        // free end sits at least two units above the box top
        let top = d.find_box("Work").unwrap().y1();
        assert!(t.y1 <= top - 2.0 * UNIT);
    }

    #[test]
    fn test_stem_label_extends_the_extent() {
        let d = built(|d| {
            d.requires("Espresso Machine");
            d.box_entry("Brew").requires("Espresso Machine");
        });
        let idx = line_index(&d, LineKind::ExternalMechanism);
        let with_label = d.extent_with_label(idx);
        let without = d.route_extent(idx);
        assert!(with_label.x2 - with_label.x1 >= without.x2 - without.x1);
    }
}
