//! Structural properties of the layout engine, checked end to end

use pretty_assertions::assert_eq;

use idef0::layout::{NodeId, SideId, SideName, UNIT};
use idef0::{diagram, Diagram, LineKind};

const SIDES: [SideName; 4] = [
    SideName::Top,
    SideName::Bottom,
    SideName::Left,
    SideName::Right,
];

// a decomposition busy enough to exercise every line kind
const OPERATION: &str = "\
Operate receives Hungry Customer
Operate produces Satisfied Customer
Operate respects Business Plan
Operate requires Facility

Operate is composed of Oversee
Operate is composed of Supply
Operate is composed of Serve

Oversee respects Business Plan
Oversee respects Suggestions
Oversee produces Directives

Supply respects Directives
Supply produces Ingredients
Supply produces Uniforms
Supply requires Transport

Serve receives Hungry Customer
Serve receives Ingredients
Serve respects Directives
Serve produces Satisfied Customer
Serve produces Suggestions
Serve requires Uniforms
Serve requires Facility
";

fn built() -> Diagram {
    diagram(OPERATION, None).unwrap()
}

#[test]
fn test_every_side_sequences_a_permutation() {
    let d = built();
    for b in d.boxes() {
        for side in SIDES {
            let anchors = b.side(side).anchors();
            let mut sequences: Vec<usize> = anchors.iter().map(|a| a.sequence()).collect();
            sequences.sort();
            let expected: Vec<usize> = (0..anchors.len()).collect();
            assert_eq!(sequences, expected, "{}.{}", b.name(), side.as_str());
        }
    }
}

#[test]
fn test_margins_match_widest_clearance_group() {
    let d = built();
    for (i, b) in d.boxes().iter().enumerate() {
        for side in SIDES {
            let side_id = SideId::new(NodeId::Process(i), side);
            let mut group_sizes: std::collections::BTreeMap<i64, usize> =
                std::collections::BTreeMap::new();
            for line in d.lines() {
                if line.clears(side_id) {
                    let group = line.clearance_group(side_id).unwrap_or(0);
                    *group_sizes.entry(group).or_insert(0) += 1;
                }
            }
            let widest = group_sizes.values().copied().max().unwrap_or(0);
            let expected = UNIT * (1.0 + widest as f64);
            assert_eq!(
                b.side(side).margin(),
                expected,
                "{}.{}",
                b.name(),
                side.as_str()
            );
        }
    }
}

#[test]
fn test_lines_in_a_group_take_distinct_lanes() {
    let d = built();
    for (i, _) in d.boxes().iter().enumerate() {
        for side in SIDES {
            let side_id = SideId::new(NodeId::Process(i), side);
            let mut lanes: std::collections::BTreeMap<i64, Vec<i64>> =
                std::collections::BTreeMap::new();
            for line in d.lines() {
                if line.clears(side_id) {
                    let group = line.clearance_group(side_id).unwrap_or(0);
                    lanes
                        .entry(group)
                        .or_default()
                        .push(line.clearance_from(side_id) as i64);
                }
            }
            for (group, mut distances) in lanes {
                distances.sort();
                let expected: Vec<i64> =
                    (1..=distances.len() as i64).map(|n| n * UNIT as i64).collect();
                assert_eq!(distances, expected, "group {} on side {:?}", group, side_id);
            }
        }
    }
}

#[test]
fn test_boundary_stem_labels_do_not_overlap() {
    let d = built();
    let labels: Vec<(bool, idef0::layout::Label)> = (0..d.lines().len())
        .map(|idx| (d.lines()[idx].kind().is_boundary_stem(), d.line_label(idx)))
        .collect();
    for (i, (stem_a, a)) in labels.iter().enumerate() {
        for (stem_b, b) in labels.iter().skip(i + 1) {
            if *stem_a || *stem_b {
                assert!(
                    !a.overlaps(b),
                    "labels {:?} and {:?} overlap",
                    a.text(),
                    b.text()
                );
            }
        }
    }
}

#[test]
fn test_stem_clearances_reach_past_every_box() {
    let d = built();
    for idx in 0..d.lines().len() {
        let line = &d.lines()[idx];
        let t = d.track(idx);
        match line.kind() {
            LineKind::ExternalGuidance | LineKind::UnsatisfiedGuidance => {
                for b in d.boxes() {
                    assert!(t.y1 < b.y1(), "guidance stem ends above every box");
                }
            }
            LineKind::ExternalMechanism | LineKind::UnsatisfiedMechanism => {
                for b in d.boxes() {
                    assert!(t.y1 > b.y2(), "mechanism stem ends below every box");
                }
            }
            _ => {}
        }
    }
}

#[test]
fn test_no_dependencies_means_no_lines() {
    let d = diagram(
        "Plant is composed of Alpha\n\
         Plant is composed of Beta\n",
        None,
    )
    .unwrap();
    assert!(d.lines().is_empty());
}

#[test]
fn test_single_match_makes_a_single_forward_input() {
    let d = diagram(
        "Plant is composed of Maker\n\
         Plant is composed of User\n\
         Maker produces Parts\n\
         User receives Parts\n",
        None,
    )
    .unwrap();
    let kinds: Vec<LineKind> = d.lines().iter().map(|l| l.kind()).collect();
    assert_eq!(kinds, vec![LineKind::ForwardInput]);
    let maker = d.find_box("Maker").unwrap();
    let user = d.find_box("User").unwrap();
    assert!(maker.sequence() < user.sequence());
}

#[test]
fn test_declaration_order_does_not_force_feedback() {
    // C respects X, A produces X, B receives X, declared C first: the
    // ordering search must still find a forward-only arrangement
    let d = diagram(
        "Plant is composed of C\n\
         Plant is composed of A\n\
         Plant is composed of B\n\
         C respects X\n\
         A produces X\n\
         B receives X\n",
        None,
    )
    .unwrap();
    assert_eq!(d.backward_line_count(), 0);
    let forward_inputs = d
        .lines()
        .iter()
        .filter(|l| l.kind() == LineKind::ForwardInput)
        .count();
    let guidances = d
        .lines()
        .iter()
        .filter(|l| l.kind() == LineKind::ForwardGuidance)
        .count();
    assert_eq!(forward_inputs, 1);
    assert_eq!(guidances, 1);
    assert!(d.find_box("A").unwrap().sequence() < d.find_box("B").unwrap().sequence());
}

#[test]
fn test_unavoidable_feedback_is_a_single_backward_input() {
    // two forward inputs pin First before Last, so the feedback flow
    // must route backward
    let d = diagram(
        "Plant is composed of First\n\
         Plant is composed of Last\n\
         First receives Feedback\n\
         First produces Work One\n\
         First produces Work Two\n\
         Last receives Work One\n\
         Last receives Work Two\n\
         Last produces Feedback\n",
        None,
    )
    .unwrap();
    let backward: Vec<&str> = d
        .lines()
        .iter()
        .filter(|l| l.kind() == LineKind::BackwardInput)
        .map(|l| l.name())
        .collect();
    assert_eq!(backward, vec!["Feedback"]);
    assert_eq!(d.backward_line_count(), 1);
}

#[test]
fn test_scrambled_declaration_reaches_the_same_minimum() {
    let forward = "Plant is composed of A\n\
                   Plant is composed of B\n\
                   Plant is composed of C\n\
                   A produces X\n\
                   B receives X\n\
                   C respects X\n";
    let scrambled = "Plant is composed of C\n\
                     Plant is composed of B\n\
                     Plant is composed of A\n\
                     C respects X\n\
                     B receives X\n\
                     A produces X\n";
    let a = diagram(forward, None).unwrap();
    let b = diagram(scrambled, None).unwrap();
    assert_eq!(a.backward_line_count(), b.backward_line_count());
}

#[test]
fn test_unmet_mechanism_becomes_unsatisfied_line() {
    let d = diagram(
        "Plant is composed of Press\n\
         Press requires Hydraulic Fluid\n",
        None,
    )
    .unwrap();
    let kinds: Vec<LineKind> = d.lines().iter().map(|l| l.kind()).collect();
    assert_eq!(kinds, vec![LineKind::UnsatisfiedMechanism]);
    assert!(d
        .boundary_side(SideName::Bottom)
        .expects_name("Hydraulic Fluid"));
}

#[test]
fn test_every_kind_of_unmet_dependency_is_synthesized() {
    let d = diagram(
        "Plant is composed of Island\n\
         Island receives Unmade Input\n\
         Island produces Unwanted Output\n\
         Island respects Unwritten Rule\n\
         Island requires Unbuilt Tool\n",
        None,
    )
    .unwrap();
    let mut kinds: Vec<LineKind> = d.lines().iter().map(|l| l.kind()).collect();
    kinds.sort_by_key(|k| format!("{:?}", k));
    assert_eq!(
        kinds,
        vec![
            LineKind::UnsatisfiedGuidance,
            LineKind::UnsatisfiedInput,
            LineKind::UnsatisfiedMechanism,
            LineKind::UnsatisfiedOutput,
        ]
    );
    assert!(d.boundary_side(SideName::Left).expects_name("Unmade Input"));
    assert!(d
        .boundary_side(SideName::Right)
        .expects_name("Unwanted Output"));
    assert!(d.boundary_side(SideName::Top).expects_name("Unwritten Rule"));
    assert!(d
        .boundary_side(SideName::Bottom)
        .expects_name("Unbuilt Tool"));
}

#[test]
fn test_diagram_fits_its_own_bounds() {
    let d = built();
    assert!(d.width() > 0.0);
    assert!(d.height() > 0.0);
    for b in d.boxes() {
        assert!(b.x1() >= 0.0 && b.y1() >= 0.0);
        assert!(b.x2() <= d.width() && b.y2() <= d.height());
    }
    for idx in 0..d.lines().len() {
        let t = d.track(idx);
        for x in [t.x1, t.x2] {
            assert!(x >= 0.0 - 1e-9 && x <= d.width() + 1e-9);
        }
        for y in [t.y1, t.y2] {
            assert!(y >= 0.0 - 1e-9 && y <= d.height() + 1e-9);
        }
    }
}
