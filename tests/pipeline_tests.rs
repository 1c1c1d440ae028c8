//! End-to-end tests for the DSL -> layout -> SVG pipeline

use pretty_assertions::assert_eq;

use idef0::{diagram, render, render_with_config, LineKind, RenderConfig, RenderError, Stylesheet};

const BURGER_BAR: &str = "\
# a small burger operation
Ben's Burgers receives Hungry Customer
Ben's Burgers produces Satisfied Customer
Ben's Burgers respects Business Plan
Ben's Burgers requires Original Facility

Ben's Burgers is composed of Oversee Business Operations
Ben's Burgers is composed of Provide Supplies
Ben's Burgers is composed of Serve Customers

Oversee Business Operations respects Business Plan
Oversee Business Operations produces Manager Communications

Provide Supplies produces Ingredients
Provide Supplies respects Manager Communications

Serve Customers receives Hungry Customer
Serve Customers receives Ingredients
Serve Customers respects Manager Communications
Serve Customers produces Satisfied Customer
Serve Customers requires Original Facility
";

#[test]
fn test_renders_complete_document() {
    let svg = render(BURGER_BAR).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("<!DOCTYPE svg"));
    assert!(svg.contains("<svg"));
    assert!(svg.ends_with("</svg>\n"));
}

#[test]
fn test_one_rect_per_child_process() {
    let svg = render(BURGER_BAR).unwrap();
    assert_eq!(svg.matches("<rect").count(), 3);
    assert!(svg.contains("Oversee Business Operations"));
    assert!(svg.contains("Provide Supplies"));
    assert!(svg.contains("Serve Customers"));
}

#[test]
fn test_flows_render_with_arrowheads_and_labels() {
    let svg = render(BURGER_BAR).unwrap();
    assert!(svg.contains("<polygon"));
    assert!(svg.contains("Ingredients"));
    assert!(svg.contains("Hungry Customer"));
    // internal flows take filleted paths, external flows straight lines
    assert!(svg.contains("<path"));
    assert!(svg.contains("<line"));
}

#[test]
fn test_unsatisfied_flows_render_dashed() {
    let svg = render(
        "Shop is composed of Sell Things\n\
         Sell Things requires Cash Register\n",
    )
    .unwrap();
    assert!(svg.contains("stroke-dasharray"));
}

#[test]
fn test_satisfied_flows_are_not_dashed() {
    let svg = render(BURGER_BAR).unwrap();
    assert!(!svg.contains("stroke-dasharray"));
}

#[test]
fn test_stylesheet_changes_presentation() {
    let stylesheet = Stylesheet::from_str(
        r##"
        [font]
        family = "Futura"

        [line]
        stroke = "#336699"
        "##,
    )
    .unwrap();
    let config = RenderConfig::new().with_stylesheet(stylesheet);
    let svg = render_with_config(BURGER_BAR, config).unwrap();
    assert!(svg.contains("Futura"));
    assert!(svg.contains("#336699"));
    assert!(!svg.contains("stroke='black'"));
}

#[test]
fn test_process_argument_selects_decomposition() {
    let source = "Cafe is composed of Brew Coffee\n\
                  Brew Coffee is composed of Grind Beans\n\
                  Brew Coffee is composed of Press Water\n\
                  Grind Beans produces Grounds\n\
                  Press Water receives Grounds\n";
    let config = RenderConfig::new().with_process("Brew Coffee");
    let svg = render_with_config(source, config).unwrap();
    assert_eq!(svg.matches("<rect").count(), 2);
    assert!(svg.contains("Grind Beans"));
    assert!(svg.contains("Press Water"));
}

#[test]
fn test_unknown_process_fails() {
    let config = RenderConfig::new().with_process("Wash Dishes");
    let err = render_with_config(BURGER_BAR, config).unwrap_err();
    assert!(matches!(err, RenderError::ProcessNotFound(_)));
    assert!(err.to_string().contains("Wash Dishes"));
}

#[test]
fn test_malformed_statement_fails() {
    let err = render("Kitchen Meals").unwrap_err();
    assert!(matches!(err, RenderError::Parse(_)));
}

#[test]
fn test_unknown_verb_fails() {
    let err = render("Kitchen devours Meals").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("devours"));
}

#[test]
fn test_cyclic_composition_fails() {
    let err = render(
        "A is composed of B\n\
         B is composed of A\n",
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::Model(_)));
}

#[test]
fn test_identical_input_renders_identically() {
    assert_eq!(render(BURGER_BAR).unwrap(), render(BURGER_BAR).unwrap());
}

#[test]
fn test_leaf_process_renders_as_single_box() {
    let source = "Brew Coffee receives Beans\n\
                  Brew Coffee produces Coffee\n";
    let svg = render(source).unwrap();
    assert_eq!(svg.matches("<rect").count(), 1);
    // both dependencies show as external flows
    assert!(svg.contains("Beans"));
    assert!(svg.contains("Coffee"));
}

#[test]
fn test_diagram_api_exposes_line_kinds() {
    let d = diagram(BURGER_BAR, None).unwrap();
    let externals = d
        .lines()
        .iter()
        .filter(|l| l.kind() == LineKind::ExternalInput)
        .count();
    assert_eq!(externals, 1, "Hungry Customer feeds Serve Customers");
    assert!(d
        .lines()
        .iter()
        .any(|l| l.kind() == LineKind::ForwardInput && l.name() == "Ingredients"));
}

#[test]
fn test_names_are_xml_escaped() {
    let svg = render("Shop is composed of Buy & Sell").unwrap();
    assert!(svg.contains("Buy &amp; Sell"));
}
