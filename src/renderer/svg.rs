//! SVG generation from a laid-out diagram

use crate::layout::{Diagram, Label, LineKind, LineTrack, ProcessBox, FILLET_RADIUS};
use crate::stylesheet::Stylesheet;

/// Render a built diagram to an SVG document
pub fn render_svg(diagram: &Diagram, stylesheet: &Stylesheet) -> String {
    let mut builder = SvgBuilder::new(stylesheet);
    for process_box in diagram.ordered_boxes() {
        builder.add_box(process_box);
    }
    for idx in 0..diagram.lines().len() {
        builder.add_line(diagram, idx);
    }
    builder.finish(diagram)
}

/// Accumulates document fragments and writes the document once
struct SvgBuilder<'a> {
    stylesheet: &'a Stylesheet,
    boxes: Vec<String>,
    lines: Vec<String>,
}

impl<'a> SvgBuilder<'a> {
    fn new(stylesheet: &'a Stylesheet) -> Self {
        Self {
            stylesheet,
            boxes: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn add_box(&mut self, process_box: &ProcessBox) {
        let stroke = &self.stylesheet.stroke;
        self.boxes.push(format!(
            "<rect x='{}' y='{}' width='{}' height='{}' fill='none' stroke='{}' />",
            process_box.x1(),
            process_box.y1(),
            process_box.width(),
            process_box.height(),
            stroke,
        ));
        self.boxes.push(format!(
            "<text text-anchor='middle' x='{}' y='{}'>{}</text>",
            process_box.x1() + process_box.width() / 2.0,
            process_box.y1() + process_box.height() / 2.0,
            escape(process_box.name()),
        ));
    }

    fn add_line(&mut self, diagram: &Diagram, idx: usize) {
        let line = &diagram.lines()[idx];
        let track = diagram.track(idx);
        let kind = line.kind();
        let stroke = &self.stylesheet.stroke;
        let dash = if kind.is_unsatisfied() {
            format!(" stroke-dasharray='{}'", self.stylesheet.unsatisfied_dasharray)
        } else {
            String::new()
        };

        let body = match kind {
            LineKind::ForwardInput => {
                format!(
                    "<path stroke='{}' fill='none'{} d='{}' />",
                    stroke,
                    dash,
                    forward_input_path(&track)
                )
            }
            LineKind::ForwardGuidance => {
                format!(
                    "<path stroke='{}' fill='none'{} d='{}' />",
                    stroke,
                    dash,
                    forward_guidance_path(&track)
                )
            }
            LineKind::ForwardMechanism => {
                format!(
                    "<path stroke='{}' fill='none'{} d='{}' />",
                    stroke,
                    dash,
                    forward_mechanism_path(&track)
                )
            }
            LineKind::BackwardInput | LineKind::BackwardMechanism => {
                format!(
                    "<path stroke='{}' fill='none'{} d='{}' />",
                    stroke,
                    dash,
                    backward_low_road_path(&track)
                )
            }
            LineKind::BackwardGuidance => {
                format!(
                    "<path stroke='{}' fill='none'{} d='{}' />",
                    stroke,
                    dash,
                    backward_guidance_path(&track)
                )
            }
            LineKind::ExternalInput
            | LineKind::UnsatisfiedInput
            | LineKind::ExternalOutput
            | LineKind::UnsatisfiedOutput => {
                format!(
                    "<line x1='{}' y1='{}' x2='{}' y2='{}' stroke='{}'{} />",
                    track.x1, track.y1, track.x2, track.y2, stroke, dash
                )
            }
            LineKind::ExternalGuidance | LineKind::UnsatisfiedGuidance => {
                // the top 20 units of the stem are label room
                format!(
                    "<line x1='{}' y1='{}' x2='{}' y2='{}' stroke='{}'{} />",
                    track.x1,
                    track.y1 + 20.0,
                    track.x2,
                    track.y2,
                    stroke,
                    dash
                )
            }
            LineKind::ExternalMechanism | LineKind::UnsatisfiedMechanism => {
                format!(
                    "<line x1='{}' y1='{}' x2='{}' y2='{}' stroke='{}'{} />",
                    track.x1,
                    track.y1 - 20.0,
                    track.x2,
                    track.y2,
                    stroke,
                    dash
                )
            }
        };
        self.lines.push(body);

        self.lines.push(self.arrowhead(kind, &track));
        self.lines.push(self.label_text(&diagram.line_label(idx)));
    }

    fn arrowhead(&self, kind: LineKind, track: &LineTrack) -> String {
        let (x, y) = (track.x2, track.y2);
        let stroke = &self.stylesheet.stroke;
        let points = match kind {
            LineKind::ForwardInput
            | LineKind::ExternalInput
            | LineKind::UnsatisfiedInput
            | LineKind::ExternalOutput
            | LineKind::UnsatisfiedOutput => format!(
                "{},{} {},{} {},{} {},{}",
                x,
                y,
                x - 6.0,
                y + 3.0,
                x - 6.0,
                y - 3.0,
                x,
                y
            ),
            LineKind::ForwardGuidance
            | LineKind::BackwardGuidance
            | LineKind::ExternalGuidance
            | LineKind::UnsatisfiedGuidance => format!(
                "{},{} {},{} {},{} {},{}",
                x,
                y,
                x - 3.0,
                y - 6.0,
                x + 3.0,
                y - 6.0,
                x,
                y
            ),
            LineKind::ForwardMechanism
            | LineKind::BackwardInput
            | LineKind::BackwardMechanism
            | LineKind::ExternalMechanism
            | LineKind::UnsatisfiedMechanism => format!(
                "{},{} {},{} {},{} {},{}",
                x,
                y,
                x - 3.0,
                y + 6.0,
                x + 3.0,
                y + 6.0,
                x,
                y
            ),
        };
        format!(
            "<polygon fill='{}' stroke='{}' points='{}' />",
            stroke, stroke, points
        )
    }

    fn label_text(&self, label: &Label) -> String {
        let anchor = label.alignment().text_anchor();
        format!(
            "<text text-anchor='{}' x='{}' y='{}'>{}</text>",
            anchor,
            label.position().x,
            label.position().y,
            escape(label.text()),
        )
    }

    fn finish(self, diagram: &Diagram) -> String {
        let mut content = String::new();
        for fragment in self.boxes.iter().chain(self.lines.iter()) {
            content.push_str("  ");
            content.push_str(fragment);
            content.push('\n');
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
             <!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.0//EN\"\n\
             \"http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd\" [\n\
             <!ATTLIST svg xmlns:xlink CDATA #FIXED \"http://www.w3.org/1999/xlink\">\n\
             ]>\n\
             <svg xmlns='http://www.w3.org/2000/svg'\n\
             xmlns:xlink='http://www.w3.org/1999/xlink'\n\
             width='{}pt' height='{}pt'\n\
             viewBox='{} {} {} {}'\n\
             >\n\
             <style type='text/css'>\n\
             text {{\n\
             font-family: {};\n\
             font-size: {}px;\n\
             }}\n\
             </style>\n\
             <g>\n\
             {}</g>\n\
             </svg>\n",
            diagram.width(),
            diagram.height(),
            diagram.x1(),
            diagram.y1(),
            diagram.x2(),
            diagram.y2(),
            self.stylesheet.font_family,
            self.stylesheet.font_size,
            content,
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Out of the source's right side, one vertical jog, into the target's
/// left side
fn forward_input_path(t: &LineTrack) -> String {
    let r = FILLET_RADIUS;
    let h = r / 2.0;
    let xv = t.x_vertical.unwrap_or(t.x1);
    format!(
        "M {} {} L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} L {} {}",
        t.x1,
        t.y1,
        xv - r,
        t.y1,
        xv - h,
        t.y1,
        xv,
        t.y1 + h,
        xv,
        t.y1 + r,
        xv,
        t.y2 - r,
        xv,
        t.y2 - h,
        xv + h,
        t.y2,
        xv + r,
        t.y2,
        t.x2,
        t.y2,
    )
}

/// Straight run, then one drop onto the target's top side
fn forward_guidance_path(t: &LineTrack) -> String {
    let r = FILLET_RADIUS;
    let h = r / 2.0;
    format!(
        "M {} {} L {} {} C {} {} {} {} {} {} L {} {}",
        t.x1,
        t.y1,
        t.x2 - r,
        t.y1,
        t.x2 - h,
        t.y1,
        t.x2,
        t.y1 + h,
        t.x2,
        t.y1 + r,
        t.x2,
        t.y2,
    )
}

/// Down, across under the gap, and up into the target's bottom side
fn forward_mechanism_path(t: &LineTrack) -> String {
    let r = FILLET_RADIUS;
    let h = r / 2.0;
    let xv = t.x_vertical.unwrap_or(t.x1);
    let yh = t.y_horizontal.unwrap_or(t.y1);
    format!(
        "M {} {} L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} L {} {}",
        t.x1,
        t.y1,
        xv - r,
        t.y1,
        xv - h,
        t.y1,
        xv,
        t.y1 + h,
        xv,
        t.y1 + r,
        xv,
        yh - r,
        xv,
        yh - h,
        xv + h,
        yh,
        xv + r,
        yh,
        t.x2 - r,
        yh,
        t.x2 - h,
        yh,
        t.x2,
        yh - h,
        t.x2,
        yh - r,
        t.x2,
        t.y2,
    )
}

/// Feedback around the source's bottom-right corner, rising into the
/// target from below
fn backward_low_road_path(t: &LineTrack) -> String {
    let r = FILLET_RADIUS;
    let h = r / 2.0;
    let xv = t.x_vertical.unwrap_or(t.x1);
    let yh = t.y_horizontal.unwrap_or(t.y1);
    format!(
        "M {} {} L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} L {} {}",
        t.x1,
        t.y1,
        xv - r,
        t.y1,
        xv - h,
        t.y1,
        xv,
        t.y1 + h,
        xv,
        t.y1 + r,
        xv,
        yh - r,
        xv,
        yh - h,
        xv - h,
        yh,
        xv - r,
        yh,
        t.x2 + r,
        yh,
        t.x2 + h,
        yh,
        t.x2,
        yh - h,
        t.x2,
        yh - r,
        t.x2,
        t.y2,
    )
}

/// Feedback over the target's top edge, dropping in from above
fn backward_guidance_path(t: &LineTrack) -> String {
    let r = FILLET_RADIUS;
    let h = r / 2.0;
    let xv = t.x_vertical.unwrap_or(t.x1);
    let yh = t.y_horizontal.unwrap_or(t.y1);
    format!(
        "M {} {} L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} L {} {}",
        t.x1,
        t.y1,
        xv - r,
        t.y1,
        xv - h,
        t.y1,
        xv,
        t.y1 - h,
        xv,
        t.y1 - r,
        xv,
        yh + r,
        xv,
        yh + h,
        xv - h,
        yh,
        xv - r,
        yh,
        t.x2 + r,
        yh,
        t.x2 + h,
        yh,
        t.x2,
        yh + h,
        t.x2,
        yh + r,
        t.x2,
        t.y2,
    )
}
