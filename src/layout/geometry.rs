//! Geometry primitives for the layout engine

/// A 2D point in drawing coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `(dx, dy)`
    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Horizontal alignment of a label relative to its position point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Centred,
}

impl Alignment {
    /// The SVG `text-anchor` value for this alignment
    pub fn text_anchor(&self) -> &'static str {
        match self {
            Alignment::Left => "start",
            Alignment::Right => "end",
            Alignment::Centred => "middle",
        }
    }
}

/// A positioned text span with an overlap predicate against other labels
///
/// Width is estimated at 7 drawing units per character; the label's
/// rectangle spans one unit above the baseline point.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    position: Point,
    alignment: Alignment,
}

impl Label {
    pub fn left_aligned(text: impl Into<String>, position: Point) -> Self {
        Self {
            text: text.into(),
            position,
            alignment: Alignment::Left,
        }
    }

    pub fn right_aligned(text: impl Into<String>, position: Point) -> Self {
        Self {
            text: text.into(),
            position,
            alignment: Alignment::Right,
        }
    }

    pub fn centred(text: impl Into<String>, position: Point) -> Self {
        Self {
            text: text.into(),
            position,
            alignment: Alignment::Centred,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Estimated rendered width
    pub fn length(&self) -> f64 {
        self.text.chars().count() as f64 * 7.0
    }

    pub fn left_edge(&self) -> f64 {
        match self.alignment {
            Alignment::Left => self.position.x,
            Alignment::Right => self.position.x - self.length(),
            Alignment::Centred => self.position.x - self.length() / 2.0,
        }
    }

    pub fn right_edge(&self) -> f64 {
        self.left_edge() + self.length()
    }

    pub fn top_edge(&self) -> f64 {
        self.position.y - 20.0
    }

    pub fn bottom_edge(&self) -> f64 {
        self.position.y
    }

    /// Open-interval rectangle intersection with another label
    pub fn overlaps(&self, other: &Label) -> bool {
        self.left_edge() < other.right_edge()
            && self.right_edge() > other.left_edge()
            && self.top_edge() < other.bottom_edge()
            && self.bottom_edge() > other.top_edge()
    }
}

/// The drawing's extremal rectangle, computed once per layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bounds {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// A degenerate rectangle at a single point, the identity for `merge`
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// The smallest rectangle containing both
    pub fn merge(&self, other: &Bounds) -> Bounds {
        Bounds::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Grow to include a point
    pub fn include(&self, point: Point) -> Bounds {
        self.merge(&Bounds::at(point))
    }
}

/// Extra margin demanded beyond the current bounds, per compass direction
///
/// Each field only ever grows; lines report their demands independently
/// and the accumulator keeps the maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundsExtension {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundsExtension {
    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn extend_north(&mut self, value: f64) {
        if value > self.north {
            self.north = value;
        }
    }

    pub fn extend_south(&mut self, value: f64) {
        if value > self.south {
            self.south = value;
        }
    }

    pub fn extend_east(&mut self, value: f64) {
        if value > self.east {
            self.east = value;
        }
    }

    pub fn extend_west(&mut self, value: f64) {
        if value > self.west {
            self.west = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_translate() {
        let p = Point::new(10.0, 20.0).translate(5.0, -5.0);
        assert_eq!(p, Point::new(15.0, 15.0));
    }

    #[test]
    fn test_label_width_estimate() {
        let label = Label::left_aligned("Hungry Customer", Point::ORIGIN);
        assert_eq!(label.length(), 15.0 * 7.0);
    }

    #[test]
    fn test_label_edges_by_alignment() {
        let at = Point::new(100.0, 50.0);
        let left = Label::left_aligned("abcd", at);
        let right = Label::right_aligned("abcd", at);
        let centred = Label::centred("abcd", at);

        assert_eq!(left.left_edge(), 100.0);
        assert_eq!(left.right_edge(), 128.0);
        assert_eq!(right.left_edge(), 72.0);
        assert_eq!(right.right_edge(), 100.0);
        assert_eq!(centred.left_edge(), 86.0);
        assert_eq!(centred.right_edge(), 114.0);
        assert_eq!(left.top_edge(), 30.0);
        assert_eq!(left.bottom_edge(), 50.0);
    }

    #[test]
    fn test_label_overlap() {
        let a = Label::left_aligned("aaaa", Point::new(0.0, 20.0));
        let b = Label::left_aligned("bbbb", Point::new(10.0, 20.0));
        let c = Label::left_aligned("cccc", Point::new(100.0, 20.0));
        let d = Label::left_aligned("dddd", Point::new(10.0, 60.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_touching_labels_do_not_overlap() {
        let a = Label::left_aligned("aaaa", Point::new(0.0, 20.0));
        let b = Label::left_aligned("bbbb", Point::new(28.0, 20.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_bounds_merge() {
        let a = Bounds::new(0.0, 0.0, 50.0, 50.0);
        let b = Bounds::new(-10.0, 20.0, 40.0, 90.0);
        assert_eq!(a.merge(&b), Bounds::new(-10.0, 0.0, 50.0, 90.0));
    }

    #[test]
    fn test_bounds_extension_is_monotone() {
        let mut ext = BoundsExtension::default();
        ext.extend_north(30.0);
        ext.extend_north(10.0);
        assert_eq!(ext.north(), 30.0);
        ext.extend_north(45.0);
        assert_eq!(ext.north(), 45.0);
        assert_eq!(ext.south(), 0.0);
    }
}
