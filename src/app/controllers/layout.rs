//! Side-by-side versus overlay presentation.
//!
//! Wide windows show the editor and the docked preview next to each other,
//! separated by a draggable divider. Narrow windows show only the editor; the
//! preview opens on demand in an overlay.

/// Smallest window width that still gets the side-by-side layout.
pub const WIDE_THRESHOLD: i32 = 1024;

/// Each panel keeps at least this share of the body width.
pub const MIN_PANEL_FRACTION: f64 = 0.3;

pub const DEFAULT_SPLIT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportClass {
    Wide,
    Narrow,
}

impl ViewportClass {
    pub fn classify(width: i32) -> Self {
        if width >= WIDE_THRESHOLD {
            ViewportClass::Wide
        } else {
            ViewportClass::Narrow
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSelector {
    class: ViewportClass,
    width: i32,
    /// Share of the body width given to the editor in wide mode.
    split: f64,
    overlay_open: bool,
}

impl LayoutSelector {
    pub fn new(width: i32) -> Self {
        Self {
            class: ViewportClass::classify(width),
            width,
            split: DEFAULT_SPLIT,
            overlay_open: false,
        }
    }

    pub fn class(&self) -> ViewportClass {
        self.class
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn split(&self) -> f64 {
        self.split
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    /// Record a new window width. Returns the new class when the width
    /// crossed the threshold. Entering wide mode closes the overlay.
    pub fn resize(&mut self, width: i32) -> Option<ViewportClass> {
        self.width = width;
        let class = ViewportClass::classify(width);
        if class == self.class {
            return None;
        }
        self.class = class;
        if class == ViewportClass::Wide {
            self.overlay_open = false;
        }
        log::debug!("layout now {:?} at width {}", class, width);
        Some(class)
    }

    pub fn set_split(&mut self, split: f64) {
        self.split = clamp_split(split);
    }

    /// Move the divider to window x-coordinate `x` inside a body spanning
    /// `body_x..body_x + body_w`.
    pub fn drag_divider(&mut self, x: i32, body_x: i32, body_w: i32) {
        if body_w <= 0 {
            return;
        }
        self.set_split(f64::from(x - body_x) / f64::from(body_w));
    }

    /// Editor width in pixels for a body `body_w` wide.
    pub fn editor_width(&self, body_w: i32) -> i32 {
        (f64::from(body_w) * self.split).round() as i32
    }

    /// Only meaningful in narrow mode. Returns whether the overlay opened.
    pub fn open_overlay(&mut self) -> bool {
        if self.class == ViewportClass::Wide || self.overlay_open {
            return false;
        }
        self.overlay_open = true;
        true
    }

    /// Returns whether the overlay was open.
    pub fn close_overlay(&mut self) -> bool {
        std::mem::take(&mut self.overlay_open)
    }

    /// Whether the docked preview panel is on screen.
    pub fn docked_visible(&self) -> bool {
        self.class == ViewportClass::Wide
    }
}

pub fn clamp_split(split: f64) -> f64 {
    if split.is_nan() {
        return DEFAULT_SPLIT;
    }
    split.clamp(MIN_PANEL_FRACTION, 1.0 - MIN_PANEL_FRACTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_threshold() {
        assert_eq!(ViewportClass::classify(1024), ViewportClass::Wide);
        assert_eq!(ViewportClass::classify(1023), ViewportClass::Narrow);
        assert_eq!(ViewportClass::classify(4000), ViewportClass::Wide);
        assert_eq!(ViewportClass::classify(0), ViewportClass::Narrow);
        assert_eq!(ViewportClass::classify(-5), ViewportClass::Narrow);
    }

    #[test]
    fn test_resize_reports_only_crossings() {
        let mut layout = LayoutSelector::new(1200);
        assert_eq!(layout.resize(1100), None);
        assert_eq!(layout.resize(800), Some(ViewportClass::Narrow));
        assert_eq!(layout.resize(700), None);
        assert_eq!(layout.resize(1024), Some(ViewportClass::Wide));
        assert_eq!(layout.width(), 1024);
    }

    #[test]
    fn test_overlay_only_in_narrow_and_closed_by_widening() {
        let mut layout = LayoutSelector::new(1200);
        assert!(!layout.open_overlay());

        layout.resize(800);
        assert!(layout.open_overlay());
        assert!(!layout.open_overlay());
        assert!(layout.overlay_open());

        layout.resize(1300);
        assert!(!layout.overlay_open());
    }

    #[test]
    fn test_close_overlay() {
        let mut layout = LayoutSelector::new(600);
        layout.open_overlay();
        assert!(layout.close_overlay());
        assert!(!layout.close_overlay());
    }

    #[test]
    fn test_split_is_clamped() {
        let mut layout = LayoutSelector::new(1200);
        layout.set_split(0.1);
        assert_eq!(layout.split(), MIN_PANEL_FRACTION);
        layout.set_split(0.95);
        assert_eq!(layout.split(), 1.0 - MIN_PANEL_FRACTION);
        layout.set_split(f64::NAN);
        assert_eq!(layout.split(), DEFAULT_SPLIT);
    }

    #[test]
    fn test_drag_divider_keeps_both_panels_above_floor() {
        let mut layout = LayoutSelector::new(1200);
        for x in [-100, 0, 150, 600, 1000, 1200, 5000] {
            layout.drag_divider(x, 0, 1200);
            let editor = layout.editor_width(1200);
            let preview = 1200 - editor;
            assert!(editor >= 360, "editor {editor} at x={x}");
            assert!(preview >= 360, "preview {preview} at x={x}");
        }
        layout.drag_divider(700, 100, 1000);
        assert_eq!(layout.editor_width(1000), 600);
    }

    #[test]
    fn test_zero_width_body_is_ignored() {
        let mut layout = LayoutSelector::new(1200);
        layout.drag_divider(10, 0, 0);
        assert_eq!(layout.split(), DEFAULT_SPLIT);
    }
}
