use egui::{Color32, Pos2, Rect};

use crate::overlay::Overlay;

/// Padding applied on the min side of the derived rectangle, in points.
pub const RECT_PADDING_MIN: f32 = 10.0;
/// Total padding added to the extrema span for the rectangle size, in points.
pub const RECT_PADDING_SIZE: f32 = 25.0;

/// Which editing gesture is currently armed. Cropping and outlining are
/// mutually exclusive; `Idle` ignores all touch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Cropping,
    Outlining,
}

/// Stroke styling for one editing mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
    pub opacity: f32,
}

impl StrokeStyle {
    /// Crop strokes: translucent yellow.
    pub const CROP: Self = Self {
        color: Color32::YELLOW,
        width: 5.0,
        opacity: 0.5,
    };

    /// Outline strokes: near-opaque red.
    pub const OUTLINE: Self = Self {
        color: Color32::RED,
        width: 5.0,
        opacity: 0.9,
    };
}

impl Mode {
    pub fn stroke_style(self) -> Option<StrokeStyle> {
        match self {
            Mode::Idle => None,
            Mode::Cropping => Some(StrokeStyle::CROP),
            Mode::Outlining => Some(StrokeStyle::OUTLINE),
        }
    }
}

/// One line segment appended to the overlay by a gesture move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Pos2,
    pub to: Pos2,
    pub style: StrokeStyle,
}

/// Running min/max over the points of the active gesture. Updated
/// monotonically; never shrinks within one gesture.
#[derive(Debug, Clone, Copy)]
struct Extrema {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl Extrema {
    fn empty() -> Self {
        Self {
            min_x: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            min_y: f32::INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    fn include(&mut self, p: Pos2) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    /// Derived rectangle: fixed 10pt padding on the min side and 25pt
    /// added to the span. Must stay exactly this formula.
    fn padded_rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.min_x - RECT_PADDING_MIN, self.min_y - RECT_PADDING_MIN),
            egui::vec2(
                (self.max_x - self.min_x) + RECT_PADDING_SIZE,
                (self.max_y - self.min_y) + RECT_PADDING_SIZE,
            ),
        )
    }
}

/// Result of a completed gesture: the rectangle derived from the bounding
/// extrema, and whether the overlay should be baked into the base image
/// (outline mode only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureOutcome {
    pub rect: Rect,
    pub merge: bool,
}

/// Converts a begin/move/end touch gesture into overlay content and a
/// derived rectangle, depending on the active mode. Owns the transient
/// overlay; holds no reference to any UI surface.
#[derive(Debug)]
pub struct GestureRecorder {
    mode: Mode,
    overlay: Overlay,
    extrema: Extrema,
    start: Pos2,
    last: Pos2,
    active: bool,
}

impl Default for GestureRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecorder {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            overlay: Overlay::new(),
            extrema: Extrema::empty(),
            start: Pos2::ZERO,
            last: Pos2::ZERO,
            active: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches the active mode. Entering either editing mode leaves the
    /// other one off; an in-progress gesture is abandoned.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.active = false;
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
    }

    /// Starts a gesture: the overlay and the extrema from any previous
    /// gesture are discarded. Returns false (and does nothing) in `Idle`.
    pub fn begin(&mut self, p: Pos2) -> bool {
        if self.mode == Mode::Idle {
            return false;
        }
        self.overlay.clear();
        self.extrema = Extrema::empty();
        self.extrema.include(p);
        self.start = p;
        self.last = p;
        self.active = true;
        true
    }

    /// Records a gesture move: appends a segment from the last point to
    /// `p` and widens the extrema. Returns the appended segment so the
    /// caller can repaint incrementally.
    pub fn motion(&mut self, p: Pos2) -> Option<Segment> {
        if !self.active {
            return None;
        }
        let style = self.mode.stroke_style()?;
        let segment = Segment {
            from: self.last,
            to: p,
            style,
        };
        self.overlay.push_segment(segment);
        self.extrema.include(p);
        self.last = p;
        Some(segment)
    }

    /// Ends the gesture. A closing segment back to the start point is
    /// always drawn, so a tap with no movement still yields a non-empty
    /// rectangle. The derived rectangle replaces any previous one.
    pub fn end(&mut self, p: Pos2) -> Option<GestureOutcome> {
        if !self.active {
            return None;
        }
        let style = self.mode.stroke_style()?;
        self.overlay.push_segment(Segment {
            from: p,
            to: self.start,
            style,
        });
        self.extrema.include(p);
        let rect = self.extrema.padded_rect();
        self.overlay.set_rect(rect, style);
        self.active = false;
        Some(GestureOutcome {
            rect,
            merge: self.mode == Mode::Outlining,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last recorded point of the active gesture.
    pub fn last_point(&self) -> Pos2 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_mode_ignores_gestures() {
        let mut rec = GestureRecorder::new();
        assert!(!rec.begin(Pos2::new(5.0, 5.0)));
        assert!(rec.motion(Pos2::new(6.0, 6.0)).is_none());
        assert!(rec.end(Pos2::new(7.0, 7.0)).is_none());
    }

    #[test]
    fn motion_without_begin_is_ignored() {
        let mut rec = GestureRecorder::new();
        rec.set_mode(Mode::Cropping);
        assert!(rec.motion(Pos2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn mode_styles_differ() {
        assert_ne!(StrokeStyle::CROP, StrokeStyle::OUTLINE);
        assert!(Mode::Idle.stroke_style().is_none());
    }
}
