use egui::{Pos2, Rect};
use image::RgbaImage;

use crate::editor::crop::map_view_point_to_image;
use crate::gesture::{Segment, StrokeStyle};

/// Transient drawing surface layered over the base photo. Holds only the
/// current gesture's stroke segments and the rectangle derived from them;
/// cleared at the start of every new gesture.
#[derive(Debug, Default)]
pub struct Overlay {
    segments: Vec<Segment>,
    rect: Option<(Rect, StrokeStyle)>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.rect = None;
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.rect.is_none()
    }

    pub fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn set_rect(&mut self, rect: Rect, style: StrokeStyle) {
        self.rect = Some((rect, style));
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn rect(&self) -> Option<(Rect, StrokeStyle)> {
        self.rect
    }

    /// Bakes the overlay into `img`. Points are recorded in view
    /// coordinates; `view` is the on-screen rectangle the photo was
    /// displayed in, so every point is mapped through the same aspect-fill
    /// transform the crop uses.
    pub fn composite_onto(&self, img: &mut RgbaImage, view: Rect) {
        let image_size = egui::vec2(img.width() as f32, img.height() as f32);
        let scale = crate::editor::crop::aspect_fill_scale(view.size(), image_size);
        for segment in &self.segments {
            let from = map_view_point_to_image(segment.from, view, image_size);
            let to = map_view_point_to_image(segment.to, view, image_size);
            draw_segment(img, from, to, segment.style, scale);
        }
        if let Some((rect, style)) = self.rect {
            let corners = [
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                rect.left_bottom(),
            ];
            for i in 0..4 {
                let from = map_view_point_to_image(corners[i], view, image_size);
                let to = map_view_point_to_image(corners[(i + 1) % 4], view, image_size);
                draw_segment(img, from, to, style, scale);
            }
        }
    }
}

/// Stamps a stroke segment into the pixel buffer: Bresenham along the
/// segment, a filled disc of the stroke radius at every step, blended at
/// the stroke opacity.
fn draw_segment(img: &mut RgbaImage, from: Pos2, to: Pos2, style: StrokeStyle, scale: f32) {
    let radius = ((style.width * scale) / 2.0).max(0.5);
    let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
    let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        stamp_disc(img, x0, y0, radius, style);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn stamp_disc(img: &mut RgbaImage, cx: i64, cy: i64, radius: f32, style: StrokeStyle) {
    let r = radius.ceil() as i64;
    let r2 = radius * radius;
    for oy in -r..=r {
        for ox in -r..=r {
            if (ox * ox + oy * oy) as f32 > r2 {
                continue;
            }
            blend_pixel(img, cx + ox, cy + oy, style);
        }
    }
}

/// Source-over blend of the stroke color at the stroke opacity.
fn blend_pixel(img: &mut RgbaImage, x: i64, y: i64, style: StrokeStyle) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let px = img.get_pixel_mut(x as u32, y as u32);
    let a = style.opacity.clamp(0.0, 1.0);
    let src = [
        style.color.r() as f32,
        style.color.g() as f32,
        style.color.b() as f32,
    ];
    for i in 0..3 {
        px.0[i] = (src[i] * a + px.0[i] as f32 * (1.0 - a)).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn style() -> StrokeStyle {
        StrokeStyle {
            color: Color32::RED,
            width: 4.0,
            opacity: 1.0,
        }
    }

    #[test]
    fn clear_empties_everything() {
        let mut overlay = Overlay::new();
        overlay.push_segment(Segment {
            from: Pos2::new(0.0, 0.0),
            to: Pos2::new(5.0, 5.0),
            style: style(),
        });
        overlay.set_rect(Rect::from_min_size(Pos2::ZERO, egui::vec2(10.0, 10.0)), style());
        assert!(!overlay.is_empty());
        overlay.clear();
        assert!(overlay.is_empty());
    }

    #[test]
    fn composite_touches_pixels_at_full_opacity() {
        let mut overlay = Overlay::new();
        overlay.push_segment(Segment {
            from: Pos2::new(10.0, 10.0),
            to: Pos2::new(30.0, 10.0),
            style: style(),
        });
        // View and image are the same 64x64 square, so the mapping is identity.
        let view = Rect::from_min_size(Pos2::ZERO, egui::vec2(64.0, 64.0));
        let mut img = RgbaImage::from_pixel(64, 64, image::Rgba([0, 0, 0, 255]));
        overlay.composite_onto(&mut img, view);
        assert_eq!(img.get_pixel(20, 10).0, [255, 0, 0, 255]);
        // Far away from the stroke nothing changes.
        assert_eq!(img.get_pixel(60, 60).0, [0, 0, 0, 255]);
    }
}
