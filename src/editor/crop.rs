//! Mapping between on-screen view coordinates and native image pixels.
//!
//! The photo is displayed aspect-fill: uniformly scaled until it covers the
//! view, centered, with the overflow clipped. The crop therefore maps a view
//! rectangle into image space with whichever axis is more zoomed.

use egui::{Pos2, Rect, Vec2};

/// Uniform aspect-fill scale from view points to image pixels, i.e.
/// `max(imageW/viewW, imageH/viewH)`.
pub fn aspect_fill_scale(view: Vec2, image: Vec2) -> f32 {
    let view_aspect = view.x / view.y;
    let image_aspect = image.x / image.y;
    if view_aspect > image_aspect {
        image.y / view.y
    } else {
        image.x / view.x
    }
}

/// Maps a point in view coordinates to image pixel coordinates through the
/// view center offset.
pub fn map_view_point_to_image(p: Pos2, view: Rect, image: Vec2) -> Pos2 {
    let scale = aspect_fill_scale(view.size(), image);
    Pos2::new(
        image.x / 2.0 - (view.center().x - p.x) * scale,
        image.y / 2.0 - (view.center().y - p.y) * scale,
    )
}

/// Maps a view-space rectangle into image space: origin through the center
/// offset, size through the uniform scale.
pub fn map_view_rect_to_image(rect: Rect, view: Rect, image: Vec2) -> Rect {
    let scale = aspect_fill_scale(view.size(), image);
    let origin = map_view_point_to_image(rect.min, view, image);
    Rect::from_min_size(origin, rect.size() * scale)
}

/// The on-screen rectangle the image occupies when drawn aspect-fill into
/// `view` (extends past the view; the painter clips it).
pub fn display_rect(view: Rect, image: Vec2) -> Rect {
    let scale = aspect_fill_scale(view.size(), image);
    Rect::from_center_size(view.center(), image / scale)
}

/// Clamps an image-space rectangle to the image bounds and rounds it to a
/// whole-pixel crop region. `None` when nothing of it lies inside the image.
pub fn pixel_region(rect: Rect, image: Vec2) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.min.x.max(0.0).floor();
    let y0 = rect.min.y.max(0.0).floor();
    let x1 = rect.max.x.min(image.x).ceil();
    let y1 = rect.max.y.min(image.y).ceil();
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h))
    }

    #[test]
    fn identity_when_view_matches_image() {
        let view = rect(0.0, 0.0, 100.0, 80.0);
        let image = egui::vec2(100.0, 80.0);
        assert_eq!(aspect_fill_scale(view.size(), image), 1.0);
        let r = map_view_rect_to_image(rect(10.0, 20.0, 30.0, 40.0), view, image);
        assert_eq!(r, rect(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn scale_picks_the_more_zoomed_axis() {
        // Wide view, tall image: the vertical axis decides.
        let view = egui::vec2(200.0, 100.0);
        let image = egui::vec2(100.0, 400.0);
        assert_eq!(aspect_fill_scale(view, image), 4.0);
        // Tall view, wide image: the horizontal axis decides.
        let view = egui::vec2(100.0, 200.0);
        let image = egui::vec2(400.0, 100.0);
        assert_eq!(aspect_fill_scale(view, image), 4.0);
    }

    #[test]
    fn uniform_upscale_maps_through_the_center() {
        // View 100x100 showing a 200x200 image: scale 2, centers aligned.
        let view = rect(0.0, 0.0, 100.0, 100.0);
        let image = egui::vec2(200.0, 200.0);
        let center = map_view_point_to_image(Pos2::new(50.0, 50.0), view, image);
        assert_eq!(center, Pos2::new(100.0, 100.0));
        let r = map_view_rect_to_image(rect(25.0, 25.0, 50.0, 50.0), view, image);
        assert_eq!(r, rect(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn view_offset_does_not_change_the_mapping() {
        let image = egui::vec2(100.0, 100.0);
        let at_origin = map_view_rect_to_image(
            rect(10.0, 10.0, 20.0, 20.0),
            rect(0.0, 0.0, 100.0, 100.0),
            image,
        );
        let offset = map_view_rect_to_image(
            rect(310.0, 210.0, 20.0, 20.0),
            rect(300.0, 200.0, 100.0, 100.0),
            image,
        );
        assert_eq!(at_origin, offset);
    }

    #[test]
    fn pixel_region_clamps_to_bounds() {
        let image = egui::vec2(100.0, 100.0);
        let r = pixel_region(rect(-10.0, -10.0, 50.0, 50.0), image).unwrap();
        assert_eq!(r, (0, 0, 40, 40));
        assert!(pixel_region(rect(200.0, 200.0, 10.0, 10.0), image).is_none());
    }

    #[test]
    fn display_rect_round_trips_with_point_mapping() {
        let view = rect(50.0, 50.0, 100.0, 100.0);
        let image = egui::vec2(200.0, 400.0);
        let shown = display_rect(view, image);
        let top_left = map_view_point_to_image(shown.min, view, image);
        assert!(top_left.x.abs() < 1e-3);
        assert!(top_left.y.abs() < 1e-3);
        let bottom_right = map_view_point_to_image(shown.max, view, image);
        assert!((bottom_right.x - image.x).abs() < 1e-3);
        assert!((bottom_right.y - image.y).abs() < 1e-3);
    }
}
