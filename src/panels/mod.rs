mod capture_panel;
mod editor_panel;

pub use capture_panel::capture_panel;
pub use editor_panel::editor_panel;

/// Full-texture UV rectangle.
pub(crate) const UV_FULL: egui::Rect = egui::Rect {
    min: egui::Pos2 { x: 0.0, y: 0.0 },
    max: egui::Pos2 { x: 1.0, y: 1.0 },
};
