use crate::app::AzulApp;
use crate::editor::crop;
use crate::gesture::Mode;
use crate::overlay::Overlay;

/// Editor screen: the captured photo with the drawing surface layered on
/// top, editing controls on the left.
pub fn editor_panel(app: &mut AzulApp, ctx: &egui::Context) {
    let mut save_requested = false;
    let mut cancel_requested = false;
    let mut remember_adjustments = app.remember_adjustments();

    egui::SidePanel::left("editor_controls")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Editar");
            if let Some(editor) = app.editor_mut() {
                let mode = editor.mode();

                if ui
                    .selectable_label(mode == Mode::Cropping, "Recortar")
                    .clicked()
                {
                    editor.set_mode(if mode == Mode::Cropping {
                        Mode::Idle
                    } else {
                        Mode::Cropping
                    });
                }
                let can_commit = mode == Mode::Cropping && editor.crop_rect().is_some();
                if ui
                    .add_enabled(can_commit, egui::Button::new("Terminar recorte"))
                    .clicked()
                {
                    editor.commit_crop();
                }
                ui.separator();

                if ui
                    .selectable_label(mode == Mode::Outlining, "Marcar contorno")
                    .clicked()
                {
                    editor.set_mode(if mode == Mode::Outlining {
                        Mode::Idle
                    } else {
                        Mode::Outlining
                    });
                }
                ui.separator();

                ui.label("Contraste");
                ui.horizontal(|ui| {
                    if ui.button("−").clicked() {
                        editor.contrast_down();
                    }
                    if ui.button("+").clicked() {
                        editor.contrast_up();
                    }
                });
                ui.label("Brillo");
                ui.horizontal(|ui| {
                    if ui.button("−").clicked() {
                        editor.brightness_down();
                    }
                    if ui.button("+").clicked() {
                        editor.brightness_up();
                    }
                });
                ui.checkbox(&mut remember_adjustments, "Recordar ajustes");
                ui.separator();

                if ui.button("Restaurar").clicked() {
                    editor.restore();
                }
                if ui.button("Guardar").clicked() {
                    save_requested = true;
                }
                if ui.button("Cancelar").clicked() {
                    cancel_requested = true;
                }
            }
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(editor) = app.editor_mut() else {
            return;
        };
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let view = response.rect;
        editor.set_view(view);

        let texture = editor.texture(ui.ctx());
        let shown = crop::display_rect(view, editor.image_size());
        let painter = painter.with_clip_rect(view);
        painter.image(texture, shown, crate::panels::UV_FULL, egui::Color32::WHITE);

        if let Some(pos) = response.interact_pointer_pos() {
            if response.drag_started() {
                editor.begin_gesture(pos);
            } else if response.dragged() {
                editor.move_gesture(pos);
            }
        }
        if response.drag_stopped() && editor.gesture_active() {
            let pos = response
                .interact_pointer_pos()
                .unwrap_or_else(|| editor.last_gesture_point());
            editor.end_gesture(pos);
        }

        paint_overlay(&painter, editor.overlay());
    });

    app.set_remember_adjustments(remember_adjustments);
    if save_requested {
        app.request_save_confirmation();
    }
    if cancel_requested {
        app.return_to_capture();
    }
}

/// Draws the in-progress overlay above the photo: solid stroke segments
/// and the dashed derived rectangle.
fn paint_overlay(painter: &egui::Painter, overlay: &Overlay) {
    for segment in overlay.segments() {
        let stroke = egui::Stroke::new(
            segment.style.width,
            segment.style.color.gamma_multiply(segment.style.opacity),
        );
        painter.line_segment([segment.from, segment.to], stroke);
    }
    if let Some((rect, style)) = overlay.rect() {
        let stroke = egui::Stroke::new(style.width, style.color.gamma_multiply(style.opacity));
        let corners = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        for pair in corners.windows(2) {
            painter.extend(egui::Shape::dashed_line(pair, stroke, 10.0, 10.0));
        }
    }
}
