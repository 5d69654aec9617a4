use crate::app::AzulApp;
use crate::camera::SessionState;

/// Capture screen: live preview in the central panel, session controls on
/// the left.
pub fn capture_panel(app: &mut AzulApp, ctx: &egui::Context) {
    let state = app.camera_state();
    let running = matches!(state, SessionState::Running { .. });
    let pending = app.capture_pending();

    egui::SidePanel::left("capture_controls")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Azul");
            ui.label(match &state {
                SessionState::Unconfigured => "Configurando cámara…".to_owned(),
                SessionState::Running { width, height } => format!("Cámara {width}x{height}"),
                SessionState::Stopped => "Cámara detenida".to_owned(),
                SessionState::NotAuthorized => "Sin permiso de cámara".to_owned(),
                SessionState::ConfigurationFailed(_) => "Error de configuración".to_owned(),
            });
            ui.separator();

            ui.label("Ángulo");
            ui.horizontal(|ui| {
                if ui.button("<").clicked() {
                    app.cycle_angle(-1);
                }
                ui.label(app.angle_label());
                if ui.button(">").clicked() {
                    app.cycle_angle(1);
                }
            });
            ui.separator();

            if ui
                .add_enabled(running && !pending, egui::Button::new("Tomar foto"))
                .clicked()
            {
                if let Some(camera) = app.camera_mut() {
                    camera.request_photo();
                }
            }
            if pending {
                ui.spinner();
            }
            ui.separator();

            // Device configuration; each action is independent and idempotent.
            if let Some(camera) = app.camera_mut() {
                let torch_label = if camera.torch_on() {
                    "Apagar linterna"
                } else {
                    "Encender linterna"
                };
                if ui
                    .add_enabled(running, egui::Button::new(torch_label))
                    .clicked()
                {
                    camera.toggle_torch();
                }
                ui.horizontal(|ui| {
                    ui.label("Exposición");
                    if ui.add_enabled(running, egui::Button::new("−")).clicked() {
                        camera.step_exposure(-1);
                    }
                    if ui.add_enabled(running, egui::Button::new("+")).clicked() {
                        camera.step_exposure(1);
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Balance de blancos");
                    if ui.add_enabled(running, egui::Button::new("−")).clicked() {
                        camera.step_white_balance(-1);
                    }
                    if ui.add_enabled(running, egui::Button::new("+")).clicked() {
                        camera.step_white_balance(1);
                    }
                });
            }
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;
        match state {
            SessionState::Running { .. } => {
                if let Some(camera) = app.camera_mut() {
                    if let Some((texture, size)) = camera.preview_texture(ui.ctx()) {
                        // Aspect-fit the live preview.
                        let scale = (rect.width() / size.x).min(rect.height() / size.y);
                        let shown = egui::Rect::from_center_size(rect.center(), size * scale);
                        painter.image(texture, shown, crate::panels::UV_FULL, egui::Color32::WHITE);
                    }
                }
            }
            SessionState::NotAuthorized => {
                centered_message(&painter, rect, "Azul no tiene permiso para usar la cámara.");
            }
            SessionState::ConfigurationFailed(_) => {
                centered_message(&painter, rect, "No se pudo configurar la cámara.");
            }
            SessionState::Unconfigured | SessionState::Stopped => {
                centered_message(&painter, rect, "Configurando cámara…");
            }
        }
    });
}

fn centered_message(painter: &egui::Painter, rect: egui::Rect, text: &str) {
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(16.0),
        egui::Color32::GRAY,
    );
}
