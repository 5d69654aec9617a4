use std::path::PathBuf;

use crate::camera::{CameraController, CaptureOutcome, SessionState};
use crate::editor::EditorScreen;
use crate::editor::adjust::Adjustments;
use crate::library::PhotoLibrary;

/// Capture angle presets cycled on the capture screen.
pub const ANGLES: [&str; 4] = ["Pliegue", "Enrollado Frente", "Enrollado Lado", "Libre"];

/// We derive Deserialize/Serialize so we can persist settings on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Settings {
    pub library_dir: Option<PathBuf>,
    pub angle_index: usize,
    /// Reapply the previous session's brightness/contrast to new photos.
    pub remember_adjustments: bool,
    pub last_adjustments: Adjustments,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library_dir: None,
            angle_index: 0,
            remember_adjustments: false,
            last_adjustments: Adjustments::default(),
        }
    }
}

/// Which of the two screens is showing. The captured image moves from
/// capture to editor exactly once, at the transition.
pub enum Screen {
    Capture,
    Editor,
}

/// Modal alert state. One alert at a time; everything else waits for the
/// acknowledgement.
pub enum Alert {
    Info { title: String, message: String },
    ConfirmSave,
}

pub struct AzulApp {
    settings: Settings,
    screen: Screen,
    camera: Option<CameraController>,
    editor: Option<EditorScreen>,
    alert: Option<Alert>,
    /// Terminal session states get exactly one alert.
    reported_terminal: bool,
}

impl AzulApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self {
            settings,
            screen: Screen::Capture,
            camera: Some(CameraController::spawn()),
            editor: None,
            alert: None,
            reported_terminal: false,
        }
    }

    pub fn camera_state(&self) -> SessionState {
        self.camera
            .as_ref()
            .map(|camera| camera.state())
            .unwrap_or(SessionState::Stopped)
    }

    pub fn camera_mut(&mut self) -> Option<&mut CameraController> {
        self.camera.as_mut()
    }

    pub fn capture_pending(&self) -> bool {
        self.camera
            .as_ref()
            .is_some_and(|camera| camera.capture_pending())
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorScreen> {
        self.editor.as_mut()
    }

    pub fn angle_label(&self) -> &'static str {
        ANGLES[self.settings.angle_index % ANGLES.len()]
    }

    pub fn cycle_angle(&mut self, step: isize) {
        let len = ANGLES.len() as isize;
        let index = self.settings.angle_index as isize + step;
        self.settings.angle_index = index.rem_euclid(len) as usize;
    }

    pub fn remember_adjustments(&self) -> bool {
        self.settings.remember_adjustments
    }

    pub fn set_remember_adjustments(&mut self, on: bool) {
        self.settings.remember_adjustments = on;
    }

    pub fn show_info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.alert = Some(Alert::Info {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn request_save_confirmation(&mut self) {
        self.alert = Some(Alert::ConfirmSave);
    }

    /// Back to the capture screen: the editor state is discarded and a
    /// fresh camera session is started.
    pub fn return_to_capture(&mut self) {
        self.editor = None;
        self.camera = Some(CameraController::spawn());
        self.reported_terminal = false;
        self.screen = Screen::Capture;
    }

    /// Completes a finished capture request: hands the bytes to a new
    /// editor screen, or reports the failure. The stopped-on-dismissal
    /// rule: the camera session is dropped when the editor takes over.
    fn poll_capture(&mut self) {
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        match camera.poll_capture() {
            Some(CaptureOutcome::Success(bytes)) => {
                match EditorScreen::from_captured_bytes(&bytes) {
                    Ok(mut editor) => {
                        if self.settings.remember_adjustments {
                            editor.set_adjustments(self.settings.last_adjustments);
                        }
                        self.editor = Some(editor);
                        self.camera = None;
                        self.screen = Screen::Editor;
                    }
                    Err(e) => {
                        log::error!("decoding captured photo: {e}");
                        self.show_info("Azul", format!("No se pudo procesar la fotografía: {e}"));
                    }
                }
            }
            Some(CaptureOutcome::Failure(reason)) => {
                log::warn!("capture failed: {reason}");
                self.show_info(
                    "Azul",
                    "La fotografía no tiene el enfoque correcto.\nIntenta de nuevo.",
                );
            }
            None => {}
        }
    }

    /// One alert per terminal session state, pointing the user at the
    /// system settings where that can help.
    fn report_terminal_state(&mut self) {
        if self.reported_terminal {
            return;
        }
        match self.camera_state() {
            SessionState::NotAuthorized => {
                self.reported_terminal = true;
                self.show_info(
                    "Azul",
                    "Azul no tiene permiso para usar la cámara. \
                     Actívalo en la configuración de privacidad del sistema.",
                );
            }
            SessionState::ConfigurationFailed(reason) => {
                self.reported_terminal = true;
                log::error!("camera configuration failed: {reason}");
                self.show_info("Azul", "No se pudo configurar la cámara.");
            }
            _ => {}
        }
    }

    fn save_photo(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        self.settings.last_adjustments = editor.adjustments();
        let library = PhotoLibrary::resolve(self.settings.library_dir.as_deref());
        let result = editor
            .encode_png()
            .and_then(|bytes| library.save_png(&bytes));
        match result {
            Ok(path) => self.show_info(
                "Finalizado",
                format!("La imagen se ha guardado exitosamente en {}", path.display()),
            ),
            Err(e) => {
                log::error!("saving photo: {e}");
                self.show_info("Azul", format!("No se pudo guardar la imagen: {e}"));
            }
        }
    }

    fn show_alert_window(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.alert.take() else {
            return;
        };
        let mut keep = true;
        match &alert {
            Alert::Info { title, message } => {
                egui::Window::new(title)
                    .collapsible(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        ui.label(message);
                        if ui.button("OK").clicked() {
                            keep = false;
                        }
                    });
            }
            Alert::ConfirmSave => {
                egui::Window::new("¿Deseas guardar esta foto?")
                    .collapsible(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        ui.label(
                            "Asegúrate de que el defecto se vea claramente \
                             y que lo hayas marcado",
                        );
                        ui.horizontal(|ui| {
                            if ui.button("Guardar").clicked() {
                                keep = false;
                                self.save_photo();
                            }
                            if ui.button("Cancelar y tomar foto nuevamente").clicked() {
                                keep = false;
                                self.return_to_capture();
                            }
                        });
                    });
            }
        }
        if keep {
            self.alert = Some(alert);
        }
    }
}

impl eframe::App for AzulApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.screen {
            Screen::Capture => {
                // The preview is pushed from the worker; keep repainting.
                ctx.request_repaint();
                self.poll_capture();
                self.report_terminal_state();
                crate::panels::capture_panel(self, ctx);
            }
            Screen::Editor => {
                crate::panels::editor_panel(self, ctx);
            }
        }
        self.show_alert_window(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_keeps_adjustments_off() {
        let settings = Settings::default();
        assert!(!settings.remember_adjustments);
        assert!(settings.last_adjustments.is_neutral());
    }
}
