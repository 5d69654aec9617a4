//! Editor screen: the captured photo plus the transient drawing surface
//! used to crop it or trace a defect outline, simple brightness/contrast
//! adjustment, and PNG encoding for the save action.

pub mod adjust;
pub mod crop;

use egui::{ColorImage, Rect, TextureOptions};
use image::RgbaImage;

use crate::error::AzulError;
use crate::gesture::{GestureRecorder, Mode};
use crate::overlay::Overlay;
use adjust::Adjustments;

pub struct EditorScreen {
    /// Working image: capture plus any committed crop and merged outline.
    /// Adjustments are not baked in here.
    source: RgbaImage,
    /// The photo exactly as captured, for the restore action.
    pristine: RgbaImage,
    recorder: GestureRecorder,
    crop_rect: Option<Rect>,
    /// The outline overlay is baked into `source` at most once per session.
    merged: bool,
    adjustments: Adjustments,
    /// On-screen rectangle the photo is displayed in; the crop and the
    /// overlay merge map gesture points through it.
    view: Rect,
    rendered: Option<RgbaImage>,
    texture: Option<egui::TextureHandle>,
    texture_stale: bool,
}

impl EditorScreen {
    /// Takes ownership of the encoded bytes handed over by the capture
    /// screen.
    pub fn from_captured_bytes(bytes: &[u8]) -> Result<Self, AzulError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_image(decoded))
    }

    pub fn from_image(img: RgbaImage) -> Self {
        Self {
            pristine: img.clone(),
            source: img,
            recorder: GestureRecorder::new(),
            crop_rect: None,
            merged: false,
            adjustments: Adjustments::default(),
            view: Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1.0, 1.0)),
            rendered: None,
            texture: None,
            texture_stale: true,
        }
    }

    pub fn image_size(&self) -> egui::Vec2 {
        egui::vec2(self.source.width() as f32, self.source.height() as f32)
    }

    pub fn mode(&self) -> Mode {
        self.recorder.mode()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.recorder.set_mode(mode);
    }

    pub fn overlay(&self) -> &Overlay {
        self.recorder.overlay()
    }

    pub fn crop_rect(&self) -> Option<Rect> {
        self.crop_rect
    }

    pub fn merged(&self) -> bool {
        self.merged
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    /// Seeds the session with previously used adjustments.
    pub fn set_adjustments(&mut self, adj: Adjustments) {
        self.adjustments = adj;
        self.invalidate();
    }

    /// The panel reports where the photo is displayed before forwarding
    /// input for the frame.
    pub fn set_view(&mut self, view: Rect) {
        self.view = view;
    }

    pub fn view(&self) -> Rect {
        self.view
    }

    // --- gesture handling -------------------------------------------------

    pub fn begin_gesture(&mut self, p: egui::Pos2) {
        if self.recorder.begin(p) {
            self.crop_rect = None;
        }
    }

    pub fn move_gesture(&mut self, p: egui::Pos2) {
        self.recorder.motion(p);
    }

    /// Fallback end point when the release event carries no position.
    pub fn last_gesture_point(&self) -> egui::Pos2 {
        self.recorder.last_point()
    }

    pub fn gesture_active(&self) -> bool {
        self.recorder.is_active()
    }

    /// Ends the gesture. In outline mode the overlay is composited into the
    /// working image (once per session) and then discarded; in crop mode it
    /// stays on screen until the crop is committed or a new gesture starts.
    pub fn end_gesture(&mut self, p: egui::Pos2) {
        let Some(outcome) = self.recorder.end(p) else {
            return;
        };
        self.crop_rect = Some(outcome.rect);
        if outcome.merge {
            if !self.merged {
                self.recorder
                    .overlay()
                    .composite_onto(&mut self.source, self.view);
                self.merged = true;
                self.invalidate();
            }
            self.recorder.clear_overlay();
            self.crop_rect = None;
        }
    }

    // --- crop / adjust / restore -----------------------------------------

    /// Commits the derived rectangle: replaces the working image with the
    /// cropped sub-image and clears the rectangle. A second invocation
    /// without a new gesture is a no-op.
    pub fn commit_crop(&mut self) -> bool {
        let Some(rect) = self.crop_rect.take() else {
            return false;
        };
        self.recorder.set_mode(Mode::Idle);
        self.recorder.clear_overlay();
        let image_rect = crop::map_view_rect_to_image(rect, self.view, self.image_size());
        let Some((x, y, w, h)) = crop::pixel_region(image_rect, self.image_size()) else {
            log::warn!("crop rectangle fell entirely outside the image");
            return false;
        };
        self.source = image::imageops::crop_imm(&self.source, x, y, w, h).to_image();
        self.invalidate();
        true
    }

    pub fn contrast_up(&mut self) {
        self.adjustments.contrast_up();
        self.invalidate();
    }

    pub fn contrast_down(&mut self) {
        self.adjustments.contrast_down();
        self.invalidate();
    }

    pub fn brightness_up(&mut self) {
        self.adjustments.brightness_up();
        self.invalidate();
    }

    pub fn brightness_down(&mut self) {
        self.adjustments.brightness_down();
        self.invalidate();
    }

    /// Returns the photo to its pristine captured state and re-arms the
    /// merge.
    pub fn restore(&mut self) {
        self.source = self.pristine.clone();
        self.adjustments = Adjustments::default();
        self.merged = false;
        self.crop_rect = None;
        self.recorder.set_mode(Mode::Idle);
        self.recorder.clear_overlay();
        self.invalidate();
    }

    // --- output -----------------------------------------------------------

    /// The working image with the current adjustments applied.
    pub fn rendered(&mut self) -> &RgbaImage {
        self.rendered
            .get_or_insert_with(|| adjust::apply(&self.source, self.adjustments))
    }

    /// Encodes the rendered image as PNG, the format handed to the library.
    pub fn encode_png(&mut self) -> Result<Vec<u8>, AzulError> {
        let rendered = self.rendered().clone();
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(rendered)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Texture of the rendered photo, re-uploaded only when it changed.
    pub fn texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        if self.texture_stale || self.texture.is_none() {
            let rendered = self.rendered();
            let color = ColorImage::from_rgba_unmultiplied(
                [rendered.width() as usize, rendered.height() as usize],
                rendered.as_raw(),
            );
            let handle = match self.texture.take() {
                Some(mut handle) => {
                    handle.set(color, TextureOptions::LINEAR);
                    handle
                }
                None => ctx.load_texture("editor_photo", color, TextureOptions::LINEAR),
            };
            self.texture = Some(handle);
            self.texture_stale = false;
        }
        self.texture.as_ref().map(|t| t.id()).unwrap_or_default()
    }

    fn invalidate(&mut self) {
        self.rendered = None;
        self.texture_stale = true;
    }
}
