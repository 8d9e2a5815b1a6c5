use egui::{Color32, RichText};

use crate::session::SelectedImage;

/// What the user asked the upload surface to do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadAction {
    None,
    Browse,
    Clear,
}

/// Drop target / file picker when nothing is selected, filename row plus
/// preview once an image is in the session.
pub struct UploadView<'a> {
    image: Option<&'a SelectedImage>,
    analyzing: bool,
    hovering_files: bool,
}

impl<'a> UploadView<'a> {
    pub fn new(image: Option<&'a SelectedImage>, analyzing: bool, hovering_files: bool) -> Self {
        Self {
            image,
            analyzing,
            hovering_files,
        }
    }

    pub fn draw(&mut self, ui: &mut egui::Ui) -> UploadAction {
        let mut action = UploadAction::None;
        match self.image {
            None => {
                let fill = if self.hovering_files {
                    ui.visuals().faint_bg_color
                } else {
                    Color32::TRANSPARENT
                };
                egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.vertical_centered(|ui| {
                        ui.add_space(48.0);
                        ui.label(RichText::new("Upload Medical Image").size(18.0).strong());
                        ui.label("Drag and drop your medical image here, or browse for a file");
                        ui.label(RichText::new("Supports JPEG, PNG formats").weak().small());
                        ui.add_space(8.0);
                        if ui.button("Select Image").clicked() {
                            action = UploadAction::Browse;
                        }
                        ui.add_space(48.0);
                    });
                });
            }
            Some(image) => {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(image.filename()).strong());
                        ui.label(RichText::new(image.size_label()).weak());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .add_enabled(!self.analyzing, egui::Button::new("✕"))
                                .clicked()
                            {
                                action = UploadAction::Clear;
                            }
                        });
                    });
                    ui.vertical_centered(|ui| {
                        ui.add(
                            egui::Image::from_uri(image.preview_uri())
                                .max_height(360.0)
                                .maintain_aspect_ratio(true),
                        );
                    });
                });
            }
        }
        action
    }
}
