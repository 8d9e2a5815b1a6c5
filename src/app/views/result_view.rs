use egui::{Color32, RichText};

use crate::app::views::View;
use crate::predict::Verdict;

const DETECTED_COLOR: Color32 = Color32::from_rgb(217, 119, 6);
const CLEAR_COLOR: Color32 = Color32::from_rgb(46, 160, 67);

/// Card rendering a completed analysis: verdict heading, optional class
/// label, confidence bar, and the medical disclaimer.
pub struct ResultView<'a> {
    verdict: &'a Verdict,
}

impl<'a> ResultView<'a> {
    pub fn new(verdict: &'a Verdict) -> Self {
        Self { verdict }
    }
}

impl View for ResultView<'_> {
    fn draw(&mut self, ui: &mut egui::Ui) {
        let (heading, color, summary) = if self.verdict.detected {
            (
                "Cancer Cells Detected",
                DETECTED_COLOR,
                "The analysis has identified potential cancer cells in the provided image. \
                 Please consult with a medical professional for confirmation and next steps.",
            )
        } else {
            (
                "No Cancer Detected",
                CLEAR_COLOR,
                "The analysis did not detect cancer cells in the provided image. \
                 This result should be verified by a qualified medical professional.",
            )
        };

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.label(RichText::new(heading).size(22.0).strong().color(color));
            if let Some(class_name) = &self.verdict.class_name {
                ui.label(RichText::new(class_name).italics());
            }
            ui.label(summary);
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                ui.label(RichText::new("Confidence Score").strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(format!("{}%", self.verdict.confidence)).strong());
                });
            });
            ui.add(
                egui::ProgressBar::new(f32::from(self.verdict.confidence) / 100.0)
                    .desired_height(8.0),
            );
            ui.label(
                RichText::new("This score represents the AI model's confidence in its prediction")
                    .weak()
                    .small(),
            );

            ui.add_space(8.0);
            ui.separator();
            ui.label(
                RichText::new(
                    "This analysis is for informational purposes only and should not replace \
                     professional medical diagnosis. Always consult with qualified healthcare \
                     providers for medical decisions.",
                )
                .weak()
                .italics()
                .small(),
            );
        });
    }
}
