pub mod result_view;
pub mod upload_view;

pub trait View {
    fn draw(&mut self, ui: &mut egui::Ui);
}
