use eframe::egui;

use super::EyeSwapApp;

impl eframe::App for EyeSwapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_top_bar(ctx);
        self.show_side_panels(ctx);
        self.show_central_panel(ctx);
        self.show_preferences_window(ctx);
    }
}
