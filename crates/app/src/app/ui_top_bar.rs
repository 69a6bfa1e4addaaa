use eframe::egui;

use super::EyeSwapApp;

impl EyeSwapApp {
    pub(super) fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New").clicked() {
                        self.new_scene();
                        ui.close();
                    }
                    if ui.button("Open...").clicked() {
                        self.open_project_dialog();
                        ui.close();
                    }
                    if ui.button("Import Character...").clicked() {
                        self.import_character_dialog();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Save").clicked() {
                        self.save_project();
                        ui.close();
                    }
                    if ui.button("Save As...").clicked() {
                        self.save_project_dialog();
                        ui.close();
                    }
                    if ui.button("Export OBJ...").clicked() {
                        self.export_obj_dialog();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Preferences...").clicked() {
                        self.show_preferences = true;
                        ui.close();
                    }
                });

                ui.separator();
                ui.label("Eyeswap");
                ui.separator();
                ui.checkbox(&mut self.show_outliner, "Outliner");
                ui.checkbox(&mut self.show_console, "Console");
            });
        });
    }
}
