use eframe::egui;
use eyeswap_core::AssetOrder;

use super::EyeSwapApp;

impl EyeSwapApp {
    pub(super) fn show_preferences_window(&mut self, ctx: &egui::Context) {
        if !self.show_preferences {
            return;
        }

        let mut open = self.show_preferences;
        let mut browse = false;
        egui::Window::new("Preferences")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Eye assets");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.preferences.eye_asset_path)
                            .hint_text("path to .gltf / .glb / .obj")
                            .desired_width(320.0),
                    );
                    if ui.button("Browse...").clicked() {
                        browse = true;
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Assignment");
                    let order = &mut self.preferences.asset_order;
                    egui::ComboBox::from_id_salt("pref_asset_order")
                        .selected_text(order.label())
                        .show_ui(ui, |ui| {
                            for mode in AssetOrder::ALL {
                                if ui.selectable_label(*order == mode, mode.label()).clicked() {
                                    *order = mode;
                                }
                            }
                        });
                });
                ui.separator();
                ui.label("Eye removal");
                ui.horizontal(|ui| {
                    ui.label("Weight threshold");
                    ui.add(
                        egui::DragValue::new(&mut self.preferences.weight_threshold)
                            .speed(0.001)
                            .range(0.0..=1.0)
                            .update_while_editing(false),
                    );
                });
            });
        if browse {
            self.browse_asset_path();
        }
        if self.show_preferences && !open {
            self.save_preferences();
        }
        self.show_preferences = open;
    }
}
