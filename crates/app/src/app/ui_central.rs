use eframe::egui;
use eyeswap_core::VERSION_LABEL;

use super::{EyeSwapApp, NoticeLevel};

const BUTTON_WIDTH: f32 = 160.0;

impl EyeSwapApp {
    pub(super) fn show_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Eye Replacer");
            ui.add_space(8.0);

            let skeleton = self.object_label(self.session.skeleton());
            let mesh = self.object_label(self.session.mesh());
            ui.horizontal(|ui| {
                if ui
                    .add_sized([BUTTON_WIDTH, 24.0], egui::Button::new("Select Armature"))
                    .clicked()
                {
                    self.select_skeleton();
                }
                ui.label(format!("Armature: {skeleton}"));
            });
            ui.horizontal(|ui| {
                if ui
                    .add_sized([BUTTON_WIDTH, 24.0], egui::Button::new("Select Mesh"))
                    .clicked()
                {
                    self.select_mesh();
                }
                ui.label(format!("Mesh: {mesh}"));
            });

            ui.add_space(12.0);
            if ui
                .add_sized([BUTTON_WIDTH * 2.0, 40.0], egui::Button::new("Replace Eyes"))
                .clicked()
            {
                self.run_replace();
            }

            ui.add_space(8.0);
            if let Some(notice) = &self.notice {
                let color = match notice.level {
                    NoticeLevel::Info => ui.visuals().text_color(),
                    NoticeLevel::Warning => ui.visuals().warn_fg_color,
                };
                ui.colored_label(color, &notice.text);
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.weak(VERSION_LABEL);
            });
        });
    }
}
