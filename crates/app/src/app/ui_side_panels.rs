use eframe::egui;
use eyeswap_scene::ObjectKind;
use tracing_subscriber::filter::LevelFilter;

use super::EyeSwapApp;

impl EyeSwapApp {
    pub(super) fn show_side_panels(&mut self, ctx: &egui::Context) {
        if self.show_outliner {
            self.show_outliner_panel(ctx);
        }
        if self.show_console {
            self.show_console_panel(ctx);
        }
    }

    fn show_outliner_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("outliner")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Outliner");
                ui.separator();
                if self.scene.is_empty() {
                    ui.label("Empty scene. Open a project or import a character.");
                    return;
                }

                let active = self.scene.active();
                let mut clicked = None;
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for kind in [ObjectKind::Armature, ObjectKind::Mesh, ObjectKind::Empty] {
                        let objects: Vec<_> = self
                            .scene
                            .objects()
                            .filter(|object| object.kind() == kind)
                            .map(|object| (object.id, object.name.clone()))
                            .collect();
                        if objects.is_empty() {
                            continue;
                        }
                        egui::CollapsingHeader::new(kind.label())
                            .default_open(true)
                            .show(ui, |ui| {
                                for (id, name) in objects {
                                    if ui.selectable_label(active == Some(id), name).clicked() {
                                        clicked = Some(id);
                                    }
                                }
                            });
                    }
                });
                if let Some(id) = clicked {
                    self.scene.set_active(Some(id));
                }
            });
    }

    fn show_console_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("console")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    egui::ComboBox::from_label("Log level")
                        .selected_text(format!("{:?}", self.log_level))
                        .show_ui(ui, |ui| {
                            for level in [
                                LevelFilter::ERROR,
                                LevelFilter::WARN,
                                LevelFilter::INFO,
                                LevelFilter::DEBUG,
                                LevelFilter::TRACE,
                            ] {
                                if ui
                                    .selectable_label(self.log_level == level, format!("{:?}", level))
                                    .clicked()
                                {
                                    self.set_log_level(level);
                                }
                            }
                        });
                    if ui.button("Clear").clicked() {
                        self.console.clear();
                    }
                });
                ui.separator();
                let console_lines = self.console.snapshot();
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in console_lines {
                            ui.monospace(line);
                        }
                    });
            });
    }
}
