use std::path::PathBuf;
use std::sync::atomic::AtomicU8;
use std::sync::Arc;

use eyeswap_core::{replace_eyes, Preferences, SelectionSession};
use eyeswap_scene::{ObjectId, Scene};
use tracing_subscriber::filter::LevelFilter;

mod io;
mod logging;
mod ui;
mod ui_central;
mod ui_preferences;
mod ui_side_panels;
mod ui_top_bar;

pub(crate) use logging::ConsoleBuffer;

use logging::level_filter_to_u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) level: NoticeLevel,
    pub(crate) text: String,
}

pub(crate) struct EyeSwapApp {
    scene: Scene,
    project_path: Option<PathBuf>,
    session: SelectionSession,
    preferences: Preferences,
    notice: Option<Notice>,
    console: ConsoleBuffer,
    log_level: LevelFilter,
    log_level_state: Arc<AtomicU8>,
    show_preferences: bool,
    show_outliner: bool,
    show_console: bool,
}

pub(crate) fn setup_tracing() -> (ConsoleBuffer, Arc<AtomicU8>) {
    logging::setup_tracing()
}

impl EyeSwapApp {
    pub(crate) fn new(
        console: ConsoleBuffer,
        log_level_state: Arc<AtomicU8>,
        preferences: Preferences,
    ) -> Self {
        Self {
            scene: Scene::new(),
            project_path: None,
            session: SelectionSession::new(),
            preferences,
            notice: None,
            console,
            log_level: LevelFilter::INFO,
            log_level_state,
            show_preferences: false,
            show_outliner: true,
            show_console: false,
        }
    }

    fn set_log_level(&mut self, new_level: LevelFilter) {
        if new_level == self.log_level {
            return;
        }

        self.log_level_state.store(
            level_filter_to_u8(new_level),
            std::sync::atomic::Ordering::Relaxed,
        );
        self.log_level = new_level;
    }

    fn info(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!("{}", text);
        self.notice = Some(Notice {
            level: NoticeLevel::Info,
            text,
        });
    }

    fn warn(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!("{}", text);
        self.notice = Some(Notice {
            level: NoticeLevel::Warning,
            text,
        });
    }

    fn object_label(&self, id: Option<ObjectId>) -> String {
        id.and_then(|id| self.scene.object(id))
            .map(|object| object.name.clone())
            .unwrap_or_else(|| "None".to_string())
    }

    fn select_skeleton(&mut self) {
        match self.session.select_skeleton(&self.scene) {
            Ok(id) => {
                let name = self.object_label(Some(id));
                self.info(format!("Armature set to '{name}'."));
            }
            Err(err) => self.warn(err.to_string()),
        }
    }

    fn select_mesh(&mut self) {
        match self.session.select_mesh(&self.scene) {
            Ok(id) => {
                let name = self.object_label(Some(id));
                self.info(format!("Mesh set to '{name}'."));
            }
            Err(err) => self.warn(err.to_string()),
        }
    }

    fn run_replace(&mut self) {
        match replace_eyes(&mut self.scene, &self.session, &self.preferences) {
            Ok(report) => {
                let [left, _] = report.placed;
                self.scene.set_active(Some(left));
                self.info(report.summary());
            }
            Err(err) => self.warn(err.to_string()),
        }
    }

    /// Swaps in a new scene; stored selections refer to the old one.
    fn replace_scene(&mut self, scene: Scene, path: Option<PathBuf>) {
        self.scene = scene;
        self.project_path = path;
        self.session.clear();
        self.notice = None;
    }
}
