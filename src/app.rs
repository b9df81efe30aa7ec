//! Main application module for findmark
//!
//! This module implements the eframe App trait for the editor window,
//! wiring the find/replace panel to the search session and handling
//! keyboard shortcuts, file dialogs and window state.

use crate::config::WindowSize;
use crate::editor::EditorWidget;
use crate::files::dialogs::{open_file_dialog, save_file_dialog};
use crate::host::EditorHost;
use crate::state::AppState;
use crate::ui::{FindReplacePanel, FindReplacePanelOutput};
use eframe::egui;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Application name shown in the window title.
const APP_TITLE: &str = "findmark";

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyboardAction {
    /// Save current file (Ctrl+S)
    Save,
    /// Save As dialog (Ctrl+Shift+S)
    SaveAs,
    /// Open file dialog (Ctrl+O)
    Open,
    /// Open find panel (Ctrl+F)
    OpenFind,
    /// Open find and replace panel (Ctrl+H)
    OpenFindReplace,
}

/// The main application struct that holds all state and implements eframe::App.
pub struct FindmarkApp {
    /// Central application state
    state: AppState,
    /// Find/replace panel component
    find_replace_panel: FindReplacePanel,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
    /// Application start time for timing toast messages
    start_time: std::time::Instant,
}

impl FindmarkApp {
    /// Create the app, opening `path` if one was given on the command line.
    pub fn new(_cc: &eframe::CreationContext<'_>, state: AppState, path: Option<PathBuf>) -> Self {
        info!("Initializing {}", APP_TITLE);

        let mut app = Self {
            state,
            find_replace_panel: FindReplacePanel::new(),
            last_window_size: None,
            last_window_pos: None,
            start_time: std::time::Instant::now(),
        };

        if let Some(path) = path {
            app.open_path(path);
        }
        app
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Update window size in settings if changed.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let size = rect.size();
        let pos = rect.min;

        let size_changed = self
            .last_window_size
            .map(|s| (s - size).length() > 1.0)
            .unwrap_or(true);
        let pos_changed = self
            .last_window_pos
            .map(|p| (p - pos).length() > 1.0)
            .unwrap_or(true);
        if !size_changed && !pos_changed {
            return;
        }

        self.last_window_size = Some(size);
        self.last_window_pos = Some(pos);
        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        let window_size = WindowSize {
            width: size.x,
            height: size.y,
            x: Some(pos.x),
            y: Some(pos.y),
            maximized,
        };
        if self.state.settings.window_size != window_size {
            self.state.settings.window_size = window_size;
            self.state.settings_dirty = true;
            debug!(
                "Window state updated: {}x{} at ({}, {}), maximized: {}",
                size.x, size.y, pos.x, pos.y, maximized
            );
        }
    }

    /// Get the window title: "Filename - findmark", with `*` when modified.
    fn window_title(&self) -> String {
        format!("{} - {}", self.state.title(), APP_TITLE)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn open_path(&mut self, path: PathBuf) {
        info!("Opening file: {}", path.display());
        match self.state.open_file(path.clone()) {
            Ok(()) => {
                let time = self.get_app_time();
                self.state
                    .show_toast(format!("Opened: {}", path.display()), time, 2.0);
            }
            Err(e) => {
                warn!("Failed to open file {}: {}", path.display(), e);
                self.state
                    .show_error(format!("Failed to open {}:\n{}", path.display(), e));
            }
        }
    }

    /// Handle the "File > Open" action.
    fn handle_open_file(&mut self) {
        match open_file_dialog(self.state.document_dir()) {
            Some(path) => self.open_path(path),
            None => debug!("File dialog cancelled"),
        }
    }

    /// Handle the "File > Save" action.
    ///
    /// A document without a path goes through "Save As" instead.
    fn handle_save_file(&mut self) {
        if self.state.path.is_none() {
            self.handle_save_as_file();
            return;
        }
        match self.state.save() {
            Ok(path) => {
                let time = self.get_app_time();
                self.state
                    .show_toast(format!("Saved: {}", path.display()), time, 3.0);
            }
            Err(e) => {
                warn!("Failed to save file: {}", e);
                self.state.show_error(format!("Failed to save file:\n{}", e));
            }
        }
    }

    /// Handle the "File > Save As" action.
    fn handle_save_as_file(&mut self) {
        let default_name = self
            .state
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "untitled.md".to_string());

        let Some(path) = save_file_dialog(self.state.document_dir(), Some(&default_name)) else {
            debug!("Save dialog cancelled");
            return;
        };
        info!("Saving file as: {}", path.display());
        match self.state.save_as(path) {
            Ok(path) => {
                let time = self.get_app_time();
                self.state
                    .show_toast(format!("Saved: {}", path.display()), time, 3.0);
            }
            Err(e) => {
                warn!("Failed to save file: {}", e);
                self.state.show_error(format!("Failed to save file:\n{}", e));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Find handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_open_find(&mut self, replace_mode: bool) {
        self.state.ui.show_find_replace = true;
        self.state.ui.find_state.is_replace_mode = replace_mode;
        self.find_replace_panel.request_focus();

        let mode = self.state.ui.find_state.mode();
        self.state.session.open(&mut self.state.document, mode);

        // Search right away if a term is left over from before
        if !self.state.ui.find_state.search_term.is_empty() {
            self.state.sync_find_state();
            self.state.session.find_all(&mut self.state.document);
        }
        debug!("Find panel opened, replace_mode: {}", replace_mode);
    }

    fn handle_close_find(&mut self) {
        self.state.session.close(&mut self.state.document);
        self.state.ui.show_find_replace = false;
        self.state.remember_find_options();
    }

    fn handle_panel_output(&mut self, output: FindReplacePanelOutput) {
        let state = &mut self.state;

        let mode = state.ui.find_state.mode();
        if state.session.mode() != mode {
            state.session.open(&mut state.document, mode);
        }
        if output.selection_toggled {
            let restrict = state.ui.find_state.restrict_to_selection;
            state
                .session
                .set_restrict_to_selection(&mut state.document, restrict);
        }
        state.sync_find_state();

        if output.search_changed || output.selection_toggled {
            // Live search: an emptied field just drops the highlights
            if state.ui.find_state.search_term.trim().is_empty() {
                state.session.clear_highlights(&mut state.document);
            } else {
                state.session.find_all(&mut state.document);
            }
        }
        if output.find_all_requested {
            state.session.find_all(&mut state.document);
        }
        if output.next_requested {
            state.session.next(&mut state.document);
        }
        if output.prev_requested {
            state.session.previous(&mut state.document);
        }
        if output.replace_requested {
            state.session.replace_next(&mut state.document);
        }
        if output.replace_all_requested {
            state.session.replace_all(&mut state.document);
        }
        if output.close_requested {
            self.handle_close_find();
        }
    }

    /// Show the latest session notice as a toast.
    fn show_notices(&mut self) {
        if let Some(notice) = self.state.take_notice() {
            let duration = if notice.is_error() { 4.0 } else { 2.0 };
            let time = self.get_app_time();
            self.state.show_toast(notice.to_string(), time, duration);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let panel_open = self.state.ui.show_find_replace;
        let action = ctx.input(|i| {
            // Ctrl+Shift+S: Save As (check first since it's more specific)
            if i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+Shift+S (Save As)");
                return Some(KeyboardAction::SaveAs);
            }

            // Ctrl+S: Save
            if i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+S (Save)");
                return Some(KeyboardAction::Save);
            }

            // Ctrl+O: Open
            if i.modifiers.ctrl && i.key_pressed(egui::Key::O) {
                debug!("Keyboard shortcut: Ctrl+O (Open)");
                return Some(KeyboardAction::Open);
            }

            // Ctrl+F: Find
            if i.modifiers.ctrl && i.key_pressed(egui::Key::F) {
                debug!("Keyboard shortcut: Ctrl+F (Find)");
                return Some(KeyboardAction::OpenFind);
            }

            // Ctrl+H: Find and Replace (the open panel toggles its own mode)
            if !panel_open && i.modifiers.ctrl && i.key_pressed(egui::Key::H) {
                debug!("Keyboard shortcut: Ctrl+H (Find and Replace)");
                return Some(KeyboardAction::OpenFindReplace);
            }

            None
        });

        match action {
            Some(KeyboardAction::Save) => self.handle_save_file(),
            Some(KeyboardAction::SaveAs) => self.handle_save_as_file(),
            Some(KeyboardAction::Open) => self.handle_open_file(),
            Some(KeyboardAction::OpenFind) => self.handle_open_find(false),
            Some(KeyboardAction::OpenFindReplace) => self.handle_open_find(true),
            None => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        let mut action = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open…  Ctrl+O").clicked() {
                        action = Some(KeyboardAction::Open);
                        ui.close_menu();
                    }
                    if ui.button("Save  Ctrl+S").clicked() {
                        action = Some(KeyboardAction::Save);
                        ui.close_menu();
                    }
                    if ui.button("Save As…  Ctrl+Shift+S").clicked() {
                        action = Some(KeyboardAction::SaveAs);
                        ui.close_menu();
                    }
                });
                ui.menu_button("Search", |ui| {
                    if ui.button("Find  Ctrl+F").clicked() {
                        action = Some(KeyboardAction::OpenFind);
                        ui.close_menu();
                    }
                    if ui.button("Replace  Ctrl+H").clicked() {
                        action = Some(KeyboardAction::OpenFindReplace);
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui
                        .checkbox(&mut self.state.settings.word_wrap, "Word Wrap")
                        .changed()
                    {
                        self.state.settings_dirty = true;
                    }
                });
            });
        });

        match action {
            Some(KeyboardAction::Save) => self.handle_save_file(),
            Some(KeyboardAction::SaveAs) => self.handle_save_as_file(),
            Some(KeyboardAction::Open) => self.handle_open_file(),
            Some(KeyboardAction::OpenFind) => self.handle_open_find(false),
            Some(KeyboardAction::OpenFindReplace) => self.handle_open_find(true),
            None => {}
        }
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.state.title());

                // Center: Toast message (temporary notifications)
                if let Some(toast) = &self.state.ui.toast_message {
                    ui.with_layout(
                        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                        |ui| {
                            ui.label(egui::RichText::new(toast).italics());
                        },
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let document = &self.state.document;
                    let (line, column) = document
                        .selection()
                        .and_then(|s| document.offset_to_position(s.start).ok())
                        .map(|p| (p.line, p.column))
                        .unwrap_or((0, 0));
                    ui.label(format!("Ln {}, Col {}", line + 1, column + 1));
                    ui.separator();
                    ui.label(format!("{} lines", document.line_count()));

                    if self.state.ui.show_find_replace {
                        ui.separator();
                        ui.label(self.state.session.counter());
                    }
                });
            });
        });
    }

    fn render_editor(&mut self, ctx: &egui::Context) {
        let is_dark = ctx.style().visuals.dark_mode;
        let output = egui::CentralPanel::default()
            .show(ctx, |ui| {
                EditorWidget::new(&mut self.state.document)
                    .font_size(self.state.settings.font_size)
                    .word_wrap(self.state.settings.word_wrap)
                    .dark(is_dark)
                    .id(egui::Id::new("main_editor"))
                    .show(ui)
            })
            .inner;

        if output.changed && self.state.session.is_open() {
            self.state.session.refresh(&mut self.state.document);
        }
    }

    fn render_find_panel(&mut self, ctx: &egui::Context) {
        if !self.state.ui.show_find_replace {
            return;
        }
        let is_dark = ctx.style().visuals.dark_mode;
        let counter = self.state.session.counter();
        let output = self.find_replace_panel.show(
            ctx,
            &mut self.state.ui.find_state,
            &counter,
            is_dark,
        );
        self.handle_panel_output(output);
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if self.state.ui.show_error_modal {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new("⚠").size(24.0));
                    ui.label(&self.state.ui.error_message);
                    ui.separator();
                    if ui.button("OK").clicked() {
                        self.state.dismiss_error();
                    }
                });
        }
    }
}

impl eframe::App for FindmarkApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Update toast message (clear if expired)
        let current_time = self.get_app_time();
        self.state.update_toast(current_time);

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
        self.update_window_state(ctx);

        self.handle_keyboard_shortcuts(ctx);

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);
        self.render_find_panel(ctx);
        self.render_editor(ctx);
        self.render_dialogs(ctx);

        self.show_notices();

        // Keep repainting while a toast is waiting to expire
        if self.state.ui.toast_expires_at.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    /// Auto-save interval in seconds.
    fn auto_save_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(30)
    }
}
