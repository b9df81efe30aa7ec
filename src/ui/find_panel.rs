//! Find and replace panel
//!
//! A floating egui panel with the search and replacement fields, the
//! option toggles, navigation and replace buttons and a live counter.
//! The panel only edits [`FindState`] and reports what the user asked for
//! through [`FindReplacePanelOutput`]; the app forwards those requests to
//! the search session.

use crate::session::PanelMode;
use eframe::egui::{self, Color32, Key, RichText, Ui, Vec2};

// ─────────────────────────────────────────────────────────────────────────────
// Find State
// ─────────────────────────────────────────────────────────────────────────────

/// The panel's editable fields and toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindState {
    /// Current search term
    pub search_term: String,
    /// Current replacement text
    pub replace_term: String,
    /// Whether search is case-sensitive
    pub case_sensitive: bool,
    /// Whether to match whole words only
    pub whole_word: bool,
    /// Whether to use regex matching
    pub use_regex: bool,
    /// Whether search is restricted to the selection
    pub restrict_to_selection: bool,
    /// Whether replace mode is active (vs. find-only)
    pub is_replace_mode: bool,
}

impl FindState {
    /// The panel mode matching `is_replace_mode`.
    pub fn mode(&self) -> PanelMode {
        if self.is_replace_mode {
            PanelMode::Replace
        } else {
            PanelMode::Find
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Find/Replace Panel
// ─────────────────────────────────────────────────────────────────────────────

/// Output from the FindReplacePanel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindReplacePanelOutput {
    /// Whether the search term or options changed (need to re-search)
    pub search_changed: bool,
    /// Whether the selection toggle was flipped
    pub selection_toggled: bool,
    /// Whether to find and highlight all matches
    pub find_all_requested: bool,
    /// Whether to move to next match
    pub next_requested: bool,
    /// Whether to move to previous match
    pub prev_requested: bool,
    /// Whether to replace current match
    pub replace_requested: bool,
    /// Whether to replace all matches
    pub replace_all_requested: bool,
    /// Whether to close the panel
    pub close_requested: bool,
}

/// A floating find/replace panel for the editor.
pub struct FindReplacePanel {
    /// Whether the search input should be focused
    focus_search: bool,
}

impl Default for FindReplacePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl FindReplacePanel {
    /// Create a new find/replace panel.
    pub fn new() -> Self {
        Self { focus_search: true }
    }

    /// Request focus on the search input.
    pub fn request_focus(&mut self) {
        self.focus_search = true;
    }

    /// Show the find/replace panel.
    ///
    /// `counter` is the live `current/total` text from the session.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        find_state: &mut FindState,
        counter: &str,
        is_dark: bool,
    ) -> FindReplacePanelOutput {
        let mut output = FindReplacePanelOutput::default();
        let colors = PanelColors::for_theme(is_dark);

        let frame = egui::Frame::none()
            .fill(colors.background)
            .stroke(egui::Stroke::new(1.0, colors.border))
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .rounding(egui::Rounding::same(6.0))
            .shadow(egui::epaint::Shadow {
                offset: egui::vec2(0.0, 2.0),
                blur: 8.0,
                spread: 0.0,
                color: Color32::from_black_alpha(40),
            });

        egui::Window::new("Find and Replace")
            .id(egui::Id::new("find_replace_panel"))
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 16.0])
            .frame(frame)
            .show(ctx, |ui| {
                ui.set_min_width(460.0);

                let (escape, enter, f3_next, f3_prev, ctrl_h) = ui.input(|i| {
                    (
                        i.key_pressed(Key::Escape),
                        i.key_pressed(Key::Enter),
                        i.key_pressed(Key::F3) && !i.modifiers.shift,
                        i.key_pressed(Key::F3) && i.modifiers.shift,
                        i.modifiers.ctrl && i.key_pressed(Key::H),
                    )
                });

                if escape {
                    output.close_requested = true;
                }
                if enter || f3_next {
                    output.next_requested = true;
                }
                if f3_prev {
                    output.prev_requested = true;
                }
                if ctrl_h {
                    find_state.is_replace_mode = !find_state.is_replace_mode;
                }

                self.show_header(ui, find_state, &colors, &mut output);
                ui.add_space(6.0);
                self.show_inputs(ui, find_state, counter, &colors, &mut output);
                ui.add_space(8.0);
                show_options(ui, find_state, is_dark, &colors, &mut output);
                ui.add_space(6.0);
                show_actions(ui, find_state, &mut output);

                ui.add_space(4.0);
                ui.label(
                    RichText::new("Enter/F3: Next • Shift+F3: Prev • Esc: Close")
                        .size(10.0)
                        .color(colors.muted),
                );
            });

        output
    }

    fn show_header(
        &self,
        ui: &mut Ui,
        find_state: &mut FindState,
        colors: &PanelColors,
        output: &mut FindReplacePanelOutput,
    ) {
        ui.horizontal(|ui| {
            let title = if find_state.is_replace_mode {
                "Find and Replace"
            } else {
                "Find"
            };
            ui.label(RichText::new(title).size(14.0).color(colors.text).strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(
                        egui::Button::new(RichText::new("×").size(16.0).color(colors.muted))
                            .frame(false),
                    )
                    .on_hover_text("Close (Escape)")
                    .clicked()
                {
                    output.close_requested = true;
                }

                let (mode_icon, mode_tooltip) = if find_state.is_replace_mode {
                    ("⇅", "Hide Replace (Ctrl+H)")
                } else {
                    ("⇄", "Show Replace (Ctrl+H)")
                };
                if ui
                    .add(
                        egui::Button::new(RichText::new(mode_icon).size(14.0).color(colors.muted))
                            .frame(false),
                    )
                    .on_hover_text(mode_tooltip)
                    .clicked()
                {
                    find_state.is_replace_mode = !find_state.is_replace_mode;
                }
            });
        });
    }

    fn show_inputs(
        &mut self,
        ui: &mut Ui,
        find_state: &mut FindState,
        counter: &str,
        colors: &PanelColors,
        output: &mut FindReplacePanelOutput,
    ) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("🔍").size(14.0));

            let search_response = ui.add_sized(
                Vec2::new(300.0, 24.0),
                egui::TextEdit::singleline(&mut find_state.search_term)
                    .id(egui::Id::new("find_replace_search_input"))
                    .hint_text("Search...")
                    .font(egui::FontId::proportional(13.0)),
            );

            if self.focus_search {
                search_response.request_focus();
                self.focus_search = false;
            }

            if search_response.changed() {
                output.search_changed = true;
            }

            // Nothing to count before the first search
            let counter = if find_state.search_term.trim().is_empty() {
                ""
            } else {
                counter
            };
            ui.label(RichText::new(counter).size(12.0).color(colors.muted));
        });

        if find_state.is_replace_mode {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("↳").size(14.0).color(colors.muted));
                ui.add_sized(
                    Vec2::new(300.0, 24.0),
                    egui::TextEdit::singleline(&mut find_state.replace_term)
                        .id(egui::Id::new("find_replace_replace_input"))
                        .hint_text("Replace with...")
                        .font(egui::FontId::proportional(13.0)),
                );
            });
        }
    }
}

fn show_options(
    ui: &mut Ui,
    find_state: &mut FindState,
    is_dark: bool,
    colors: &PanelColors,
    output: &mut FindReplacePanelOutput,
) {
    ui.horizontal(|ui| {
        let toggles: [(&str, &str, &mut bool); 3] = [
            (".*", "Use Regex", &mut find_state.use_regex),
            ("Aa", "Case Sensitive", &mut find_state.case_sensitive),
            ("W", "Whole Word", &mut find_state.whole_word),
        ];
        for (label, tooltip, value) in toggles {
            if ui
                .add(toggle_button(label, tooltip, *value, is_dark, colors.accent))
                .clicked()
            {
                *value = !*value;
                output.search_changed = true;
            }
            ui.add_space(4.0);
        }

        if ui
            .add(toggle_button(
                "⬚",
                "Only in Selection",
                find_state.restrict_to_selection,
                is_dark,
                colors.accent,
            ))
            .clicked()
        {
            find_state.restrict_to_selection = !find_state.restrict_to_selection;
            output.selection_toggled = true;
        }
    });
}

fn show_actions(ui: &mut Ui, find_state: &FindState, output: &mut FindReplacePanelOutput) {
    let has_term = !find_state.search_term.trim().is_empty();

    ui.horizontal(|ui| {
        if ui
            .add_enabled(has_term, egui::Button::new("Find All").min_size(Vec2::new(70.0, 24.0)))
            .on_hover_text("Highlight every match")
            .clicked()
        {
            output.find_all_requested = true;
        }

        if ui
            .add_enabled(
                has_term,
                egui::Button::new(RichText::new("◀").size(12.0)).min_size(Vec2::new(28.0, 24.0)),
            )
            .on_hover_text("Previous (Shift+F3)")
            .clicked()
        {
            output.prev_requested = true;
        }

        if ui
            .add_enabled(
                has_term,
                egui::Button::new(RichText::new("▶").size(12.0)).min_size(Vec2::new(28.0, 24.0)),
            )
            .on_hover_text("Next (F3 or Enter)")
            .clicked()
        {
            output.next_requested = true;
        }

        if find_state.is_replace_mode {
            ui.add_space(8.0);

            if ui
                .add_enabled(has_term, egui::Button::new("Replace").min_size(Vec2::new(60.0, 24.0)))
                .on_hover_text("Replace current match")
                .clicked()
            {
                output.replace_requested = true;
            }

            if ui
                .add_enabled(
                    has_term,
                    egui::Button::new("Replace All").min_size(Vec2::new(80.0, 24.0)),
                )
                .on_hover_text("Replace all matches")
                .clicked()
            {
                output.replace_all_requested = true;
            }
        }
    });
}

/// Panel colors for the light and dark themes.
struct PanelColors {
    background: Color32,
    border: Color32,
    text: Color32,
    muted: Color32,
    accent: Color32,
}

impl PanelColors {
    fn for_theme(is_dark: bool) -> Self {
        if is_dark {
            Self {
                background: Color32::from_rgb(45, 45, 45),
                border: Color32::from_rgb(70, 70, 70),
                text: Color32::from_rgb(220, 220, 220),
                muted: Color32::from_rgb(140, 140, 140),
                accent: Color32::from_rgb(100, 180, 255),
            }
        } else {
            Self {
                background: Color32::from_rgb(250, 250, 250),
                border: Color32::from_rgb(200, 200, 200),
                text: Color32::from_rgb(30, 30, 30),
                muted: Color32::from_rgb(120, 120, 120),
                accent: Color32::from_rgb(0, 120, 212),
            }
        }
    }
}

/// Create a toggle button widget.
fn toggle_button<'a>(
    label: &'a str,
    tooltip: &'a str,
    active: bool,
    is_dark: bool,
    accent_color: Color32,
) -> impl egui::Widget + 'a {
    move |ui: &mut Ui| -> egui::Response {
        let text_color = if active {
            accent_color
        } else if is_dark {
            Color32::from_rgb(160, 160, 160)
        } else {
            Color32::from_rgb(100, 100, 100)
        };

        let bg_color = match (active, is_dark) {
            (true, true) => Color32::from_rgb(50, 70, 90),
            (true, false) => Color32::from_rgb(220, 235, 250),
            (false, _) => Color32::TRANSPARENT,
        };

        let border_color = if active {
            accent_color
        } else if is_dark {
            Color32::from_rgb(70, 70, 70)
        } else {
            Color32::from_rgb(180, 180, 180)
        };

        let response = ui.add(
            egui::Button::new(RichText::new(label).size(12.0).color(text_color).strong())
                .fill(bg_color)
                .stroke(egui::Stroke::new(1.0, border_color))
                .min_size(Vec2::new(28.0, 24.0)),
        );

        response.on_hover_text(tooltip)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_state_default() {
        let state = FindState::default();
        assert!(state.search_term.is_empty());
        assert!(state.replace_term.is_empty());
        assert!(!state.is_replace_mode);
        assert_eq!(state.mode(), PanelMode::Find);
    }

    #[test]
    fn test_find_state_mode() {
        let state = FindState {
            is_replace_mode: true,
            ..FindState::default()
        };
        assert_eq!(state.mode(), PanelMode::Replace);
    }

    #[test]
    fn test_panel_output_default_requests_nothing() {
        assert_eq!(
            FindReplacePanelOutput::default(),
            FindReplacePanelOutput {
                search_changed: false,
                selection_toggled: false,
                find_all_requested: false,
                next_requested: false,
                prev_requested: false,
                replace_requested: false,
                replace_all_requested: false,
                close_requested: false,
            }
        );
    }
}
