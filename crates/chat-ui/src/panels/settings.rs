//! Settings panel: storage backend, reply timing, sidebar titles and the
//! optional remote reply backend. Saved with an explicit button.

use egui::{self, RichText, Vec2};
use chat_types::config::{BackendConfig, ChatConfig, StorageBackendType};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was changed; applied in memory only
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Debug, Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut ChatConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Replies ──────────────────────────────────────
            ui.label(RichText::new("Replies").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Thinking delay (ms)").color(TEXT_SECONDARY).small());
            if ui
                .add(egui::Slider::new(&mut config.thinking_delay_ms, 0..=3000))
                .changed()
            {
                changed = true;
            }

            ui.add_space(4.0);

            let mut use_backend = config.backend.is_some();
            if ui.checkbox(&mut use_backend, "Ask a remote backend when unsure").changed() {
                config.backend = if use_backend {
                    Some(BackendConfig::new("/api/chat"))
                } else {
                    None
                };
                changed = true;
            }

            if let Some(backend) = config.backend.as_mut() {
                ui.label(RichText::new("Backend URL").color(TEXT_SECONDARY).small());
                if ui
                    .add(egui::TextEdit::singleline(&mut backend.url).hint_text("https://.../api/chat"))
                    .changed()
                {
                    changed = true;
                }
                ui.label(RichText::new("Timeout (ms)").color(TEXT_SECONDARY).small());
                if ui
                    .add(egui::Slider::new(&mut backend.timeout_ms, 500..=30_000))
                    .changed()
                {
                    changed = true;
                }
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Sidebar ──────────────────────────────────────
            ui.label(RichText::new("Sidebar").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Title length").color(TEXT_SECONDARY).small());
            if ui
                .add(egui::Slider::new(&mut config.title_max_chars, 10..=80))
                .changed()
            {
                changed = true;
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Storage Section ──────────────────────────────
            ui.label(RichText::new("Storage").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(config.storage.backend.label())
                .show_ui(ui, |ui| {
                    for backend in StorageBackendType::all() {
                        if ui
                            .selectable_value(&mut config.storage.backend, backend.clone(), backend.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(config.storage.backend.description())
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );
            ui.label(
                RichText::new("Storage changes apply after reload.")
                    .color(TEXT_SECONDARY)
                    .small(),
            );

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}
