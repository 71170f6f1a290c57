//! Chat panel: displays the active session's messages and the input field.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use chat_types::message::{Message, Role};
use chat_types::session::Session;
use crate::markdown;
use crate::state::UiState;
use crate::theme::*;

/// Render the chat panel. Returns Some(message) when user submits input.
/// `files_hovered` is true while files are dragged over the window.
pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    session: Option<&Session>,
    files_hovered: bool,
) -> Option<String> {
    let mut submitted = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Chat").color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.is_busy() { WARNING } else { SUCCESS };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                        if let Some(warning) = &state.persist_warning {
                            ui.label(RichText::new("⚠ not saved").color(ERROR).small())
                                .on_hover_text(warning);
                        }
                    });
                });

                ui.separator();

                // Messages area
                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if let Some(session) = session {
                            for message in &session.messages {
                                render_message(ui, message);
                                ui.add_space(4.0);
                            }
                        }

                        if state.is_busy() {
                            render_thinking(ui);
                        }

                        if files_hovered {
                            ui.add_space(8.0);
                            ui.label(
                                RichText::new("Drop files to upload")
                                    .color(ACCENT)
                                    .italics(),
                            );
                        }
                    });

                ui.add_space(8.0);

                // Input area
                ui.horizontal(|ui| {
                    let enabled = state.accepts_input();
                    let hint = if !state.loaded {
                        "Loading chats..."
                    } else if state.is_busy() {
                        "Waiting for reply..."
                    } else {
                        "Type a message..."
                    };
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text(hint)
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(MESSAGE_FONT_SIZE));

                    let response = ui.add_enabled(enabled, input);

                    let send_enabled = enabled && !state.input_text.trim().is_empty();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click
                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if (enter && send_enabled) || send_btn.clicked() {
                        submitted = Some(state.input_text.trim().to_string());
                        state.input_text.clear();
                        response.request_focus();
                    }
                });
            });
        });

    submitted
}

fn render_message(ui: &mut egui::Ui, message: &Message) {
    let (label, label_color, bg, layout) = match message.role {
        Role::User => ("You", ACCENT, BG_USER_BUBBLE, Layout::right_to_left(Align::Min)),
        Role::Assistant => ("Bot", SUCCESS, BG_SECONDARY, Layout::left_to_right(Align::Min)),
    };
    let max_width = ui.available_width() * 0.8;

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(bg)
            .corner_radius(BUBBLE_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).color(label_color).strong().small());
                    ui.label(markdown::layout_job(&message.text, TEXT_PRIMARY));
                });
            });
    });
}

fn render_thinking(ui: &mut egui::Ui) {
    let dots = (ui.input(|i| i.time) * 3.0) as usize % 3 + 1;
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(BUBBLE_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(
                RichText::new(format!("Thinking{}", ".".repeat(dots)))
                    .color(TEXT_SECONDARY)
                    .italics(),
            );
        });
}
