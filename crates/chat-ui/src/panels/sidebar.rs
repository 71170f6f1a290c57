//! Sidebar: session list (newest first), new chat, delete, clear history.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use chat_types::session::{SessionId, SessionSummary};
use crate::state::UiState;
use crate::theme::*;

/// What the user did in the sidebar this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    None,
    NewChat,
    Switch(SessionId),
    Delete(SessionId),
    ClearAll,
}

/// Render the sidebar. Session rows come from `list_session_summaries()`.
pub fn sidebar_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    summaries: &[SessionSummary],
) -> SidebarAction {
    let mut action = SidebarAction::None;

    egui::Frame::default()
        .fill(BG_SIDEBAR)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            let new_chat = ui.add_sized(
                Vec2::new(ui.available_width(), 30.0),
                egui::Button::new(RichText::new("+ New Chat").color(TEXT_PRIMARY).strong())
                    .fill(ACCENT)
                    .corner_radius(PANEL_ROUNDING),
            );
            if new_chat.clicked() {
                action = SidebarAction::NewChat;
            }

            ui.add_space(8.0);
            ui.label(RichText::new("Chats").color(TEXT_SECONDARY).small());
            ui.separator();

            let list_height = ui.available_height() - 48.0;
            ScrollArea::vertical()
                .max_height(list_height)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for summary in summaries {
                        if let Some(a) = session_row(ui, summary) {
                            action = a;
                        }
                    }
                });

            ui.separator();
            if state.confirm_clear {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Delete all chats?").color(WARNING).small());
                    if ui.small_button("Yes").clicked() {
                        state.confirm_clear = false;
                        action = SidebarAction::ClearAll;
                    }
                    if ui.small_button("No").clicked() {
                        state.confirm_clear = false;
                    }
                });
            } else if ui
                .button(RichText::new("Clear history").color(TEXT_SECONDARY).small())
                .clicked()
            {
                state.confirm_clear = true;
            }
        });

    action
}

fn session_row(ui: &mut egui::Ui, summary: &SessionSummary) -> Option<SidebarAction> {
    let mut action = None;
    let fill = if summary.is_active { BG_SURFACE } else { BG_SIDEBAR };

    egui::Frame::default()
        .fill(fill)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(4.0)
        .show(ui, |ui| {
            // Delete button first so the truncated title gets the remaining width
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui
                    .small_button(RichText::new("🗑").color(TEXT_SECONDARY))
                    .on_hover_text("Delete chat")
                    .clicked()
                {
                    action = Some(SidebarAction::Delete(summary.id));
                }

                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    let color = if summary.is_active { TEXT_STRONG } else { TEXT_SECONDARY };
                    let title = ui
                        .add(
                            egui::Label::new(RichText::new(&summary.title).color(color))
                                .truncate()
                                .sense(egui::Sense::click()),
                        )
                        .on_hover_text(&summary.title);
                    if title.clicked() && !summary.is_active {
                        action = Some(SidebarAction::Switch(summary.id));
                    }
                });
            });
        });

    ui.add_space(2.0);
    action
}
