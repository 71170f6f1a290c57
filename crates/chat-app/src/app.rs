//! Main egui application: sidebar, chat and settings around one Conversation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use gloo_timers::future::TimeoutFuture;

use chat_core::clock::SystemClock;
use chat_core::conversation::Conversation;
use chat_core::event_bus::EventBus;
use chat_core::ports::{ReplyBackendPort, StoragePort};
use chat_core::responder::LocalResponder;
use chat_core::store::SessionStore;
use chat_core::upload::DroppedFile;
use chat_platform::storage::{auto_detect_storage, storage_for};
use chat_platform::HttpReplyBackend;
use chat_types::config::{BackendConfig, ChatConfig};
use chat_types::event::ChatEvent;
use chat_types::session::{Session, SessionSummary};
use chat_ui::panels::settings::{SaveFeedback, SettingsAction};
use chat_ui::panels::sidebar::SidebarAction;
use chat_ui::panels::{chat, settings, sidebar};
use chat_ui::state::UiState;
use chat_ui::theme;

const CJK_FONT_URL: &str = "NotoSansTC-Regular.otf";

type ConversationSlot = Rc<RefCell<Option<Conversation>>>;

/// The main application state
pub struct ChatApp {
    ui_state: UiState,
    config: ChatConfig,
    event_bus: EventBus,
    /// Filled by the startup task once sessions are loaded
    conversation: ConversationSlot,
    restored_config: Rc<RefCell<Option<ChatConfig>>>,
    /// Where the settings themselves are saved
    config_storage: Rc<dyn StoragePort>,
    /// True from dispatch until `submit` has run
    in_flight: Rc<Cell<bool>>,
    save_feedback: Rc<RefCell<Option<SaveFeedback>>>,
    first_frame: bool,
    font_loaded: Rc<RefCell<bool>>,
}

/// What one frame renders, copied out of the conversation so no borrow is
/// held while panels run.
#[derive(Default)]
struct FrameView {
    ready: bool,
    busy: bool,
    dirty: bool,
    summaries: Vec<SessionSummary>,
    active: Option<Session>,
}

impl FrameView {
    fn capture(slot: &ConversationSlot) -> Self {
        let Ok(guard) = slot.try_borrow() else {
            // A turn task is mid-poll; show a busy frame
            return Self { busy: true, ..Self::default() };
        };
        match guard.as_ref() {
            Some(c) => Self {
                ready: true,
                busy: c.is_busy(),
                dirty: c.store().is_dirty(),
                summaries: c.summaries(),
                active: c.active_session().ok().cloned(),
            },
            None => Self::default(),
        }
    }
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let event_bus = EventBus::new();
        let config_storage = auto_detect_storage();

        let app = Self {
            ui_state: UiState::new(),
            config: ChatConfig::default(),
            event_bus: event_bus.clone(),
            conversation: Rc::new(RefCell::new(None)),
            restored_config: Rc::new(RefCell::new(None)),
            config_storage: config_storage.clone(),
            in_flight: Rc::new(Cell::new(false)),
            save_feedback: Rc::new(RefCell::new(None)),
            first_frame: true,
            font_loaded: Rc::new(RefCell::new(false)),
        };

        Self::start_conversation(
            cc.egui_ctx.clone(),
            config_storage,
            event_bus,
            app.conversation.clone(),
            app.restored_config.clone(),
        );

        app
    }

    /// Read the saved config, open the chosen storage and load the sessions (async)
    fn start_conversation(
        ctx: egui::Context,
        config_storage: Rc<dyn StoragePort>,
        event_bus: EventBus,
        slot: ConversationSlot,
        config_slot: Rc<RefCell<Option<ChatConfig>>>,
    ) {
        wasm_bindgen_futures::spawn_local(async move {
            let config = Self::restore_config(config_storage.as_ref()).await;
            let storage = storage_for(&config.storage.backend);
            let store =
                SessionStore::initialize(storage, config.clone(), Rc::new(SystemClock)).await;

            let mut conversation =
                Conversation::new(store, Box::new(LocalResponder::default()), event_bus);
            conversation.set_backend(build_backend(config.backend.as_ref()));

            *slot.borrow_mut() = Some(conversation);
            *config_slot.borrow_mut() = Some(config);
            ctx.request_repaint();
        });
    }

    async fn restore_config(storage: &dyn StoragePort) -> ChatConfig {
        match storage.get(&config_key()).await {
            Ok(Some(data)) => match serde_json::from_slice::<ChatConfig>(&data) {
                Ok(config) => {
                    log::info!("Config restored from storage");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring saved config: {}", e);
                    ChatConfig::default()
                }
            },
            Ok(None) => ChatConfig::default(),
            Err(e) => {
                log::warn!("Could not read saved config: {}", e);
                ChatConfig::default()
            }
        }
    }

    /// Save config to storage (async); the result shows next to the Save button
    fn save_config(&self, ctx: &egui::Context) {
        let json = match serde_json::to_vec(&self.config) {
            Ok(json) => json,
            Err(e) => {
                *self.save_feedback.borrow_mut() = Some(SaveFeedback {
                    message: format!("Save failed: {}", e),
                    success: false,
                });
                return;
            }
        };
        let storage = self.config_storage.clone();
        let feedback = self.save_feedback.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let result = storage.set(&config_key(), &json).await;
            *feedback.borrow_mut() = Some(match result {
                Ok(()) => {
                    log::info!("Config saved to {}", storage.backend_name());
                    SaveFeedback {
                        message: "Saved".to_string(),
                        success: true,
                    }
                }
                Err(e) => {
                    log::warn!("Config save failed: {}", e);
                    SaveFeedback {
                        message: format!("Save failed: {}", e),
                        success: false,
                    }
                }
            });
            ctx.request_repaint();
        });
    }

    /// Push edited settings into the running conversation
    fn apply_settings(&self) {
        let Ok(mut guard) = self.conversation.try_borrow_mut() else {
            log::debug!("Conversation busy, settings apply on next change");
            return;
        };
        if let Some(c) = guard.as_mut() {
            c.apply_config(self.config.clone());
            c.set_backend(build_backend(self.config.backend.as_ref()));
        }
    }

    /// Fetch CJK font from server and install into egui
    fn load_cjk_font(ctx: egui::Context, loaded_flag: Rc<RefCell<bool>>) {
        wasm_bindgen_futures::spawn_local(async move {
            let Some(window) = web_sys::window() else {
                return;
            };
            let resp = match wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(CJK_FONT_URL)).await {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Failed to fetch CJK font: {:?}", e);
                    return;
                }
            };
            let resp: web_sys::Response = resp.into();
            if !resp.ok() {
                log::warn!("CJK font not served (HTTP {}), using default fonts", resp.status());
                return;
            }
            let buf = match resp.array_buffer() {
                Ok(p) => match wasm_bindgen_futures::JsFuture::from(p).await {
                    Ok(b) => b,
                    Err(_) => return,
                },
                Err(_) => return,
            };
            let bytes = js_sys::Uint8Array::new(&buf).to_vec();

            let mut fonts = egui::FontDefinitions::default();
            fonts.font_data.insert(
                "noto_sans_tc".to_owned(),
                egui::FontData::from_owned(bytes).into(),
            );
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .push("noto_sans_tc".to_owned());

            ctx.set_fonts(fonts);
            *loaded_flag.borrow_mut() = true;
            ctx.request_repaint();
            log::info!("CJK font loaded");
        });
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            Self::load_cjk_font(ctx.clone(), self.font_loaded.clone());
            self.first_frame = false;
        }

        if let Some(config) = self.restored_config.borrow_mut().take() {
            self.config = config;
        }

        // Drain events from the conversation
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        let view = FrameView::capture(&self.conversation);
        if view.ready {
            self.ui_state.mark_loaded();
        }
        self.ui_state.sync_busy(self.in_flight.get() || view.busy);
        if view.ready && !view.dirty {
            self.ui_state.clear_persist_warning();
        }
        if self.ui_state.is_busy() {
            ctx.request_repaint();
        }

        // ── Drag and drop ────────────────────────────────────
        let (dropped, files_hovered) = ctx.input(|i| {
            let files: Vec<DroppedFile> = i
                .raw
                .dropped_files
                .iter()
                .map(|f| {
                    let name = if f.name.is_empty() {
                        f.path
                            .as_ref()
                            .and_then(|p| p.file_name())
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default()
                    } else {
                        f.name.clone()
                    };
                    DroppedFile::new(name, f.bytes.as_ref().map(|b| b.len() as u64))
                })
                .collect();
            (files, !i.raw.hovered_files.is_empty())
        });
        if !dropped.is_empty() && self.ui_state.loaded {
            self.dispatch_upload(dropped, ctx);
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(self.ui_state.show_sidebar, "☰")
                    .on_hover_text("Toggle sidebar")
                    .clicked()
                {
                    self.ui_state.show_sidebar = !self.ui_state.show_sidebar;
                }
                ui.label(
                    RichText::new("WASM Chatbot")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                let backend = match &self.config.backend {
                    Some(b) => b.url.as_str(),
                    None => "local only",
                };
                ui.label(
                    RichText::new(format!(
                        "Storage: {} | Replies: {}",
                        self.config.storage.backend.label(),
                        backend
                    ))
                    .color(theme::TEXT_SECONDARY)
                    .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                });
            });
        });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let feedback = self.save_feedback.borrow().clone();
            let mut action = SettingsAction::None;
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    action = settings::settings_panel(ui, &mut self.config, feedback.as_ref());
                });
            match action {
                SettingsAction::None => {}
                SettingsAction::Changed => self.apply_settings(),
                SettingsAction::SaveClicked => {
                    self.apply_settings();
                    self.save_config(ctx);
                }
            }
        }

        // ── Sidebar ──────────────────────────────────────────
        if self.ui_state.show_sidebar {
            let mut action = SidebarAction::None;
            SidePanel::left("sidebar")
                .resizable(true)
                .default_width(220.0)
                .min_width(160.0)
                .show(ctx, |ui| {
                    action = sidebar::sidebar_panel(ui, &mut self.ui_state, &view.summaries);
                });
            self.dispatch_session_action(action, ctx);
        }

        // ── Main content ─────────────────────────────────────
        let mut submitted = None;
        CentralPanel::default().show(ctx, |ui| {
            submitted = chat::chat_panel(ui, &mut self.ui_state, view.active.as_ref(), files_hovered);
        });
        if let Some(text) = submitted {
            self.dispatch_message(text, ctx);
        }
    }
}

impl ChatApp {
    /// Run one turn (async): submit, optional backend, thinking delay, append
    fn dispatch_message(&mut self, text: String, ctx: &egui::Context) {
        self.in_flight.set(true);
        self.ui_state.sync_busy(true);

        let slot = self.conversation.clone();
        let in_flight = self.in_flight.clone();
        let delay_ms = self.config.thinking_delay_ms;
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let submitted = {
                let mut guard = slot.borrow_mut();
                match guard.as_mut() {
                    Some(c) => match c.submit(&text).await {
                        Ok(turn) => turn.map(|t| (t, c.backend())),
                        Err(e) => {
                            log::warn!("Message not sent: {}", e);
                            c.event_bus().emit(ChatEvent::Error { message: e.to_string() });
                            None
                        }
                    },
                    None => {
                        log::warn!("Conversation not ready, message dropped");
                        None
                    }
                }
            };
            in_flight.set(false);

            if let Some((mut turn, backend)) = submitted {
                ctx.request_repaint();
                turn.resolve(backend.as_deref()).await;
                TimeoutFuture::new(delay_ms).await;
                if let Some(c) = slot.borrow_mut().as_mut() {
                    c.complete(turn).await;
                }
            }
            ctx.request_repaint();
        });
    }

    /// Record dropped files in the active session (async)
    fn dispatch_upload(&self, files: Vec<DroppedFile>, ctx: &egui::Context) {
        let slot = self.conversation.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Some(c) = slot.borrow_mut().as_mut() {
                if let Err(e) = c.upload(&files).await {
                    log::warn!("Upload ignored: {}", e);
                    c.event_bus().emit(ChatEvent::Error { message: e.to_string() });
                }
            }
            ctx.request_repaint();
        });
    }

    /// Apply a sidebar click to the conversation (async)
    fn dispatch_session_action(&self, action: SidebarAction, ctx: &egui::Context) {
        if action == SidebarAction::None {
            return;
        }
        let slot = self.conversation.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Some(c) = slot.borrow_mut().as_mut() {
                match action {
                    SidebarAction::None => {}
                    SidebarAction::NewChat => {
                        c.new_session().await;
                    }
                    SidebarAction::Switch(id) => {
                        if let Err(e) = c.switch_to(id).await {
                            log::warn!("Switch failed: {}", e);
                            c.event_bus().emit(ChatEvent::Error { message: e.to_string() });
                        }
                    }
                    SidebarAction::Delete(id) => c.delete_session(id).await,
                    SidebarAction::ClearAll => c.clear_all().await,
                }
            }
            ctx.request_repaint();
        });
    }
}

/// The config is always saved under the default key so it can be found
/// before any config is loaded.
fn config_key() -> String {
    ChatConfig::default().storage.config_key
}

fn build_backend(config: Option<&BackendConfig>) -> Option<Rc<dyn ReplyBackendPort>> {
    let config = config?;
    match HttpReplyBackend::new(config.clone()) {
        Ok(backend) => {
            log::info!("Remote replies via {}", config.url);
            Some(Rc::new(backend))
        }
        Err(e) => {
            log::warn!("Remote backend disabled: {}", e);
            None
        }
    }
}
