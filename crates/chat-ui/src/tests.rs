#[cfg(test)]
mod tests {
    use crate::markdown::*;
    use crate::state::*;
    use chat_types::event::ChatEvent;
    use chat_types::session::SessionId;

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert!(state.input_text.is_empty());
        assert!(!state.thinking);
        assert!(!state.loaded);
        assert!(!state.accepts_input());
        assert!(state.show_sidebar);
        assert!(!state.show_settings);
        assert!(!state.confirm_clear);
        assert_eq!(state.status_text, "Loading chats...");
        assert!(state.persist_warning.is_none());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_ui_state_input_locked_until_loaded() {
        let mut state = UiState::new();
        state.mark_loaded();
        assert!(state.accepts_input());
        assert_eq!(state.status_text, "Ready");

        state.sync_busy(true);
        assert!(!state.accepts_input());
        state.sync_busy(false);
        assert!(state.accepts_input());

        // Later frames keep the status set by events
        state.process_events(vec![ChatEvent::HistoryCleared]);
        state.mark_loaded();
        assert_eq!(state.status_text, "History cleared");
    }

    #[test]
    fn test_ui_state_turn_lifecycle() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::TurnStart {
            turn_id: 1,
            session_id: SessionId(7),
        }]);
        assert!(state.is_busy());
        assert_eq!(state.status_text, "Thinking...");

        state.process_events(vec![
            ChatEvent::ReplyReady {
                session_id: SessionId(7),
                text: "8".to_string(),
            },
            ChatEvent::TurnEnd { turn_id: 1 },
        ]);
        assert!(!state.is_busy());
        assert_eq!(state.status_text, "Ready");
    }

    #[test]
    fn test_ui_state_sync_busy() {
        let mut state = UiState::new();
        state.sync_busy(true);
        assert!(state.is_busy());
        assert_eq!(state.status_text, "Thinking...");
        state.sync_busy(false);
        assert!(!state.is_busy());
        assert_eq!(state.status_text, "Ready");
    }

    #[test]
    fn test_ui_state_sync_busy_keeps_error_text() {
        let mut state = UiState::new();
        state.sync_busy(true);
        state.process_events(vec![ChatEvent::Error {
            message: "A reply is still pending".to_string(),
        }]);
        state.sync_busy(false);
        assert_eq!(state.status_text, "Error: A reply is still pending");
    }

    #[test]
    fn test_ui_state_persist_warning() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::PersistFailed {
            message: "QuotaExceededError".to_string(),
        }]);
        assert_eq!(state.persist_warning.as_deref(), Some("QuotaExceededError"));
        assert!(!state.is_busy());
        state.clear_persist_warning();
        assert!(state.persist_warning.is_none());
    }

    #[test]
    fn test_ui_state_history_cleared_resets_confirm() {
        let mut state = UiState::new();
        state.confirm_clear = true;
        state.process_events(vec![ChatEvent::HistoryCleared]);
        assert!(!state.confirm_clear);
        assert_eq!(state.status_text, "History cleared");
    }

    #[test]
    fn test_ui_state_error() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::Error {
            message: "store reset".to_string(),
        }]);
        assert_eq!(state.status_text, "Error: store reset");
    }

    #[test]
    fn test_ui_state_default() {
        let state = UiState::default();
        assert!(!state.loaded);
    }

    // ─── Markdown Tests ──────────────────────────────────────

    #[test]
    fn test_markdown_plain() {
        assert_eq!(parse_inline("hello"), vec![Segment::Plain("hello".to_string())]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn test_markdown_bold() {
        assert_eq!(
            parse_inline("5+3 = **8**"),
            vec![
                Segment::Plain("5+3 = ".to_string()),
                Segment::Bold("8".to_string()),
            ]
        );
        assert_eq!(
            parse_inline("**HTML** stands for"),
            vec![
                Segment::Bold("HTML".to_string()),
                Segment::Plain(" stands for".to_string()),
            ]
        );
    }

    #[test]
    fn test_markdown_code() {
        assert_eq!(
            parse_inline("try `12 * 7` now"),
            vec![
                Segment::Plain("try ".to_string()),
                Segment::Code("12 * 7".to_string()),
                Segment::Plain(" now".to_string()),
            ]
        );
    }

    #[test]
    fn test_markdown_bold_inside_code_is_literal() {
        assert_eq!(
            parse_inline("`**x**`"),
            vec![Segment::Code("**x**".to_string())]
        );
    }

    #[test]
    fn test_markdown_unclosed_markers_are_text() {
        assert_eq!(
            parse_inline("2 ** 3 and `x"),
            vec![Segment::Plain("2 ** 3 and `x".to_string())]
        );
        assert_eq!(parse_inline("****"), vec![Segment::Plain("****".to_string())]);
    }

    #[test]
    fn test_markdown_multibyte() {
        assert_eq!(
            parse_inline("你好 **世界** 🌍"),
            vec![
                Segment::Plain("你好 ".to_string()),
                Segment::Bold("世界".to_string()),
                Segment::Plain(" 🌍".to_string()),
            ]
        );
    }
}
