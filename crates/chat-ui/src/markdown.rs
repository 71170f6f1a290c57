//! Minimal inline Markdown: `**bold**` and `` `code` ``. Everything else is
//! shown as typed. Unclosed markers are literal text.

use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId};

use crate::theme::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Bold(String),
    Code(String),
}

const BOLD: &str = "**";
const CODE: &str = "`";

pub fn parse_inline(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let bold_at = rest.find(BOLD);
        let code_at = rest.find(CODE);
        let (pos, marker) = match (bold_at, code_at) {
            (Some(b), Some(c)) if c < b => (c, CODE),
            (Some(b), _) => (b, BOLD),
            (None, Some(c)) => (c, CODE),
            (None, None) => {
                push_plain(&mut segments, rest);
                break;
            }
        };

        let body_start = pos + marker.len();
        match rest[body_start..].find(marker) {
            Some(len) if len > 0 => {
                push_plain(&mut segments, &rest[..pos]);
                let body = rest[body_start..body_start + len].to_string();
                segments.push(if marker == BOLD { Segment::Bold(body) } else { Segment::Code(body) });
                rest = &rest[body_start + len + marker.len()..];
            }
            _ => {
                // Unclosed or empty span: keep the marker as text
                push_plain(&mut segments, &rest[..body_start]);
                rest = &rest[body_start..];
            }
        }
    }
    segments
}

fn push_plain(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Plain(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Plain(text.to_string()));
    }
}

/// Build a wrapped label layout for a chat message.
pub fn layout_job(text: &str, color: Color32) -> LayoutJob {
    let mut job = LayoutJob::default();
    for segment in parse_inline(text) {
        let (body, format) = match segment {
            Segment::Plain(body) => (body, TextFormat {
                font_id: FontId::proportional(MESSAGE_FONT_SIZE),
                color,
                ..Default::default()
            }),
            Segment::Bold(body) => (body, TextFormat {
                font_id: FontId::proportional(MESSAGE_FONT_SIZE),
                color: TEXT_STRONG,
                ..Default::default()
            }),
            Segment::Code(body) => (body, TextFormat {
                font_id: FontId::monospace(MESSAGE_FONT_SIZE - 1.0),
                color: CODE_FG,
                background: BG_SURFACE,
                ..Default::default()
            }),
        };
        job.append(&body, 0.0, format);
    }
    job
}
