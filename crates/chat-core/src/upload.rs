//! Drag-and-drop upload stub. Files are acknowledged by name and size only;
//! their contents are never read or stored.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    /// Size in bytes, when the browser reports one
    pub size: Option<u64>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, size: Option<u64>) -> Self {
        Self { name: name.into(), size }
    }

    /// The user-side chat line for this file.
    pub fn describe(&self) -> String {
        let name = if self.name.trim().is_empty() { "unnamed file" } else { self.name.trim() };
        match self.size {
            Some(bytes) => format!("📎 Uploaded: {} ({})", name, humanize_size(bytes)),
            None => format!("📎 Uploaded: {}", name),
        }
    }
}

/// Bot acknowledgement for a batch of dropped files.
pub fn acknowledge(files: &[DroppedFile]) -> String {
    match files.len() {
        0 => "I didn't receive any files.".to_string(),
        1 => "Thanks, I received your file. I can't read file contents yet, but you can paste text into the chat.".to_string(),
        n => format!(
            "Thanks, I received {} files. I can't read file contents yet, but you can paste text into the chat.",
            n
        ),
    }
}

pub fn humanize_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}
