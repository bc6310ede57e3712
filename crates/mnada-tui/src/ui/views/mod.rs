//! Content rendering for each navigable view.

pub mod admin;
pub mod auctioneer;
pub mod client;
pub mod home;
pub mod login;
pub mod registration;

use ratatui::text::{Line, Span};

use super::styles;

/// One labelled input row: `Label: [value▌]`
pub fn field_line(label: &str, value: &str, focused: bool, label_width: usize) -> Line<'static> {
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::styled(
            format!("  {:>width$}: [", label, width = label_width),
            styles::muted_style(),
        ),
        Span::styled(format!("{}{}", value, cursor), styles::field_style(focused)),
        Span::styled("]", styles::muted_style()),
    ])
}

/// A button row; `label` is replaced by `busy` while a request is in flight.
pub fn button_line(label: &str, busy: Option<&str>, focused: bool, indent: usize) -> Line<'static> {
    let text = match (busy, focused) {
        (Some(busy), _) => format!(" {} ", busy),
        (None, true) => format!(" ▶ {} ◀ ", label),
        (None, false) => format!("   {}   ", label),
    };
    let style = if busy.is_some() {
        styles::muted_style()
    } else {
        styles::field_style(focused)
    };
    Line::from(vec![
        Span::raw(format!("{}[", " ".repeat(indent))),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

/// Password fields show one asterisk per character
pub fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}
