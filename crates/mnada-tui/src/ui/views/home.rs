use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::render::logo_lines;
use crate::ui::styles;

use super::client;

/// Logo, sign-in hints, and the public auction catalog below them.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(6)])
        .split(area);

    render_banner(frame, app, chunks[0]);
    client::render(frame, app, chunks[1]);
}

fn render_banner(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Bid on vehicles, land, art, antiques and more.",
        styles::list_item_style(),
    )));
    lines.push(Line::from(""));

    let role = app.role();
    if role.is_authenticated() {
        lines.push(Line::from(vec![
            Span::styled("Signed in as ", styles::muted_style()),
            Span::styled(role.display_name(), styles::highlight_style()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("[d]", styles::help_key_style()),
            Span::styled(format!(" {}   ", role.dashboard().title()), styles::help_desc_style()),
            Span::styled("[o]", styles::help_key_style()),
            Span::styled(" Logout", styles::help_desc_style()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("[l]", styles::help_key_style()),
            Span::styled(" Login   ", styles::help_desc_style()),
            Span::styled("[r]", styles::help_key_style()),
            Span::styled(" Register", styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
