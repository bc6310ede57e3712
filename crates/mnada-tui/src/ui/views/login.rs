use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::render::{centered_rect_fixed, logo_lines};
use crate::ui::styles;

use super::{button_line, field_line, masked};

const LABEL_WIDTH: usize = 8;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.login_error.is_some() { 14 } else { 12 };
    let dialog = centered_rect_fixed(46, height, area);
    frame.render_widget(Clear, dialog);

    let mut lines = logo_lines();
    lines.push(Line::from(""));
    lines.push(field_line(
        "Username",
        &app.login_username,
        app.login_focus == LoginFocus::Username,
        LABEL_WIDTH,
    ));
    lines.push(field_line(
        "Password",
        &masked(&app.login_password),
        app.login_focus == LoginFocus::Password,
        LABEL_WIDTH,
    ));
    lines.push(Line::from(""));
    lines.push(button_line(
        "Login",
        app.login_pending.then_some("Logging in..."),
        app.login_focus == LoginFocus::Button,
        12,
    ));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .title(" Login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, dialog);
}
