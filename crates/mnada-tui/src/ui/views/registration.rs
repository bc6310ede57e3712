use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, RegistrationFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{button_line, field_line, masked};

const LABEL_WIDTH: usize = 8;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let dialog = centered_rect_fixed(52, 15, area);
    frame.render_widget(Clear, dialog);

    let form = &app.registration;
    let focus = app.registration_focus;

    let role_focused = focus == RegistrationFocus::Role;
    let role_value = if role_focused {
        format!("◀ {} ▶", form.role.display_name())
    } else {
        form.role.display_name().to_string()
    };

    let mut lines = vec![
        Line::from(""),
        field_line("Username", &form.username, focus == RegistrationFocus::Username, LABEL_WIDTH),
        field_line("Email", &form.email, focus == RegistrationFocus::Email, LABEL_WIDTH),
        field_line(
            "Password",
            &masked(&form.password),
            focus == RegistrationFocus::Password,
            LABEL_WIDTH,
        ),
        Line::from(vec![
            Span::styled(format!("  {:>width$}: ", "Role", width = LABEL_WIDTH), styles::muted_style()),
            Span::styled(role_value, styles::field_style(role_focused)),
        ]),
        Line::from(""),
        button_line(
            "Register",
            app.registration_pending.then_some("Registering..."),
            focus == RegistrationFocus::Button,
            16,
        ),
        Line::from(""),
    ];

    if let Some(ref notice) = app.registration_notice {
        lines.push(Line::from(Span::styled(format!(" {}", notice), styles::success_style())));
    } else if let Some(ref error) = app.registration_error {
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    } else {
        lines.push(Line::from(Span::styled(
            " ←/→ changes the role. Esc returns home.",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Create an account ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, dialog);
}
