use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use mnada_core::forms::DATETIME_FORMAT;
use mnada_core::timer::clock_display;
use mnada_core::utils::{format_price, truncate_string};

use crate::app::{App, Focus, ItemField};
use crate::ui::styles;

use super::{button_line, field_line};

const LABEL_WIDTH: usize = 12;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_item_form(frame, app, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(chunks[1]);

    render_clock(frame, app, right[0]);
    render_submitted(frame, app, right[1]);
}

fn field_value(app: &App, field: ItemField) -> String {
    let draft = &app.item_draft;
    match field {
        ItemField::Name => draft.name.clone(),
        ItemField::Description => draft.description.clone(),
        ItemField::Images => draft.images.clone(),
        ItemField::StartingBid => draft.starting_bid.clone(),
        ItemField::Category => match draft.category {
            Some(category) => category.display_name().to_string(),
            None => "(choose with ←/→)".to_string(),
        },
        ItemField::StartDate => draft.start_date.clone(),
        ItemField::EndDate => draft.end_date.clone(),
        ItemField::Submit => String::new(),
    }
}

fn render_item_form(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.auctioneer_focus == Focus::Form;
    let value_width = (area.width as usize).saturating_sub(LABEL_WIDTH + 10).max(8);

    let mut lines = vec![Line::from("")];
    for field in ItemField::ALL {
        if field == ItemField::Submit {
            continue;
        }
        let focused = editing && app.item_field == field;
        let value = truncate_string(&field_value(app, field), value_width);
        lines.push(field_line(field.label(), &value, focused, LABEL_WIDTH));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  Images: comma-separated. Dates: {}", DATETIME_FORMAT.replace('%', "")),
        styles::muted_style(),
    )));
    lines.push(Line::from(""));
    lines.push(button_line(
        "Submit for approval",
        app.item_pending.then_some("Submitting..."),
        editing && app.item_field == ItemField::Submit,
        LABEL_WIDTH,
    ));

    if let Some(ref error) = app.item_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    if !editing {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  [n]", styles::help_key_style()),
            Span::styled(" edit the form", styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .title(" New auction item ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(editing));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_clock(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let paragraph = Paragraph::new(Span::styled(clock_display(app.clock), styles::highlight_style()))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_submitted(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.auctioneer_focus == Focus::List;
    let block = Block::default()
        .title(format!(" Your submissions ({}) ", app.submitted_items.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if app.submitted_items.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "Nothing submitted yet",
            styles::muted_style(),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(26).max(8);
    let items: Vec<ListItem> = app
        .submitted_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let line = Line::from(vec![
                Span::raw(format!(
                    "{:<width$} {:>12} ",
                    truncate_string(&item.name, name_width),
                    format_price(item.starting_bid),
                    width = name_width
                )),
                Span::styled(item.status.to_string(), styles::item_status_style(item.status)),
            ]);
            let style = if focused && i == app.submitted_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
