use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use mnada_core::utils::{format_datetime, format_price, truncate_string};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_pending_list(frame, app, chunks[0]);
    render_item_detail(frame, app, chunks[1]);
}

fn render_pending_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Awaiting approval ({}) ", app.pending_items.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.pending_items.is_empty() {
        let text = if app.pending_loading {
            "Loading..."
        } else {
            "No items awaiting approval"
        };
        let paragraph = Paragraph::new(Span::styled(text, styles::muted_style())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(18).max(8);
    let items: Vec<ListItem> = app
        .pending_items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let line = Line::from(format!(
                "{:<width$} {:>12}",
                truncate_string(&item.name, name_width),
                format_price(item.starting_bid),
                width = name_width
            ));
            let style = if i == app.pending_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.pending_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_item_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match app.pending_items.get(app.pending_selection) {
        Some(item) => {
            let mut lines = vec![
                detail_row("Category", item.category.display_name().to_string()),
                detail_row("Starting bid", format_price(item.starting_bid)),
                detail_row("Starts", format_datetime(&item.start_date)),
                detail_row("Ends", format_datetime(&item.end_date)),
                Line::from(vec![
                    Span::styled("Status: ", styles::highlight_style()),
                    Span::styled(item.status.to_string(), styles::item_status_style(item.status)),
                ]),
                Line::from(""),
                Line::from(Span::styled("Description", styles::title_style())),
                Line::from(item.description.clone()),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Images ({})", item.images.len()),
                    styles::title_style(),
                )),
            ];
            lines.extend(
                item.images
                    .iter()
                    .map(|image| Line::from(format!("  {}", image))),
            );
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[a]", styles::help_key_style()),
                Span::styled(" approve   ", styles::help_desc_style()),
                Span::styled("[x]", styles::help_key_style()),
                Span::styled(" reject", styles::help_desc_style()),
            ]));
            (format!(" {} ", item.name), lines)
        }
        None => (
            " No Item Selected ".to_string(),
            vec![Line::from(Span::styled(
                "Select an item from the list",
                styles::muted_style(),
            ))],
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn detail_row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), styles::highlight_style()),
        Span::raw(value),
    ])
}
