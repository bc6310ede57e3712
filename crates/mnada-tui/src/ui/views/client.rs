use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use mnada_core::models::Auction;
use mnada_core::timer::Countdown;
use mnada_core::utils::{format_datetime, format_price, truncate_string};

use crate::app::App;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_auction_list(frame, app, chunks[0]);
    render_auction_detail(frame, app, chunks[1]);
}

fn countdown_text(app: &App, auction: &Auction) -> (String, bool) {
    match auction.end_time {
        Some(end) => {
            let countdown = Countdown::new(end);
            (
                countdown.display(app.countdown_now),
                countdown.is_ended(app.countdown_now),
            )
        }
        None => ("-".to_string(), false),
    }
}

fn render_auction_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Live auctions ({}) ", app.auctions.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if app.auctions.is_empty() {
        let text = if app.auctions_loading {
            "Loading..."
        } else {
            "No auctions right now"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, styles::muted_style())).block(block),
            area,
        );
        return;
    }

    let name_width = (area.width as usize).saturating_sub(32).max(8);
    let items: Vec<ListItem> = app
        .auctions
        .iter()
        .enumerate()
        .map(|(i, auction)| {
            let (remaining, ended) = countdown_text(app, auction);
            let line = Line::from(vec![
                Span::raw(format!(
                    "{:<width$} {:>14} ",
                    truncate_string(&auction.item, name_width),
                    format_price(auction.starting_price),
                    width = name_width
                )),
                Span::styled(format!("{:>12}", remaining), styles::countdown_style(ended)),
            ]);
            let style = if i == app.auction_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.auction_selection));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_auction_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some(auction) = app.selected_auction() else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Select an auction from the list",
                styles::muted_style(),
            ))
            .block(block),
            area,
        );
        return;
    };

    let (remaining, ended) = countdown_text(app, auction);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(auction.item.clone(), styles::title_style())),
        Line::from(""),
        Line::from(Span::styled("Time remaining", styles::muted_style())),
        Line::from(Span::styled(
            remaining,
            styles::countdown_style(ended).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Starting price: ", styles::highlight_style()),
            Span::raw(format_price(auction.starting_price)),
        ]),
    ];
    if let Some(end) = auction.end_time {
        lines.push(Line::from(vec![
            Span::styled("Ends: ", styles::highlight_style()),
            Span::raw(format_datetime(&end)),
        ]));
    }
    if let Some(ref status) = auction.status {
        lines.push(Line::from(vec![
            Span::styled("Status: ", styles::highlight_style()),
            Span::raw(status.clone()),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}
