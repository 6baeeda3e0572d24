// ============================================================================
// Écran Article : fiche détaillée
// ============================================================================

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::Item;
use crate::ui::placeholder;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📦 Article ");

    if let Some(paragraph) = placeholder(&app.detail) {
        frame.render_widget(paragraph.block(block), area);
        return;
    }

    if let Some(item) = app.current_item() {
        let paragraph = Paragraph::new(item_lines(item))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

fn item_lines(item: &Item) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let (availability, availability_color) = if item.is_sold_out() {
        ("Indisponible", Color::Red)
    } else {
        ("Disponible", Color::Green)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            item.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Prix      : ", label),
            Span::styled(
                item.price_label(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![Span::styled("Stock     : ", label), Span::raw(item.stock_label())]),
        Line::from(vec![
            Span::styled("Vendeur   : ", label),
            Span::raw(format!("#{}", item.seller_id)),
        ]),
        Line::from(vec![
            Span::styled("État      : ", label),
            Span::styled(availability, Style::default().fg(availability_color)),
        ]),
    ];

    if let Some(created) = &item.create_time {
        lines.push(Line::from(vec![
            Span::styled("Publié le : ", label),
            Span::raw(created.display()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Description", label)));
    lines.push(Line::from(item.description.clone()));
    lines
}
