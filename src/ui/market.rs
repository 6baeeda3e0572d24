// ============================================================================
// Écran Marché : liste des articles
// ============================================================================
// CONCEPT RATATUI : List widget + ListState
// - Chaque article devient un ListItem
// - ListState porte la sélection : ratatui fait défiler la liste pour
//   garder la ligne sélectionnée visible, puis l'inverse (REVERSED)
// ============================================================================

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::App;
use crate::ui::{empty_message, placeholder, SELECTED_STYLE};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.search_keyword.is_empty() {
        " 🛒 Articles ".to_string()
    } else {
        format!(" 🔍 Recherche : {} ", app.search_keyword)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    if let Some(paragraph) = placeholder(&app.products) {
        frame.render_widget(paragraph.block(block), area);
        return;
    }

    let products = app.products.loaded().map(Vec::as_slice).unwrap_or_default();
    if products.is_empty() {
        frame.render_widget(empty_message("Aucun article").block(block), area);
        return;
    }

    let items: Vec<ListItem> = products
        .iter()
        .map(|item| {
            // Articles épuisés grisés
            let style = if item.is_sold_out() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(" {}", item.display())).style(style)
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(SELECTED_STYLE);
    let mut state = ListState::default().with_selected(Some(app.selected_product));
    frame.render_stateful_widget(list, area, &mut state);
}
