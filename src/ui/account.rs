// ============================================================================
// Écran Compte : profil, solde et articles publiés
// ============================================================================
// Déconnecté : invitation à se connecter ou à créer un compte.
// Connecté : profil à gauche, articles de l'utilisateur à droite.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::User;
use crate::ui::{empty_message, placeholder};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(user) = &app.user else {
        render_logged_out(frame, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_profile(frame, user, chunks[0]);
    render_my_items(frame, app, chunks[1]);
}

fn render_logged_out(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 👤 Compte ");

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Vous n'êtes pas connecté", Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(vec![Span::styled("[l]", key), Span::raw(" Se connecter")]),
        Line::from(vec![Span::styled("[n]", key), Span::raw(" Créer un compte")]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_profile(frame: &mut Frame, user: &User, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 👤 Profil ");

    let label = Style::default().fg(Color::Gray);
    let text = vec![
        Line::from(""),
        Line::from(vec![Span::styled(" Utilisateur : ", label), Span::raw(user.username.clone())]),
        Line::from(vec![Span::styled(" E-mail      : ", label), Span::raw(user.email.clone())]),
        Line::from(vec![Span::styled(" Téléphone   : ", label), Span::raw(user.phone.clone())]),
        Line::from(vec![
            Span::styled(" Solde       : ", label),
            Span::styled(
                user.balance_label(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_my_items(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 🏷  Mes articles ");

    if let Some(paragraph) = placeholder(&app.my_items) {
        frame.render_widget(paragraph.block(block), area);
        return;
    }

    let items = app.my_items.loaded().map(Vec::as_slice).unwrap_or_default();
    if items.is_empty() {
        let message = empty_message("Aucun article publié ([p] pour publier)");
        frame.render_widget(message.block(block), area);
        return;
    }

    let list: Vec<ListItem> = items
        .iter()
        .map(|item| ListItem::new(format!(" {}", item.display())))
        .collect();
    frame.render_widget(List::new(list).block(block), area);
}
