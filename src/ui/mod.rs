// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
//
// Disposition commune à tous les écrans :
//   ┌ header : onglets + utilisateur connecté ┐
//   │ contenu de l'écran courant              │
//   └ footer : raccourcis / chargement        ┘
// puis, par-dessus, la popup éventuelle (formulaire, confirmation, message).
// ============================================================================

pub mod account;  // Profil, connexion, articles publiés
pub mod detail;   // Fiche article
pub mod events;   // Gestion des événements clavier
pub mod market;   // Liste des articles
pub mod orders;   // Mes achats / mes ventes
pub mod popup;    // Formulaires, confirmations et messages

pub use events::{Event, EventHandler};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Screen, ViewState};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le compilateur garantit que chaque écran a son rendu
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Contenu
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    render_header(frame, app, chunks[0]);

    match app.current_screen {
        Screen::Market => market::render(frame, app, chunks[1]),
        Screen::Detail => detail::render(frame, app, chunks[1]),
        Screen::Orders => orders::render(frame, app, chunks[1]),
        Screen::Account => account::render(frame, app, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);

    // Une seule popup à la fois, la plus prioritaire d'abord
    if let Some(notice) = &app.notice {
        popup::render_notice(frame, notice);
    } else if let Some(confirmation) = &app.confirmation {
        popup::render_confirmation(frame, confirmation);
    } else if let Some(input) = &app.input {
        popup::render_form(frame, &input.form);
    }
}

/// Onglets à gauche, utilisateur et solde à droite
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" OpenOtk Market ");

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(block.inner(area));
    frame.render_widget(block, area);

    let titles: Vec<Line> = Screen::TABS
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!("{} {}", i + 1, screen.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.current_screen.tab_index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let user_line = match &app.user {
        Some(user) => Line::from(vec![
            Span::styled(user.username.clone(), Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled(
                user.balance_label(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled("Non connecté", Style::default().fg(Color::Gray))),
    };
    frame.render_widget(Paragraph::new(user_line).alignment(Alignment::Right), chunks[1]);
}

/// Raccourcis de l'écran courant, ou confirmation de sortie / chargement
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(message) = app.loading_message.as_deref().filter(|_| app.is_loading) {
        Line::from(Span::styled(
            format!("⏳ {}", message),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(shortcuts(app))
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Raccourcis propres à chaque écran
fn shortcuts(app: &App) -> Vec<Span<'static>> {
    let mut hints: Vec<(String, &'static str)> = vec![("q".into(), "Quitter"), ("Tab".into(), "Onglet")];

    let screen_hints: &[(&str, &'static str)] = match app.current_screen {
        Screen::Market => &[("↑↓", "Naviguer"), ("Enter", "Voir"), ("/", "Rechercher"), ("r", "Tout")],
        Screen::Detail => &[("b", "Acheter"), ("r", "Recharger"), ("Esc", "Retour")],
        Screen::Orders if app.is_logged_in() => &[("↑↓", "Naviguer"), ("t", "Achats/Ventes"), ("r", "Recharger")],
        Screen::Orders => &[],
        Screen::Account if app.is_logged_in() => {
            &[("c", "Recharger"), ("p", "Publier"), ("r", "Actualiser"), ("o", "Déconnexion")]
        }
        Screen::Account => &[("l", "Connexion"), ("n", "Inscription")],
    };
    hints.extend(screen_hints.iter().map(|(key, label)| (key.to_string(), *label)));

    // Actions de la commande sélectionnée, filtrées par la matrice
    if app.current_screen == Screen::Orders {
        for action in app.selected_order_actions() {
            hints.push((action.key().to_string(), action.label()));
        }
    }

    hints
        .into_iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(
                    format!("[{}]", key),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}  ", label)),
            ]
        })
        .collect()
}

/// Contenu de substitution pour une zone qui n'est pas (encore) chargée
///
/// Retourne None si la zone est chargée : l'écran dessine alors ses données.
pub(crate) fn placeholder<T>(state: &ViewState<T>) -> Option<Paragraph<'static>> {
    let (text, color) = match state {
        ViewState::Loaded(_) => return None,
        ViewState::Idle => (String::new(), Color::Gray),
        ViewState::Loading => ("Chargement...".to_string(), Color::Yellow),
        ViewState::Failed(message) => (message.clone(), Color::Red),
    };

    Some(
        Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, Style::default().fg(color)))])
            .alignment(Alignment::Center),
    )
}

/// Message centré pour une liste vide ou un écran inaccessible
pub(crate) fn empty_message(text: &str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(text.to_string(), Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
}

/// Ligne sélectionnée d'une liste (appliquée par-dessus le style de la ligne)
pub(crate) const SELECTED_STYLE: Style = Style::new().add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Order, OrderStatus, Role, User};
    use crate::worker::{AppResult, Notice};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_market_lists_products() {
        let mut app = App::default();
        app.apply(AppResult::Products(Ok(vec![Item {
            id: 4,
            name: "Lampe".to_string(),
            description: String::new(),
            price: 15.5,
            stock: 3,
            seller_id: 9,
            available: true,
            create_time: None,
        }])));

        let screen = draw(&app);
        assert!(screen.contains("Lampe"));
        assert!(screen.contains("¥15.50"));
    }

    #[test]
    fn test_failed_load_shows_message() {
        let mut app = App::default();
        app.apply(AppResult::Products(Err("Échec du chargement des articles".to_string())));
        assert!(draw(&app).contains("Échec du chargement des articles"));
    }

    #[test]
    fn test_header_shows_balance_and_notice_popup() {
        let mut app = App::new(Some(alice()));
        app.notice = Some(Notice::info("Connexion réussie !"));

        let screen = draw(&app);
        assert!(screen.contains("¥42.00"));
        assert!(screen.contains("Connexion réussie !"));
    }

    fn product(id: i64) -> Item {
        Item {
            id,
            name: format!("Produit{:02}", id),
            description: String::new(),
            price: 1.0,
            stock: 5,
            seller_id: 9,
            available: true,
            create_time: None,
        }
    }

    fn alice() -> User {
        User {
            id: 2,
            username: "alice".to_string(),
            email: String::new(),
            phone: String::new(),
            balance: 42.0,
        }
    }

    #[test]
    fn test_market_scrolls_to_selected_product() {
        let mut app = App::default();
        app.apply(AppResult::Products(Ok((1..=40).map(product).collect())));
        for _ in 0..35 {
            app.navigate_down();
        }
        assert_eq!(app.selected_product().map(|item| item.id), Some(36));

        let screen = draw(&app);
        assert!(screen.contains("Produit36"));
        assert!(!screen.contains("Produit01"));
    }

    #[test]
    fn test_orders_scroll_to_selected_order() {
        let mut app = App::new(Some(alice()));
        app.show(Screen::Orders);
        let orders = (1..=40)
            .map(|id| Order {
                id,
                item_id: 900 + id,
                buyer_id: 2,
                seller_id: 9,
                quantity: 1,
                total_price: 1.0,
                status: OrderStatus::Completed,
                create_time: None,
            })
            .collect();
        app.apply(AppResult::Orders { role: Role::Buyer, orders: Ok(orders) });
        for _ in 0..35 {
            app.navigate_down();
        }

        let screen = draw(&app);
        assert!(screen.contains("article #936"));
        assert!(!screen.contains("article #901"));
    }
}
