// ============================================================================
// Écran Commandes : "Mes achats" / "Mes ventes"
// ============================================================================
// Les touches d'action affichées pour chaque commande viennent de la
// matrice (rôle, statut) : une commande terminée n'en propose aucune.
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Tabs},
    Frame,
};

use crate::app::App;
use crate::models::{Order, OrderStatus, Role};
use crate::ui::{empty_message, placeholder, SELECTED_STYLE};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📋 Commandes ");

    if !app.is_logged_in() {
        let message = empty_message("Connectez-vous (onglet 3) pour voir vos commandes");
        frame.render_widget(message.block(block), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(block.inner(area));
    frame.render_widget(block, area);

    let selected_tab = match app.orders_role {
        Role::Buyer => 0,
        Role::Seller => 1,
    };
    let tabs = Tabs::new(vec![Role::Buyer.label(), Role::Seller.label()])
        .select(selected_tab)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    if let Some(paragraph) = placeholder(&app.orders) {
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let orders = app.orders.loaded().map(Vec::as_slice).unwrap_or_default();
    if orders.is_empty() {
        frame.render_widget(empty_message("Aucune commande"), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = orders
        .iter()
        .map(|order| ListItem::new(order_line(order, app.orders_role)).style(status_style(order.status)))
        .collect();

    let list = List::new(items).highlight_style(SELECTED_STYLE);
    let mut state = ListState::default().with_selected(Some(app.selected_order));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

/// Ligne de commande suivie des touches proposées ("[x] Annuler")
fn order_line(order: &Order, role: Role) -> String {
    let actions: Vec<String> = order
        .actions_for(role)
        .iter()
        .map(|action| format!("[{}] {}", action.key(), action.label()))
        .collect();

    format!(" {}  {}", order.display(), actions.join(" "))
}

fn status_style(status: OrderStatus) -> Style {
    let color = match status {
        OrderStatus::Pending => Color::Yellow,
        OrderStatus::Confirmed => Color::Cyan,
        OrderStatus::Completed => Color::Green,
        OrderStatus::Cancelled => Color::DarkGray,
    };
    Style::default().fg(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: 5,
            item_id: 4,
            buyer_id: 2,
            seller_id: 9,
            quantity: 2,
            total_price: 31.0,
            status,
            create_time: None,
        }
    }

    #[test]
    fn test_line_lists_offered_actions() {
        let line = order_line(&order(OrderStatus::Confirmed), Role::Buyer);
        assert!(line.contains("[x] Annuler"));
        assert!(line.contains("[f] Terminer"));

        let line = order_line(&order(OrderStatus::Completed), Role::Buyer);
        assert!(!line.contains('['));
    }
}
