// ============================================================================
// Gestion des événements clavier
// ============================================================================
// Traduit une touche en changement d'état de App et en commandes pour le
// worker. Aucune I/O ici : la boucle principale envoie les commandes
// retournées, ce qui rend tout le routage testable sans terminal.
//
// Ordre de priorité :
// 1. popup d'information → n'importe quelle touche la ferme
// 2. confirmation → y / o / Entrée valide, le reste annule
// 3. formulaire ouvert → les touches vont au formulaire
// 4. touches globales (q, Tab, 1-3) puis touches de l'écran courant
// ============================================================================

use tracing::{debug, info};

use crate::app::{App, InputPurpose, Screen};
use crate::error::MarketError;
use crate::models::OrderAction;
use crate::ui::events::{
    get_char_from_event, is_backspace_event, is_backtab_event, is_confirm_event, is_down_event,
    is_enter_event, is_escape_event, is_quit_event, is_tab_event, is_up_event, Event,
};
use crate::worker::AppCommand;

/// Traite un événement et retourne les commandes à envoyer au worker
pub fn handle_event(app: &mut App, event: &Event) -> Vec<AppCommand> {
    let Event::Key(_) = event else {
        return Vec::new();
    };

    if app.notice.is_some() {
        app.dismiss_notice();
        return Vec::new();
    }

    if app.confirmation.is_some() {
        if is_confirm_event(event) {
            info!("User confirmed action");
            return app.confirm().into_iter().collect();
        }
        debug!("User cancelled confirmation");
        app.cancel_confirmation();
        return Vec::new();
    }

    if app.is_in_input_mode() {
        return handle_input_key(app, event);
    }

    // Two-step quit
    if is_quit_event(event) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            info!("User requested quit (awaiting confirmation)");
            app.request_quit();
        }
        return Vec::new();
    }
    app.cancel_quit();

    if is_tab_event(event) {
        let next = app.current_screen.next();
        return switch_screen(app, next);
    }
    match get_char_from_event(event) {
        Some('1') => return switch_screen(app, Screen::Market),
        Some('2') => return switch_screen(app, Screen::Orders),
        Some('3') => return switch_screen(app, Screen::Account),
        _ => {}
    }

    match app.current_screen {
        Screen::Market => handle_market_key(app, event),
        Screen::Detail => handle_detail_key(app, event),
        Screen::Orders => handle_orders_key(app, event),
        Screen::Account => handle_account_key(app, event),
    }
}

/// Change d'écran et recharge ce qu'il affiche
pub fn switch_screen(app: &mut App, screen: Screen) -> Vec<AppCommand> {
    debug!(screen = screen.title(), "Switching screen");
    app.show(screen);

    match screen {
        Screen::Market if app.products.loaded().is_none() => vec![AppCommand::LoadProducts],
        Screen::Orders if app.is_logged_in() => vec![AppCommand::LoadOrders {
            role: app.orders_role,
        }],
        Screen::Account if app.is_logged_in() => {
            vec![AppCommand::RefreshUser, AppCommand::LoadMyItems]
        }
        _ => Vec::new(),
    }
}

fn handle_input_key(app: &mut App, event: &Event) -> Vec<AppCommand> {
    if is_escape_event(event) {
        debug!("User cancelled input");
        app.cancel_input();
        return Vec::new();
    }
    if is_enter_event(event) {
        return app.submit_input();
    }

    let Some(input) = app.input.as_mut() else {
        return Vec::new();
    };
    let form = &mut input.form;

    // Flèches et Tab pour changer de champ ; 'j'/'k' restent des caractères
    if is_tab_event(event) {
        form.next_field();
    } else if is_backtab_event(event) {
        form.previous_field();
    } else if is_backspace_event(event) {
        form.backspace();
    } else if let Some(c) = get_char_from_event(event) {
        form.push_char(c);
    } else if is_up_event(event) {
        form.previous_field();
    } else if is_down_event(event) {
        form.next_field();
    }
    Vec::new()
}

fn handle_market_key(app: &mut App, event: &Event) -> Vec<AppCommand> {
    if is_up_event(event) {
        app.navigate_up();
        return Vec::new();
    }
    if is_down_event(event) {
        app.navigate_down();
        return Vec::new();
    }
    if is_enter_event(event) {
        let Some(item_id) = app.selected_product().map(|item| item.id) else {
            return Vec::new();
        };
        info!(item = item_id, "User opened item");
        app.show(Screen::Detail);
        return vec![AppCommand::OpenItem { item_id }];
    }

    match get_char_from_event(event) {
        Some('/') | Some('s') => {
            app.start_input(InputPurpose::Search);
            Vec::new()
        }
        Some('r') => {
            app.search_keyword.clear();
            vec![AppCommand::LoadProducts]
        }
        _ => Vec::new(),
    }
}

fn handle_detail_key(app: &mut App, event: &Event) -> Vec<AppCommand> {
    if is_escape_event(event) {
        app.show(Screen::Market);
        return Vec::new();
    }

    match get_char_from_event(event) {
        Some('b') => {
            start_purchase(app);
            Vec::new()
        }
        Some('r') => app
            .current_item()
            .map(|item| vec![AppCommand::OpenItem { item_id: item.id }])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Ouvre la saisie de quantité, si l'achat est possible
fn start_purchase(app: &mut App) {
    if !app.is_logged_in() {
        app.show_error(MarketError::NotLoggedIn.to_string());
        app.show(Screen::Account);
        return;
    }

    match app.current_item() {
        None => {}
        Some(item) if item.is_sold_out() => app.show_error("Article épuisé"),
        Some(_) => app.start_input(InputPurpose::BuyQuantity),
    }
}

fn handle_orders_key(app: &mut App, event: &Event) -> Vec<AppCommand> {
    if !app.is_logged_in() {
        return Vec::new();
    }

    if is_up_event(event) {
        app.navigate_up();
        return Vec::new();
    }
    if is_down_event(event) {
        app.navigate_down();
        return Vec::new();
    }

    let Some(c) = get_char_from_event(event) else {
        return Vec::new();
    };
    match c {
        't' => {
            app.toggle_orders_role();
            vec![AppCommand::LoadOrders {
                role: app.orders_role,
            }]
        }
        'r' => vec![AppCommand::LoadOrders {
            role: app.orders_role,
        }],
        c => {
            if let Some(action) = OrderAction::from_key(c) {
                if !app.request_order_action(action) {
                    debug!(?action, "Action not offered for this order");
                }
            }
            Vec::new()
        }
    }
}

fn handle_account_key(app: &mut App, event: &Event) -> Vec<AppCommand> {
    let Some(c) = get_char_from_event(event) else {
        return Vec::new();
    };

    if !app.is_logged_in() {
        match c {
            'l' => app.start_input(InputPurpose::Login),
            'n' => app.start_input(InputPurpose::Register),
            _ => {}
        }
        return Vec::new();
    }

    match c {
        'c' => app.start_input(InputPurpose::Recharge),
        'p' => app.start_input(InputPurpose::Publish),
        'o' => app.request_confirmation("Se déconnecter ?", AppCommand::Logout),
        'r' => return vec![AppCommand::RefreshUser, AppCommand::LoadMyItems],
        _ => {}
    }
    Vec::new()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, Order, OrderStatus, Role, User};
    use crate::worker::AppResult;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn char_key(c: char) -> Event {
        key(KeyCode::Char(c))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, &char_key(c));
        }
    }

    fn user() -> User {
        User {
            id: 2,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: "13800000000".to_string(),
            balance: 100.0,
        }
    }

    fn item(stock: i64) -> Item {
        Item {
            id: 4,
            name: "Lampe".to_string(),
            description: "Bon état".to_string(),
            price: 15.5,
            stock,
            seller_id: 9,
            available: true,
            create_time: None,
        }
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::default();
        handle_event(&mut app, &char_key('q'));
        assert!(app.is_running());
        assert!(app.is_awaiting_quit_confirmation());

        handle_event(&mut app, &char_key('j'));
        assert!(!app.is_awaiting_quit_confirmation());

        handle_event(&mut app, &char_key('q'));
        handle_event(&mut app, &char_key('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_enter_opens_selected_item() {
        let mut app = App::default();
        app.apply(AppResult::Products(Ok(vec![item(3)])));

        let commands = handle_event(&mut app, &key(KeyCode::Enter));
        assert_eq!(commands, vec![AppCommand::OpenItem { item_id: 4 }]);
        assert_eq!(app.current_screen, Screen::Detail);
    }

    #[test]
    fn test_search_form_sends_keyword() {
        let mut app = App::default();
        handle_event(&mut app, &char_key('/'));
        // 'q' est un caractère comme un autre dans un formulaire
        type_text(&mut app, "quilt");

        let commands = handle_event(&mut app, &key(KeyCode::Enter));
        assert_eq!(commands, vec![AppCommand::Search { keyword: "quilt".to_string() }]);
        assert!(app.is_running());
    }

    #[test]
    fn test_buy_requires_login() {
        let mut app = App::default();
        app.show(Screen::Detail);
        app.apply(AppResult::Item(Ok(item(3))));

        let commands = handle_event(&mut app, &char_key('b'));
        assert!(commands.is_empty());
        assert!(app.notice.is_some());
        assert!(!app.is_in_input_mode());
        assert_eq!(app.current_screen, Screen::Account);
    }

    #[test]
    fn test_buy_flow_ends_with_confirmed_command() {
        let mut app = App::new(Some(user()));
        app.show(Screen::Detail);
        app.apply(AppResult::Item(Ok(item(3))));

        handle_event(&mut app, &char_key('b'));
        handle_event(&mut app, &key(KeyCode::Backspace));
        type_text(&mut app, "2");
        assert!(handle_event(&mut app, &key(KeyCode::Enter)).is_empty());
        assert!(app.confirmation.is_some());

        let commands = handle_event(&mut app, &char_key('y'));
        assert_eq!(
            commands,
            vec![AppCommand::Buy {
                item: item(3),
                quantity: 2,
            }]
        );
    }

    #[test]
    fn test_sold_out_item_cannot_be_bought() {
        let mut app = App::new(Some(user()));
        app.show(Screen::Detail);
        app.apply(AppResult::Item(Ok(item(0))));

        handle_event(&mut app, &char_key('b'));
        assert!(!app.is_in_input_mode());
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_notice_swallows_next_key() {
        let mut app = App::default();
        app.show_error("Oups");

        let commands = handle_event(&mut app, &char_key('q'));
        assert!(commands.is_empty());
        assert!(app.notice.is_none());
        assert!(!app.is_awaiting_quit_confirmation());
    }

    #[test]
    fn test_orders_tab_loads_buyer_orders() {
        let mut app = App::new(Some(user()));
        let commands = handle_event(&mut app, &char_key('2'));
        assert_eq!(commands, vec![AppCommand::LoadOrders { role: Role::Buyer }]);

        let commands = handle_event(&mut app, &char_key('t'));
        assert_eq!(commands, vec![AppCommand::LoadOrders { role: Role::Seller }]);
    }

    #[test]
    fn test_seller_confirms_pending_order() {
        let mut app = App::new(Some(user()));
        handle_event(&mut app, &char_key('2'));
        handle_event(&mut app, &char_key('t'));
        app.apply(AppResult::Orders {
            role: Role::Seller,
            orders: Ok(vec![Order {
                id: 5,
                item_id: 4,
                buyer_id: 3,
                seller_id: 2,
                quantity: 1,
                total_price: 15.5,
                status: OrderStatus::Pending,
                create_time: None,
            }]),
        });

        // Annuler n'est pas proposé au vendeur
        handle_event(&mut app, &char_key('x'));
        assert!(app.confirmation.is_none());

        handle_event(&mut app, &char_key('c'));
        let commands = handle_event(&mut app, &key(KeyCode::Enter));
        assert_eq!(
            commands,
            vec![AppCommand::OrderAction {
                order_id: 5,
                action: OrderAction::Confirm,
                role: Role::Seller,
            }]
        );
    }

    #[test]
    fn test_login_form_on_account_screen() {
        let mut app = App::default();
        assert!(handle_event(&mut app, &char_key('3')).is_empty());

        handle_event(&mut app, &char_key('l'));
        type_text(&mut app, "alice");
        handle_event(&mut app, &key(KeyCode::Tab));
        type_text(&mut app, "secret");

        let commands = handle_event(&mut app, &key(KeyCode::Enter));
        assert_eq!(
            commands,
            vec![AppCommand::Login {
                username: "alice".to_string(),
                password: "secret".to_string(),
            }]
        );
    }

    #[test]
    fn test_logout_asks_for_confirmation() {
        let mut app = App::new(Some(user()));
        app.show(Screen::Account);

        assert!(handle_event(&mut app, &char_key('o')).is_empty());
        assert!(handle_event(&mut app, &char_key('n')).is_empty());
        assert!(app.confirmation.is_none());

        handle_event(&mut app, &char_key('o'));
        assert_eq!(handle_event(&mut app, &char_key('y')), vec![AppCommand::Logout]);
    }
}
