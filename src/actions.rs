// ============================================================================
// Actions utilisateur
// ============================================================================
// Couche "actions" : ce que l'utilisateur déclenche (connexion, achat,
// publication, transitions de commande...). Chaque action :
// 1. vérifie localement ce qui peut l'être (session, saisie, stock)
// 2. appelle le backend via MarketClient
// 3. rafraîchit l'utilisateur de la session si son solde a pu changer
//
// CONCEPT RUST : &mut self
// - Marketplace possède la session ; une seule action s'exécute à la fois
//   (le worker les traite séquentiellement), donc pas de verrou nécessaire
// ============================================================================

use anyhow::Result;
use tracing::{debug, info, instrument, warn};

use crate::api::{MarketClient, Transport};
use crate::error::MarketError;
use crate::models::{
    Item, ItemDraft, LoginRequest, NewOrder, Order, OrderAction, RegisterRequest, User,
};
use crate::session::Session;

/// Client + session : point d'entrée de toutes les actions
pub struct Marketplace<T: Transport> {
    client: MarketClient<T>,
    session: Session,
}

impl<T: Transport> Marketplace<T> {
    pub fn new(client: MarketClient<T>, session: Session) -> Self {
        Self { client, session }
    }

    /// Session courante (lecture seule)
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Utilisateur connecté, ou NotLoggedIn
    fn require_user(&self) -> Result<&User, MarketError> {
        self.session.current_user().ok_or(MarketError::NotLoggedIn)
    }

    // ========================================================================
    // Catalogue
    // ========================================================================

    /// Liste complète des articles
    pub async fn load_products(&self) -> Result<Vec<Item>> {
        self.client.list_items().await
    }

    /// Recherche par mot-clé ; un mot-clé vide recharge toute la liste
    pub async fn search_products(&self, keyword: &str) -> Result<Vec<Item>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.load_products().await;
        }
        self.client.search_items(keyword).await
    }

    /// Ouvre la fiche d'un article et mémorise son identifiant
    pub async fn open_item(&mut self, item_id: i64) -> Result<Item> {
        self.session.set_current_item(item_id);
        self.client.get_item(item_id).await
    }

    // ========================================================================
    // Authentification
    // ========================================================================

    /// Connexion : stocke l'utilisateur renvoyé dans la session
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(MarketError::InvalidInput(
                "Veuillez saisir le nom d'utilisateur et le mot de passe".to_string(),
            )
            .into());
        }

        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let user = self.client.login(&request).await?;
        self.session.set_user(user.clone());

        info!(user = user.id, "Logged in");
        Ok(user)
    }

    /// Inscription (ne connecte pas l'utilisateur)
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<()> {
        request.validate()?;
        self.client.register(&request).await?;
        info!("Registered");
        Ok(())
    }

    /// Déconnexion : prévient le backend puis vide la session quoi qu'il arrive
    pub async fn logout(&mut self) {
        if let Some(user_id) = self.session.user_id() {
            if let Err(e) = self.client.logout(user_id).await {
                warn!(user = user_id, error = ?e, "Logout call failed, clearing session anyway");
            }
        }
        self.session.clear_user();
        info!("Logged out");
    }

    /// Relit l'utilisateur courant depuis le backend
    pub async fn refresh_user(&mut self) -> Result<User> {
        let user_id = self.require_user()?.id;
        let user = self.client.get_user(user_id).await?;
        self.session.set_user(user.clone());
        Ok(user)
    }

    /// Rafraîchissement opportuniste après une action réussie
    ///
    /// L'action elle-même a abouti : un échec ici est seulement journalisé.
    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh_user().await {
            warn!(error = ?e, "Failed to refresh session user");
        }
    }

    // ========================================================================
    // Compte
    // ========================================================================

    /// Recharge le solde puis relit l'utilisateur
    #[instrument(skip(self))]
    pub async fn recharge(&mut self, amount: f64) -> Result<User> {
        let user_id = self.require_user()?.id;
        if !(amount.is_finite() && amount > 0.0) {
            return Err(MarketError::InvalidInput("Montant invalide".to_string()).into());
        }

        self.client.recharge(user_id, amount).await?;
        self.refresh_user().await
    }

    /// Publie un article au nom de l'utilisateur connecté
    pub async fn publish_item(&self, draft: &ItemDraft) -> Result<()> {
        let seller_id = self.require_user()?.id;
        let item = draft.validate(seller_id)?;
        self.client.publish_item(&item).await
    }

    /// Articles publiés par l'utilisateur connecté
    pub async fn my_items(&self) -> Result<Vec<Item>> {
        let seller_id = self.require_user()?.id;
        self.client.items_by_seller(seller_id).await
    }

    // ========================================================================
    // Commandes
    // ========================================================================

    /// Achète `quantity` exemplaires d'un article affiché
    ///
    /// La quantité est contrôlée contre le stock de `item` avant tout appel
    /// réseau ; le backend reste seul juge du stock réel et du solde.
    #[instrument(skip(self, item), fields(item = item.id))]
    pub async fn buy(&mut self, item: &Item, quantity: u32) -> Result<()> {
        let buyer_id = self.require_user()?.id;

        if item.is_sold_out() {
            return Err(MarketError::InvalidInput("Article épuisé".to_string()).into());
        }
        if !item.can_supply(quantity) {
            return Err(MarketError::InsufficientStock {
                requested: quantity,
                stock: item.stock,
            }
            .into());
        }

        let order = NewOrder {
            item_id: item.id,
            buyer_id,
            seller_id: item.seller_id,
            quantity,
            total_price: item.total_for(quantity),
        };
        debug!(?order, "Creating order");
        self.client.create_order(&order).await?;
        info!(item = item.id, quantity, "Order created");

        self.refresh_after_mutation().await;
        Ok(())
    }

    /// Commandes passées par l'utilisateur connecté
    pub async fn buyer_orders(&self) -> Result<Vec<Order>> {
        let user_id = self.require_user()?.id;
        self.client.buyer_orders(user_id).await
    }

    /// Commandes reçues par l'utilisateur connecté
    pub async fn seller_orders(&self) -> Result<Vec<Order>> {
        let user_id = self.require_user()?.id;
        self.client.seller_orders(user_id).await
    }

    /// Demande une transition de commande au backend
    ///
    /// Aucune validation locale : la matrice des actions sert seulement à
    /// masquer les boutons, le backend fait foi.
    pub async fn order_action(&mut self, order_id: i64, action: OrderAction) -> Result<()> {
        self.require_user()?;
        self.client.order_action(order_id, action).await?;
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn confirm_order(&mut self, order_id: i64) -> Result<()> {
        self.order_action(order_id, OrderAction::Confirm).await
    }

    pub async fn cancel_order(&mut self, order_id: i64) -> Result<()> {
        self.order_action(order_id, OrderAction::Cancel).await
    }

    pub async fn complete_order(&mut self, order_id: i64) -> Result<()> {
        self.order_action(order_id, OrderAction::Complete).await
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::HttpMethod;
    use serde_json::json;

    fn alice_json(balance: f64) -> serde_json::Value {
        json!({"id": 7, "username": "alice", "email": "a@example.com", "phone": "13800000000", "balance": balance})
    }

    fn lamp(stock: i64) -> Item {
        Item {
            id: 4,
            name: "Lampe".to_string(),
            description: "Lampe de bureau".to_string(),
            price: 15.5,
            stock,
            seller_id: 9,
            available: stock > 0,
            create_time: None,
        }
    }

    fn market(mock: &MockTransport) -> Marketplace<MockTransport> {
        Marketplace::new(MarketClient::new(mock.clone()), Session::in_memory())
    }

    async fn logged_in(mock: &MockTransport) -> Marketplace<MockTransport> {
        let mut market = market(mock);
        market.login("alice", "secret").await.unwrap();
        market
    }

    fn login_mock() -> MockTransport {
        MockTransport::new().with_response(
            HttpMethod::Post,
            "/auth/login",
            json!({"success": true, "message": "ok", "user": alice_json(100.0)}),
        )
    }

    #[tokio::test]
    async fn test_login_then_orders_use_session_id() {
        let mock = login_mock()
            .with_response(HttpMethod::Get, "/orders/buyer/7", json!({"success": true, "data": []}))
            .with_response(HttpMethod::Get, "/orders/seller/7", json!([]));

        let market = logged_in(&mock).await;
        assert_eq!(market.session().user_id(), Some(7));

        market.buyer_orders().await.unwrap();
        market.seller_orders().await.unwrap();

        assert_eq!(mock.paths(), vec!["/auth/login", "/orders/buyer/7", "/orders/seller/7"]);
    }

    #[tokio::test]
    async fn test_login_succeeds_when_session_file_is_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let mock = login_mock();
        let session = Session::open(&blocker.join("session.json"));
        let mut market = Marketplace::new(MarketClient::new(mock.clone()), session);

        let user = market.login("alice", "secret").await.unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(market.session().user_id(), Some(7));

        market.logout().await;
        assert!(!market.session().is_logged_in());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields_without_request() {
        let mock = MockTransport::new();
        let mut market = market(&mock);

        let err = market.login("  ", "secret").await.unwrap_err();
        assert!(matches!(err.downcast_ref::<MarketError>(), Some(MarketError::InvalidInput(_))));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_session_empty() {
        let mock = MockTransport::new().with_response(
            HttpMethod::Post,
            "/auth/login",
            json!({"success": false, "message": "Mot de passe incorrect"}),
        );
        let mut market = market(&mock);

        let err = market.login("alice", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Mot de passe incorrect");
        assert!(!market.session().is_logged_in());
    }

    #[tokio::test]
    async fn test_buy_over_stock_makes_no_request() {
        let mock = login_mock();
        let mut market = logged_in(&mock).await;
        let before = mock.requests().len();

        let err = market.buy(&lamp(2), 3).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MarketError>(),
            Some(MarketError::InsufficientStock { requested: 3, stock: 2 })
        ));

        let err = market.buy(&lamp(2), 0).await.unwrap_err();
        assert!(err.downcast_ref::<MarketError>().is_some());

        assert_eq!(mock.requests().len(), before);
    }

    #[tokio::test]
    async fn test_buy_requires_login() {
        let mock = MockTransport::new();
        let mut market = market(&mock);

        let err = market.buy(&lamp(5), 1).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<MarketError>(), Some(MarketError::NotLoggedIn)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_buy_posts_order_and_refreshes_balance() {
        let mock = login_mock()
            .with_response(HttpMethod::Post, "/orders", json!({"success": true, "data": {"id": 11}}))
            .with_response(HttpMethod::Get, "/users/7", json!({"success": true, "data": alice_json(69.0)}));
        let mut market = logged_in(&mock).await;

        market.buy(&lamp(5), 2).await.unwrap();

        let order_request = &mock.requests()[1];
        assert_eq!(order_request.path, "/orders");
        assert_eq!(
            order_request.body,
            Some(json!({"itemId": 4, "buyerId": 7, "sellerId": 9, "quantity": 2, "totalPrice": 31.0}))
        );
        assert_eq!(market.session().current_user().map(|u| u.balance), Some(69.0));
    }

    #[tokio::test]
    async fn test_logout_clears_session_even_if_server_fails() {
        let mock = login_mock().with_network_error(HttpMethod::Post, "/auth/logout");
        let mut market = logged_in(&mock).await;

        market.logout().await;

        assert!(!market.session().is_logged_in());
        let logout = &mock.requests()[1];
        assert_eq!(logout.query, vec![("userId".to_string(), "7".to_string())]);
    }

    #[tokio::test]
    async fn test_recharge_refreshes_user() {
        let mock = login_mock()
            .with_response(HttpMethod::Post, "/users/7/recharge", json!({"success": true}))
            .with_response(HttpMethod::Get, "/users/7", json!(alice_json(150.0)));
        let mut market = logged_in(&mock).await;

        let user = market.recharge(50.0).await.unwrap();
        assert_eq!(user.balance, 150.0);

        let err = market.recharge(-1.0).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<MarketError>(), Some(MarketError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_publish_validates_before_request() {
        let mock = login_mock().with_response(HttpMethod::Post, "/items", json!({"success": true}));
        let market = logged_in(&mock).await;

        let bad = ItemDraft {
            name: "L".to_string(),
            description: "desc".to_string(),
            price: "10".to_string(),
            stock: "1".to_string(),
        };
        assert!(market.publish_item(&bad).await.is_err());
        assert_eq!(mock.paths(), vec!["/auth/login"]);

        let good = ItemDraft {
            name: "Lampe".to_string(),
            ..bad
        };
        market.publish_item(&good).await.unwrap();
        assert_eq!(mock.requests()[1].body.as_ref().map(|b| b["sellerId"].clone()), Some(json!(7)));
    }

    #[tokio::test]
    async fn test_order_transitions_hit_expected_paths() {
        let mock = login_mock()
            .with_response(HttpMethod::Post, "/orders/5/confirm", json!({"success": true}))
            .with_response(HttpMethod::Post, "/orders/5/complete", json!({"success": true}))
            .with_response(HttpMethod::Post, "/orders/5/cancel", json!({"success": true}))
            .with_response(HttpMethod::Get, "/users/7", json!(alice_json(100.0)));
        let mut market = logged_in(&mock).await;

        market.confirm_order(5).await.unwrap();
        market.complete_order(5).await.unwrap();
        market.cancel_order(5).await.unwrap();

        let transitions: Vec<String> = mock
            .paths()
            .into_iter()
            .filter(|p| p.starts_with("/orders/"))
            .collect();
        assert_eq!(transitions, vec!["/orders/5/confirm", "/orders/5/complete", "/orders/5/cancel"]);
    }

    #[tokio::test]
    async fn test_empty_search_loads_all() {
        let mock = MockTransport::new().with_response(HttpMethod::Get, "/items", json!([]));
        let market = market(&mock);

        market.search_products("   ").await.unwrap();
        assert_eq!(mock.paths(), vec!["/items"]);
    }

    #[tokio::test]
    async fn test_open_item_remembers_id() {
        let mock = MockTransport::new().with_response(
            HttpMethod::Get,
            "/items/4",
            json!({"id": 4, "name": "Lampe", "price": 15.5, "stock": 2, "sellerId": 9}),
        );
        let mut market = market(&mock);

        let item = market.open_item(4).await.unwrap();
        assert_eq!(item.name, "Lampe");
        assert_eq!(market.session().current_item_id(), Some(4));
    }
}
