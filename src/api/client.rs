// ============================================================================
// MarketClient : un appel typé par endpoint du backend
// ============================================================================
// Chaque méthode :
// 1. envoie la requête via le Transport
// 2. déballe l'enveloppe {success, message, data}
// 3. désérialise le résultat vers le type Rust attendu
//
// CONCEPT RUST : Générique sur un trait
// - MarketClient<T: Transport> fonctionne avec HttpTransport (production)
//   comme avec un transport simulé (tests), sans coût à l'exécution
// ============================================================================

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::envelope::{decode, unwrap_envelope};
use super::transport::{HttpMethod, Transport};
use crate::models::{
    Item, LoginRequest, NewItem, NewOrder, Order, OrderAction, RegisterRequest, User,
};

/// Client typé de l'API du marché
#[derive(Debug, Clone)]
pub struct MarketClient<T: Transport> {
    transport: T,
}

impl<T: Transport> MarketClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    // ========================================================================
    // Plomberie commune
    // ========================================================================

    /// Envoie une requête et retourne la charge utile déballée
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value> {
        let raw = self.transport.request(method, path, query, body).await?;
        Ok(unwrap_envelope(raw)?)
    }

    /// GET + désérialisation
    async fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<R> {
        let value = self.call(HttpMethod::Get, path, query, None).await?;
        Ok(decode(value)?)
    }

    /// POST d'un corps JSON, résultat ignoré
    async fn post<B: Serialize>(&self, path: &str, query: &[(&str, String)], body: Option<&B>) -> Result<Value> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .context("Échec de la sérialisation du corps de requête")?;
        self.call(HttpMethod::Post, path, query, body).await
    }

    // ========================================================================
    // Articles
    // ========================================================================

    /// GET /items
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let items: Vec<Item> = self.get("/items", &[]).await?;
        debug!(count = items.len(), "Fetched items");
        Ok(items)
    }

    /// GET /items/search?keyword=
    pub async fn search_items(&self, keyword: &str) -> Result<Vec<Item>> {
        let items: Vec<Item> = self
            .get("/items/search", &[("keyword", keyword.to_string())])
            .await?;
        debug!(keyword = %keyword, count = items.len(), "Searched items");
        Ok(items)
    }

    /// GET /items/{id}
    pub async fn get_item(&self, item_id: i64) -> Result<Item> {
        self.get(&format!("/items/{}", item_id), &[]).await
    }

    /// GET /items/seller/{id}
    pub async fn items_by_seller(&self, seller_id: i64) -> Result<Vec<Item>> {
        self.get(&format!("/items/seller/{}", seller_id), &[]).await
    }

    /// POST /items
    pub async fn publish_item(&self, item: &NewItem) -> Result<()> {
        self.post("/items", &[], Some(item)).await?;
        info!(name = %item.name, seller = item.seller_id, "Item published");
        Ok(())
    }

    // ========================================================================
    // Authentification
    // ========================================================================

    /// POST /auth/login
    ///
    /// L'utilisateur est lu dans le champ `user` de la réponse, ou à défaut
    /// dans la charge utile elle-même (`data`).
    pub async fn login(&self, request: &LoginRequest) -> Result<User> {
        let value = self.post("/auth/login", &[], Some(request)).await?;
        let user_value = match value.get("user") {
            Some(user) if !user.is_null() => user.clone(),
            _ => value,
        };
        Ok(decode(user_value)?)
    }

    /// POST /auth/register
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.post("/auth/register", &[], Some(request)).await?;
        Ok(())
    }

    /// POST /auth/logout?userId=
    pub async fn logout(&self, user_id: i64) -> Result<()> {
        self.post::<Value>("/auth/logout", &[("userId", user_id.to_string())], None)
            .await?;
        Ok(())
    }

    // ========================================================================
    // Utilisateurs
    // ========================================================================

    /// GET /users/{id}
    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        self.get(&format!("/users/{}", user_id), &[]).await
    }

    /// POST /users/{id}/recharge?amount=
    pub async fn recharge(&self, user_id: i64, amount: f64) -> Result<()> {
        self.post::<Value>(
            &format!("/users/{}/recharge", user_id),
            &[("amount", amount.to_string())],
            None,
        )
        .await?;
        Ok(())
    }

    // ========================================================================
    // Commandes
    // ========================================================================

    /// POST /orders
    pub async fn create_order(&self, order: &NewOrder) -> Result<()> {
        self.post("/orders", &[], Some(order)).await?;
        Ok(())
    }

    /// GET /orders/buyer/{id}
    pub async fn buyer_orders(&self, buyer_id: i64) -> Result<Vec<Order>> {
        self.get(&format!("/orders/buyer/{}", buyer_id), &[]).await
    }

    /// GET /orders/seller/{id}
    pub async fn seller_orders(&self, seller_id: i64) -> Result<Vec<Order>> {
        self.get(&format!("/orders/seller/{}", seller_id), &[]).await
    }

    /// POST /orders/{id}/confirm | complete | cancel
    pub async fn order_action(&self, order_id: i64, action: OrderAction) -> Result<()> {
        let path = format!("/orders/{}/{}", order_id, action.path_segment());
        self.post::<Value>(&path, &[], None).await?;
        info!(order = order_id, action = action.path_segment(), "Order transition requested");
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::error::MarketError;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_items_accepts_bare_array() {
        let mock = MockTransport::new().with_response(
            HttpMethod::Get,
            "/items",
            json!([{"id": 1, "name": "Lampe", "price": 15.0, "stock": 2, "sellerId": 7}]),
        );
        let client = MarketClient::new(mock);

        let items = client.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Lampe");
    }

    #[tokio::test]
    async fn test_search_sends_keyword_as_query() {
        let mock = MockTransport::new().with_response(
            HttpMethod::Get,
            "/items/search",
            json!({"success": true, "data": []}),
        );
        let client = MarketClient::new(mock.clone());

        let items = client.search_items("vélo rouge").await.unwrap();
        assert!(items.is_empty());

        let requests = mock.requests();
        assert_eq!(requests[0].query, vec![("keyword".to_string(), "vélo rouge".to_string())]);
    }

    #[tokio::test]
    async fn test_login_reads_user_field() {
        let mock = MockTransport::new().with_response(
            HttpMethod::Post,
            "/auth/login",
            json!({"success": true, "message": "ok", "user": {"id": 3, "username": "alice", "balance": 50.0}}),
        );
        let client = MarketClient::new(mock.clone());

        let user = client
            .login(&LoginRequest {
                username: "alice".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, 3);
        assert_eq!(mock.requests()[0].body, Some(json!({"username": "alice", "password": "secret"})));
    }

    #[tokio::test]
    async fn test_login_reads_data_field() {
        let mock = MockTransport::new().with_response(
            HttpMethod::Post,
            "/auth/login",
            json!({"success": true, "data": {"id": 4, "username": "bob"}}),
        );
        let client = MarketClient::new(mock);

        let user = client
            .login(&LoginRequest {
                username: "bob".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.username, "bob");
    }

    #[tokio::test]
    async fn test_rejected_envelope_surfaces_message() {
        let mock = MockTransport::new().with_response(
            HttpMethod::Post,
            "/orders/5/confirm",
            json!({"success": false, "message": "Commande introuvable"}),
        );
        let client = MarketClient::new(mock);

        let err = client.order_action(5, OrderAction::Confirm).await.unwrap_err();
        match err.downcast_ref::<MarketError>() {
            Some(MarketError::Rejected(msg)) => assert_eq!(msg, "Commande introuvable"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_recharge_path_and_query() {
        let mock = MockTransport::new().with_response(
            HttpMethod::Post,
            "/users/3/recharge",
            json!({"success": true}),
        );
        let client = MarketClient::new(mock.clone());

        client.recharge(3, 25.5).await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.query, vec![("amount".to_string(), "25.5".to_string())]);
        assert_eq!(request.body, None);
    }
}
