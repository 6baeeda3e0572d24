// ============================================================================
// Transport HTTP vers le backend
// ============================================================================
// Un seul point de sortie réseau pour tout le client.
//
// CONCEPTS RUST :
// 1. Trait async (async-trait) : le code métier ne dépend que de Transport,
//    ce qui permet de le tester avec un transport simulé
// 2. reqwest : client HTTP async, corps JSON via serde
// 3. #[instrument] : chaque requête ouvre un span tracing (méthode + chemin)
// ============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::error::MarketError;

/// Méthodes HTTP utilisées par le backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Abstraction de l'envoi d'une requête au backend
///
/// Retourne le corps JSON brut ; le déballage de l'enveloppe est fait
/// par MarketClient.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Envoie une requête et retourne le corps JSON
    ///
    /// # Arguments
    /// * `path` - Chemin relatif à l'URL de base (ex: "/items/42")
    /// * `query` - Paramètres de query string (ex: [("keyword", "vélo")])
    /// * `body` - Corps JSON optionnel
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value>;
}

/// Transport réel basé sur reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Crée un transport vers l'URL de base donnée
    ///
    /// Pas de timeout ni de retry : une requête échouée est simplement
    /// signalée à l'utilisateur, qui peut relancer l'action.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("otkmarket/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL de base configurée
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Construit l'URL complète d'un chemin
    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, method, query, body), fields(method = method.as_str()))]
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value> {
        let url = self.url_for(path);
        debug!(url = %url, params = query.len(), has_body = body.is_some(), "Sending API request");

        let mut builder = self
            .client
            .request(method.into(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(url = %url, error = %e, "API request failed");
            e
        }).context("Échec de la requête HTTP vers le backend")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(url = %url, status = %status, "Backend returned error status");
            return Err(MarketError::Http(status.as_u16()).into());
        }

        let json: Value = response.json().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to parse JSON response");
            MarketError::Decode(e.to_string())
        })?;

        Ok(json)
    }
}
