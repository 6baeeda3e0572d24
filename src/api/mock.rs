//! Transport simulé pour les tests.
//!
//! Rejoue des réponses JSON préparées par route (méthode + chemin) et
//! enregistre chaque requête reçue pour les assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::transport::{HttpMethod, Transport};

/// Requête enregistrée par le mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    NetworkError,
}

/// Transport de test, clonable (état partagé)
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<(HttpMethod, String), Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prépare la réponse JSON d'une route
    pub fn with_response(self, method: HttpMethod, path: &str, body: Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Reply::Json(body));
        self
    }

    /// Fait échouer une route comme une panne réseau
    pub fn with_network_error(self, method: HttpMethod, path: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Reply::NetworkError);
        self
    }

    /// Toutes les requêtes reçues, dans l'ordre
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Chemins des requêtes reçues, dans l'ordre
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body,
        });

        let reply = self
            .routes
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .cloned();

        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::NetworkError) => Err(anyhow!("connection refused")),
            None => Err(anyhow!("no mock route for {} {}", method.as_str(), path)),
        }
    }
}
