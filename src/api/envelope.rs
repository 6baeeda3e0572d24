// ============================================================================
// Enveloppe de réponse du backend
// ============================================================================
// Le backend enveloppe (presque) toutes ses réponses :
//
//   {"success": true,  "data": [...]}
//   {"success": true,  "message": "ok", "user": {...}}
//   {"success": false, "message": "Solde insuffisant"}
//
// Certains endpoints (listes d'articles) renvoient directement un tableau,
// sans enveloppe : dans ce cas le corps est retourné tel quel.
// ============================================================================

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{MarketError, DEFAULT_FAILURE_MESSAGE};

/// Déballe une réponse JSON du backend
///
/// - `success: false` → Err(Rejected(message)) ou le message par défaut
/// - `success: true` avec `data` → `data`
/// - `success: true` sans `data` → le corps complet
/// - pas de champ `success` booléen → le corps complet
///
/// Un `data: null` est traité comme absent.
pub fn unwrap_envelope(body: Value) -> Result<Value, MarketError> {
    let success = match body.get("success") {
        Some(Value::Bool(flag)) => *flag,
        _ => return Ok(body),
    };

    if !success {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_FAILURE_MESSAGE);
        return Err(MarketError::Rejected(message.to_string()));
    }

    // CONCEPT RUST : Ownership
    // - body est consommé, on peut donc sortir `data` de la map sans clone
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Null) | None => Ok(Value::Object(map)),
            Some(data) => Ok(data),
        },
        other => Ok(other),
    }
}

/// Convertit une valeur déballée vers le type attendu
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, MarketError> {
    serde_json::from_value(value).map_err(|e| MarketError::Decode(e.to_string()))
}

// ============================================================================
// Tests unitaires
// ============================================================================
