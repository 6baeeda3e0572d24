// ============================================================================
// Erreurs métier du client
// ============================================================================
// Le reste du crate travaille avec anyhow::Result, mais les cas que l'UI
// (et les tests) doivent distinguer sont typés ici et restent accessibles
// via err.downcast_ref::<MarketError>().
// ============================================================================

/// Message affiché quand le backend refuse sans donner de raison
pub const DEFAULT_FAILURE_MESSAGE: &str = "Échec de la requête";

/// Erreurs du client marketplace
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// Enveloppe `{success: false}` renvoyée par le backend
    #[error("{0}")]
    Rejected(String),

    /// Statut HTTP hors 2xx
    #[error("Erreur HTTP : statut {0}")]
    Http(u16),

    /// Corps JSON inattendu pour le type demandé
    #[error("Réponse illisible : {0}")]
    Decode(String),

    /// Opération qui demande une session utilisateur
    #[error("Veuillez vous connecter d'abord")]
    NotLoggedIn,

    /// Saisie refusée côté client, avant tout appel réseau
    #[error("{0}")]
    InvalidInput(String),

    /// Quantité demandée supérieure au stock affiché
    #[error("Stock insuffisant : {requested} demandé(s), {stock} disponible(s)")]
    InsufficientStock { requested: u32, stock: i64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MarketError {
    /// Indique si l'erreur a été levée localement (aucune requête envoyée)
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            MarketError::NotLoggedIn
                | MarketError::InvalidInput(_)
                | MarketError::InsufficientStock { .. }
        )
    }
}

/// Message à afficher dans la popup d'erreur
///
/// Les erreurs typées gardent leur texte (message du serveur ou validation
/// locale), tout le reste retombe sur le message générique de l'écran.
pub fn user_message(err: &anyhow::Error, generic: &str) -> String {
    match err.downcast_ref::<MarketError>() {
        Some(MarketError::Other(_)) | Some(MarketError::Decode(_)) | Some(MarketError::Http(_)) | None => {
            generic.to_string()
        }
        Some(market_err) => market_err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_keeps_server_text() {
        let err: anyhow::Error = MarketError::Rejected("Solde insuffisant".to_string()).into();
        assert_eq!(user_message(&err, "Achat échoué"), "Solde insuffisant");
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = anyhow::anyhow!("connection refused");
        assert_eq!(user_message(&err, "Achat échoué"), "Achat échoué");

        let err: anyhow::Error = MarketError::Http(500).into();
        assert_eq!(user_message(&err, "Achat échoué"), "Achat échoué");
    }

    #[test]
    fn test_messages_are_french() {
        assert_eq!(MarketError::Http(404).to_string(), "Erreur HTTP : statut 404");
        assert_eq!(DEFAULT_FAILURE_MESSAGE, "Échec de la requête");
    }

    #[test]
    fn test_client_side_errors() {
        assert!(MarketError::NotLoggedIn.is_client_side());
        assert!(MarketError::InsufficientStock { requested: 3, stock: 1 }.is_client_side());
        assert!(!MarketError::Http(404).is_client_side());
    }
}
