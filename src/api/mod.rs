// ============================================================================
// Module : api
// ============================================================================
// Ce module contient tout ce qui parle au backend REST :
// - transport : envoi HTTP brut (trait + implémentation reqwest)
// - envelope  : déballage de la convention {success, message, data}
// - client    : un appel typé par endpoint
// ============================================================================

pub mod client;     // Endpoints typés (articles, commandes, utilisateurs)
pub mod envelope;   // Convention {success, message, data}
pub mod transport;  // Trait Transport + client HTTP reqwest

#[cfg(test)]
pub mod mock;       // Transport simulé pour les tests

// Re-export des types principaux
pub use client::MarketClient;
pub use envelope::unwrap_envelope;
pub use transport::{HttpMethod, HttpTransport, Transport};

/// URL de base du backend quand rien n'est configuré
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
