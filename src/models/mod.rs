// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données échangées avec le
// backend : utilisateurs, articles, commandes et corps de requêtes.
//
// Les champs JSON du backend sont en camelCase (sellerId, totalPrice...),
// d'où les #[serde(rename_all = "camelCase")] sur chaque structure.
// ============================================================================

pub mod item;       // Articles en vente
pub mod order;      // Commandes + matrice des actions
pub mod requests;   // Corps des requêtes POST
pub mod timestamp;  // Dates renvoyées par le backend
pub mod user;       // Utilisateur de la session

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use otkmarket::models::order::Order;
// On peut faire : use otkmarket::models::Order;
pub use item::Item;
pub use order::{available_actions, Order, OrderAction, OrderStatus, Role};
pub use requests::{ItemDraft, LoginRequest, NewItem, NewOrder, RegisterRequest};
pub use timestamp::Timestamp;
pub use user::User;
