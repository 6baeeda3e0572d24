// ============================================================================
// Structure : Order + matrice des actions
// ============================================================================
// Une commande passe par quatre statuts, mais les transitions sont faites
// exclusivement par le backend. Le client se contente de :
// 1. afficher le statut
// 2. proposer les boutons valides selon (rôle du lecteur, statut)
// 3. demander la transition puis recharger la liste
//
// CONCEPT RUST : Table de correspondance statique
// - available_actions() retourne un &'static [OrderAction]
// - Aucune allocation, le compilateur vérifie que tous les cas sont couverts
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::Timestamp;

/// Statut d'une commande
///
/// CONCEPT RUST : #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// - Pending <-> "PENDING", Confirmed <-> "CONFIRMED", etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Tous les statuts, dans l'ordre du cycle de vie
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Libellé pour l'affichage
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "En attente",
            OrderStatus::Confirmed => "Confirmée",
            OrderStatus::Completed => "Terminée",
            OrderStatus::Cancelled => "Annulée",
        }
    }

    /// COMPLETED et CANCELLED n'acceptent plus aucune action
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// Relation entre le lecteur et la commande
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Buyer => "Mes achats",
            Role::Seller => "Mes ventes",
        }
    }
}

/// Transition qu'un utilisateur peut demander au backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    Confirm,
    Cancel,
    Complete,
}

impl OrderAction {
    /// Segment d'URL : POST /orders/{id}/{segment}
    pub fn path_segment(&self) -> &'static str {
        match self {
            OrderAction::Confirm => "confirm",
            OrderAction::Cancel => "cancel",
            OrderAction::Complete => "complete",
        }
    }

    /// Libellé du bouton
    pub fn label(&self) -> &'static str {
        match self {
            OrderAction::Confirm => "Confirmer",
            OrderAction::Cancel => "Annuler",
            OrderAction::Complete => "Terminer",
        }
    }

    /// Touche associée dans la liste des commandes
    pub fn key(&self) -> char {
        match self {
            OrderAction::Confirm => 'c',
            OrderAction::Cancel => 'x',
            OrderAction::Complete => 'f',
        }
    }

    /// Retrouve l'action associée à une touche
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'c' => Some(OrderAction::Confirm),
            'x' => Some(OrderAction::Cancel),
            'f' => Some(OrderAction::Complete),
            _ => None,
        }
    }
}

/// Actions proposées pour un couple (rôle, statut)
///
/// - PENDING + vendeur → confirmer
/// - PENDING ou CONFIRMED + acheteur → annuler
/// - CONFIRMED + acheteur → terminer
/// - COMPLETED / CANCELLED → rien
pub fn available_actions(role: Role, status: OrderStatus) -> &'static [OrderAction] {
    match (role, status) {
        (Role::Seller, OrderStatus::Pending) => &[OrderAction::Confirm],
        (Role::Buyer, OrderStatus::Pending) => &[OrderAction::Cancel],
        (Role::Buyer, OrderStatus::Confirmed) => &[OrderAction::Cancel, OrderAction::Complete],
        (Role::Seller, OrderStatus::Confirmed)
        | (_, OrderStatus::Completed)
        | (_, OrderStatus::Cancelled) => &[],
    }
}

/// Commande telle que renvoyée par /orders/buyer/{id} et /orders/seller/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub item_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    pub total_price: f64,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<Timestamp>,
}

fn default_quantity() -> i64 {
    1
}

impl Order {
    /// Actions disponibles pour ce lecteur
    pub fn actions_for(&self, role: Role) -> &'static [OrderAction] {
        available_actions(role, self.status)
    }

    /// Ligne compacte pour la liste des commandes
    pub fn display(&self) -> String {
        let date = self
            .create_time
            .as_ref()
            .map(|ts| ts.display())
            .unwrap_or_default();

        format!(
            "#{:<5} article #{:<5} x{:<3} {:>12}  {:<11} {}",
            self.id,
            self.item_id,
            self.quantity,
            format!("¥{:.2}", self.total_price),
            self.status.label(),
            date
        )
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
