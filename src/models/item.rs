// ============================================================================
// Structure : Item
// ============================================================================
// Article en vente sur la place de marché.
//
// Le stock et la disponibilité font foi côté serveur : le client les lit
// uniquement pour l'affichage et pour refuser localement une quantité
// supérieure au stock avant d'envoyer la commande.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::Timestamp;

fn default_available() -> bool {
    true
}

/// Article publié par un vendeur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    pub seller_id: i64,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<Timestamp>,
}

impl Item {
    /// Prix formaté ("¥12.50")
    pub fn price_label(&self) -> String {
        format!("¥{:.2}", self.price)
    }

    /// Libellé du stock pour la fiche article
    pub fn stock_label(&self) -> String {
        if self.is_sold_out() {
            "Épuisé".to_string()
        } else {
            format!("Stock : {}", self.stock)
        }
    }

    /// Vrai si plus rien n'est disponible
    pub fn is_sold_out(&self) -> bool {
        self.stock <= 0 || !self.available
    }

    /// Vérifie qu'une quantité peut être commandée d'après le stock affiché
    ///
    /// CONCEPT RUST : i64::from
    /// - Conversion sans perte u32 -> i64 (pas de `as`)
    pub fn can_supply(&self, quantity: u32) -> bool {
        quantity > 0 && i64::from(quantity) <= self.stock && self.available
    }

    /// Prix total pour une quantité donnée
    pub fn total_for(&self, quantity: u32) -> f64 {
        self.price * f64::from(quantity)
    }

    /// Ligne compacte pour les listes ("Vélo       ¥120.00  stock 3")
    ///
    /// Le nom est tronqué à 24 caractères.
    pub fn display(&self) -> String {
        let name = if self.name.chars().count() <= 24 {
            self.name.clone()
        } else {
            let truncated: String = self.name.chars().take(23).collect();
            format!("{}…", truncated)
        };

        format!(
            "#{:<5} {:<24} {:>12}  {}",
            self.id,
            name,
            self.price_label(),
            self.stock_label()
        )
    }
}
