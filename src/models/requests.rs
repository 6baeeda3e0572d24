// ============================================================================
// Corps des requêtes POST
// ============================================================================
// Structures sérialisées en JSON et envoyées au backend.
// ItemDraft est la version "formulaire" d'un article : des chaînes brutes
// saisies dans le terminal, validées puis converties en NewItem.
// ============================================================================

use serde::Serialize;

use crate::error::MarketError;

/// Longueur du nom d'article (après trim), en caractères
pub const ITEM_NAME_LEN: std::ops::RangeInclusive<usize> = 2..=100;
/// Longueur maximale de la description
pub const ITEM_DESCRIPTION_MAX: usize = 1000;
/// Prix maximum accepté par le backend
pub const ITEM_PRICE_MAX: f64 = 1_000_000.0;
/// Stock maximum accepté par le backend
pub const ITEM_STOCK_MAX: i64 = 10_000;

/// POST /auth/login
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/register
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
}

impl RegisterRequest {
    /// Tous les champs sont obligatoires
    pub fn validate(&self) -> Result<(), MarketError> {
        let fields = [&self.username, &self.password, &self.email, &self.phone];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(MarketError::InvalidInput(
                "Veuillez remplir tous les champs obligatoires".to_string(),
            ));
        }
        Ok(())
    }
}

/// POST /items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub seller_id: i64,
}

/// POST /orders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub item_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub quantity: u32,
    pub total_price: f64,
}

/// Article en cours de saisie (valeurs brutes du formulaire)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
}

impl ItemDraft {
    /// Valide la saisie et construit le corps de requête
    ///
    /// Reprend les bornes appliquées par le backend, pour refuser tout de
    /// suite une saisie qui serait rejetée de toute façon.
    pub fn validate(&self, seller_id: i64) -> Result<NewItem, MarketError> {
        let name = self.name.trim();
        if !ITEM_NAME_LEN.contains(&name.chars().count()) {
            return Err(invalid("Le nom doit contenir entre 2 et 100 caractères"));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(invalid("La description est obligatoire"));
        }
        if description.chars().count() > ITEM_DESCRIPTION_MAX {
            return Err(invalid("La description dépasse 1000 caractères"));
        }

        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| invalid("Prix invalide"))?;
        if !(price > 0.0 && price <= ITEM_PRICE_MAX) {
            return Err(invalid("Le prix doit être compris entre 0 et 1 000 000"));
        }

        let stock: i64 = self
            .stock
            .trim()
            .parse()
            .map_err(|_| invalid("Stock invalide"))?;
        if !(0..=ITEM_STOCK_MAX).contains(&stock) {
            return Err(invalid("Le stock doit être compris entre 0 et 10 000"));
        }

        Ok(NewItem {
            name: name.to_string(),
            description: description.to_string(),
            price,
            stock,
            seller_id,
        })
    }
}

fn invalid(message: &str) -> MarketError {
    MarketError::InvalidInput(message.to_string())
}
