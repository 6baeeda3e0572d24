// ============================================================================
// Structure : User
// ============================================================================
// Utilisateur connecté, tel que renvoyé par /auth/login et /users/{id}.
// Le solde n'est jamais calculé côté client : on le relit après chaque
// opération qui le modifie (achat, recharge, annulation...).
// ============================================================================

use serde::{Deserialize, Serialize};

/// Utilisateur de la session
///
/// Les champs inconnus (mot de passe haché, dates...) sont ignorés par serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub balance: f64,
}

impl User {
    /// Solde formaté avec deux décimales
    pub fn balance_label(&self) -> String {
        format!("¥{:.2}", self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_backend_json() {
        let json = r#"{"id": 3, "username": "alice", "password": "x", "email": "a@b.cn", "phone": "13800000000", "balance": 12.5}"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.id, 3);
        assert_eq!(user.username, "alice");
        assert_eq!(user.balance_label(), "¥12.50");
    }

    #[test]
    fn test_missing_optional_fields() {
        let user: User = serde_json::from_str(r#"{"id": 1, "username": "bob"}"#).unwrap();
        assert_eq!(user.email, "");
        assert_eq!(user.balance, 0.0);
    }
}
