// ============================================================================
// Timestamp : dates renvoyées par le backend
// ============================================================================
// Selon la sérialisation côté serveur, une date arrive soit en millisecondes
// Unix (123456789000), soit déjà formatée ("2024-05-01 10:00:00").
//
// CONCEPT RUST : #[serde(untagged)]
// - Serde essaie chaque variant dans l'ordre
// - Le premier qui correspond au JSON gagne
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Date de création / mise à jour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Millisecondes depuis l'epoch Unix
    Millis(i64),
    /// Date déjà formatée par le serveur
    Text(String),
}

impl Timestamp {
    /// Convertit en DateTime<Utc> si possible
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Formatte la date pour l'affichage ("2024-05-01 10:00")
    ///
    /// Un texte non reconnu est affiché tel quel.
    pub fn display(&self) -> String {
        match (self.to_datetime(), self) {
            (Some(dt), _) => dt.format("%Y-%m-%d %H:%M").to_string(),
            (None, Timestamp::Text(text)) => text.clone(),
            (None, Timestamp::Millis(ms)) => ms.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_display() {
        // 2024-01-01 00:00:00 UTC
        let ts = Timestamp::Millis(1_704_067_200_000);
        assert_eq!(ts.display(), "2024-01-01 00:00");
    }

    #[test]
    fn test_text_passthrough() {
        let ts: Timestamp = serde_json::from_str("\"hier soir\"").unwrap();
        assert_eq!(ts.display(), "hier soir");
    }

    #[test]
    fn test_untagged_number() {
        let ts: Timestamp = serde_json::from_str("1704067200000").unwrap();
        assert_eq!(ts, Timestamp::Millis(1_704_067_200_000));
    }
}
