// ============================================================================
// Session : utilisateur courant + article consulté
// ============================================================================
// Équivalent du stockage clé/valeur du navigateur : deux valeurs, écrites
// dans un petit fichier JSON, sans expiration ni versioning.
//
//   {"currentUser": {...}, "currentItemId": 42}
//
// CONCEPTS RUST :
// 1. Option<PathBuf> : session persistée (Some) ou purement en mémoire (None)
// 2. Write-through : chaque modification est écrite immédiatement
// 3. Écriture best-effort : un échec disque est journalisé, la mémoire
//    reste la référence pour la suite du programme
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::User;

/// Contenu persisté de la session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub current_user: Option<User>,
    #[serde(default)]
    pub current_item_id: Option<i64>,
}

/// Session de l'utilisateur, éventuellement adossée à un fichier
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    path: Option<PathBuf>,
}

impl Session {
    /// Session sans fichier (tests, mode éphémère)
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Ouvre la session stockée dans `path`
    ///
    /// - fichier absent → session vide
    /// - fichier illisible ou JSON corrompu → avertissement + session vide
    pub fn open(path: &Path) -> Self {
        let state = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<SessionState>(&content) {
                Ok(state) => {
                    debug!(path = %path.display(), logged_in = state.current_user.is_some(), "Session loaded");
                    state
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt session file, starting fresh");
                    SessionState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable session file, starting fresh");
                SessionState::default()
            }
        };

        Self {
            state,
            path: Some(path.to_path_buf()),
        }
    }

    /// Utilisateur connecté, s'il y en a un
    pub fn current_user(&self) -> Option<&User> {
        self.state.current_user.as_ref()
    }

    /// Identifiant de l'utilisateur connecté
    pub fn user_id(&self) -> Option<i64> {
        self.state.current_user.as_ref().map(|u| u.id)
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.current_user.is_some()
    }

    /// Article actuellement consulté
    pub fn current_item_id(&self) -> Option<i64> {
        self.state.current_item_id
    }

    /// Remplace l'utilisateur courant (connexion ou rafraîchissement)
    pub fn set_user(&mut self, user: User) {
        info!(user = user.id, username = %user.username, "Session user updated");
        self.state.current_user = Some(user);
        self.save();
    }

    /// Oublie l'utilisateur courant (déconnexion)
    pub fn clear_user(&mut self) {
        self.state.current_user = None;
        self.save();
    }

    /// Mémorise l'article consulté
    pub fn set_current_item(&mut self, item_id: i64) {
        self.state.current_item_id = Some(item_id);
        self.save();
    }

    fn save(&self) {
        if let Err(e) = self.persist() {
            warn!(error = ?e, "Failed to save session, keeping it in memory only");
        }
    }

    /// Écrit l'état sur disque (no-op en mémoire)
    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Échec de la création de {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.state)
            .context("Échec de la sérialisation de la session")?;
        fs::write(path, json)
            .with_context(|| format!("Échec de l'écriture de {}", path.display()))?;

        debug!(path = %path.display(), "Session saved");
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
