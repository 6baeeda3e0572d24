// ============================================================================
// Configuration : ligne de commande + variables d'environnement
// ============================================================================
// CONCEPT RUST : clap derive
// - Chaque champ devient une option (--api-url, --session-file, ...)
// - `env = "..."` : valeur lue dans l'environnement si l'option est absente
// - Les chemins par défaut dépendent de la plateforme (dirs)
//
// Exemples :
//   otkmarket --api-url http://192.168.1.10:8080/api
//   OTKMARKET_API_URL=http://shop.local/api otkmarket
// ============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::api::DEFAULT_API_URL;

/// Nom du sous-répertoire applicatif (~/.local/share/otkmarket sur Linux)
const APP_DIR: &str = "otkmarket";

/// Client terminal pour la place de marché OpenOtk
#[derive(Debug, Clone, Parser)]
#[command(name = "otkmarket", version, about)]
pub struct Config {
    /// URL de base de l'API REST
    #[arg(long, env = "OTKMARKET_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Fichier JSON de la session (utilisateur connecté, article consulté)
    #[arg(long, env = "OTKMARKET_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Répertoire des fichiers de logs
    #[arg(long, env = "OTKMARKET_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Répertoire de données de l'application
    ///
    /// Linux : ~/.local/share/otkmarket, repli sur ./ si introuvable
    fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Chemin effectif du fichier de session
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("session.json"))
    }

    /// Répertoire effectif des logs
    pub fn log_path(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("logs"))
    }
}
