// ============================================================================
// OtkMarket - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod actions;   // Actions utilisateur (connexion, achat, publication...)
pub mod api;       // Client REST du backend
pub mod app;       // État de l'application
pub mod config;    // Ligne de commande et chemins par défaut
pub mod error;     // Erreurs métier
pub mod form;      // Formulaires de saisie
pub mod handler;   // Touches → état + commandes
pub mod models;    // Structures de données
pub mod session;   // Session persistée
pub mod ui;        // Interface utilisateur
pub mod worker;    // Exécution des commandes en arrière-plan
