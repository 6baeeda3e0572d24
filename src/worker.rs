// ============================================================================
// Worker : exécution des actions en arrière-plan
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des AppCommand au worker thread
// - Le worker exécute chaque commande de manière async, une à la fois
// - Les AppResult reviennent par un second channel (mpsc)
//
// Le worker possède le Marketplace (client HTTP + session) : aucun état
// n'est partagé entre threads, donc aucun Mutex.
// ============================================================================

use std::sync::mpsc;

use anyhow::Error;
use tracing::{error, info, warn};

use crate::actions::Marketplace;
use crate::api::Transport;
use crate::error::{user_message, MarketError};
use crate::models::{Item, ItemDraft, Order, OrderAction, RegisterRequest, Role, User};

/// Commandes envoyées au worker thread
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Recharger la liste complète des articles
    LoadProducts,
    /// Rechercher par mot-clé
    Search { keyword: String },
    /// Ouvrir la fiche d'un article
    OpenItem { item_id: i64 },
    /// Se connecter
    Login { username: String, password: String },
    /// Créer un compte
    Register(RegisterRequest),
    /// Se déconnecter
    Logout,
    /// Relire l'utilisateur courant
    RefreshUser,
    /// Recharger le solde
    Recharge { amount: f64 },
    /// Publier un article
    Publish(ItemDraft),
    /// Charger les articles de l'utilisateur
    LoadMyItems,
    /// Acheter un article affiché
    Buy { item: Item, quantity: u32 },
    /// Charger les commandes (achats ou ventes)
    LoadOrders { role: Role },
    /// Demander une transition de commande
    OrderAction {
        order_id: i64,
        action: OrderAction,
        role: Role,
    },
}

/// Gravité d'un message affiché en popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Message bloquant (équivalent d'une boîte de dialogue)
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Résultats renvoyés par le worker thread
///
/// Les Err(String) contiennent le message déjà prêt pour l'affichage.
#[derive(Debug, Clone, PartialEq)]
pub enum AppResult {
    /// Liste d'articles (catalogue ou recherche)
    Products(Result<Vec<Item>, String>),
    /// Fiche article
    Item(Result<Item, String>),
    /// Commandes d'un rôle
    Orders {
        role: Role,
        orders: Result<Vec<Order>, String>,
    },
    /// Articles publiés par l'utilisateur
    MyItems(Result<Vec<Item>, String>),
    /// Nouvel état de l'utilisateur de la session (None = déconnecté)
    User(Option<User>),
    /// Popup à afficher
    Notice(Notice),
    /// La commande est terminée (fin de l'indicateur de chargement)
    Done,
}

/// Journalise l'échec et retourne le message à afficher
///
/// Une saisie refusée localement n'est qu'un avertissement : aucune requête
/// n'est partie.
fn failure(err: &Error, generic: &str) -> String {
    let client_side = err
        .downcast_ref::<MarketError>()
        .is_some_and(MarketError::is_client_side);
    if client_side {
        warn!(error = %err, "{}", generic);
    } else {
        error!(error = ?err, "{}", generic);
    }
    user_message(err, generic)
}

/// Exécute une commande et retourne les résultats à appliquer, dans l'ordre
///
/// Après une action qui modifie des données, les vues concernées sont
/// rechargées dans la foulée (remplacement complet).
pub async fn execute<T: Transport>(market: &mut Marketplace<T>, command: AppCommand) -> Vec<AppResult> {
    match command {
        AppCommand::LoadProducts => {
            let products = market.load_products().await;
            vec![AppResult::Products(
                products.map_err(|e| failure(&e, "Échec du chargement des articles")),
            )]
        }

        AppCommand::Search { keyword } => {
            let products = market.search_products(&keyword).await;
            vec![AppResult::Products(
                products.map_err(|e| failure(&e, "Échec de la recherche")),
            )]
        }

        AppCommand::OpenItem { item_id } => {
            let item = market.open_item(item_id).await;
            vec![AppResult::Item(
                item.map_err(|e| failure(&e, "Article introuvable ou échec du chargement")),
            )]
        }

        AppCommand::Login { username, password } => match market.login(&username, &password).await {
            Ok(user) => {
                let my_items = market.my_items().await;
                vec![
                    AppResult::User(Some(user)),
                    AppResult::Notice(Notice::info("Connexion réussie !")),
                    AppResult::MyItems(my_items.map_err(|e| failure(&e, "Échec du chargement de vos articles"))),
                ]
            }
            Err(e) => vec![AppResult::Notice(Notice::error(failure(
                &e,
                "Échec de la connexion, vérifiez le réseau",
            )))],
        },

        AppCommand::Register(request) => match market.register(request).await {
            Ok(()) => vec![AppResult::Notice(Notice::info(
                "Inscription réussie ! Vous pouvez vous connecter",
            ))],
            Err(e) => vec![AppResult::Notice(Notice::error(failure(
                &e,
                "Échec de l'inscription, réessayez plus tard",
            )))],
        },

        AppCommand::Logout => {
            market.logout().await;
            vec![
                AppResult::User(None),
                AppResult::Notice(Notice::info("Vous êtes déconnecté")),
            ]
        }

        AppCommand::RefreshUser => match market.refresh_user().await {
            Ok(user) => vec![AppResult::User(Some(user))],
            Err(e) => {
                warn!(error = ?e, "Failed to refresh user");
                Vec::new()
            }
        },

        AppCommand::Recharge { amount } => match market.recharge(amount).await {
            Ok(user) => vec![
                AppResult::User(Some(user)),
                AppResult::Notice(Notice::info(format!("Recharge de ¥{:.2} effectuée", amount))),
            ],
            Err(e) => vec![AppResult::Notice(Notice::error(failure(&e, "Échec de la recharge")))],
        },

        AppCommand::Publish(draft) => match market.publish_item(&draft).await {
            Ok(()) => {
                let my_items = market.my_items().await;
                let products = market.load_products().await;
                vec![
                    AppResult::Notice(Notice::info("Article publié !")),
                    AppResult::MyItems(my_items.map_err(|e| failure(&e, "Échec du chargement de vos articles"))),
                    AppResult::Products(products.map_err(|e| failure(&e, "Échec du chargement des articles"))),
                ]
            }
            Err(e) => vec![AppResult::Notice(Notice::error(failure(&e, "Échec de la publication")))],
        },

        AppCommand::LoadMyItems => {
            let items = market.my_items().await;
            vec![AppResult::MyItems(
                items.map_err(|e| failure(&e, "Échec du chargement de vos articles")),
            )]
        }

        AppCommand::Buy { item, quantity } => match market.buy(&item, quantity).await {
            Ok(()) => {
                let refreshed = market.open_item(item.id).await;
                vec![
                    AppResult::User(market.session().current_user().cloned()),
                    AppResult::Notice(Notice::info(
                        "Achat réussi ! Contactez le vendeur pour finaliser la transaction.",
                    )),
                    AppResult::Item(refreshed.map_err(|e| failure(&e, "Article introuvable ou échec du chargement"))),
                ]
            }
            Err(e) => vec![AppResult::Notice(Notice::error(failure(
                &e,
                "Échec de l'achat, réessayez plus tard",
            )))],
        },

        AppCommand::LoadOrders { role } => {
            let orders = load_orders(market, role).await;
            vec![AppResult::Orders { role, orders }]
        }

        AppCommand::OrderAction {
            order_id,
            action,
            role,
        } => match market.order_action(order_id, action).await {
            Ok(()) => {
                let orders = load_orders(market, role).await;
                vec![
                    AppResult::User(market.session().current_user().cloned()),
                    AppResult::Notice(Notice::info(format!(
                        "Commande #{} : {} effectué",
                        order_id,
                        action.label()
                    ))),
                    AppResult::Orders { role, orders },
                ]
            }
            Err(e) => vec![AppResult::Notice(Notice::error(failure(
                &e,
                "Opération sur la commande échouée",
            )))],
        },
    }
}

async fn load_orders<T: Transport>(market: &Marketplace<T>, role: Role) -> Result<Vec<Order>, String> {
    let orders = match role {
        Role::Buyer => market.buyer_orders().await,
        Role::Seller => market.seller_orders().await,
    };
    orders.map_err(|e| failure(&e, "Échec du chargement des commandes"))
}

/// Lance le worker thread
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : crée un thread OS
/// - runtime.block_on() : bloque le worker (pas l'UI) pendant l'appel réseau
/// - La boucle s'arrête quand l'UI ferme le channel de commandes
pub fn spawn_background_worker<T: Transport + 'static>(
    runtime: tokio::runtime::Runtime,
    mut market: Marketplace<T>,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            let results = runtime.block_on(execute(&mut market, command));
            for result in results.into_iter().chain(std::iter::once(AppResult::Done)) {
                if result_tx.send(result).is_err() {
                    // L'UI est partie, plus personne pour lire
                    return;
                }
            }
        }
        info!("Worker thread exiting (channel closed)");
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================
