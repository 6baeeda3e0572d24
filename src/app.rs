// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Un seul propriétaire : App vit dans le thread UI, le worker ne la
//    touche jamais (il renvoie des AppResult que l'UI applique)
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// ============================================================================

use crate::error::MarketError;
use crate::form::{Form, FormField};
use crate::models::{Item, ItemDraft, Order, OrderAction, RegisterRequest, Role, User};
use crate::worker::{AppCommand, AppResult, Notice};

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Liste des articles (page d'accueil)
    Market,
    /// Fiche d'un article
    Detail,
    /// Mes achats / mes ventes
    Orders,
    /// Connexion, inscription, profil et articles publiés
    Account,
}

impl Screen {
    /// Onglets affichés dans le header (Detail n'en est pas un)
    pub const TABS: [Screen; 3] = [Screen::Market, Screen::Orders, Screen::Account];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Market => "Marché",
            Screen::Detail => "Article",
            Screen::Orders => "Commandes",
            Screen::Account => "Compte",
        }
    }

    /// Index de l'onglet à surligner (la fiche article reste sous "Marché")
    pub fn tab_index(&self) -> usize {
        match self {
            Screen::Market | Screen::Detail => 0,
            Screen::Orders => 1,
            Screen::Account => 2,
        }
    }

    /// Onglet suivant (Tab)
    pub fn next(&self) -> Screen {
        Self::TABS[(self.tab_index() + 1) % Self::TABS.len()]
    }
}

// ============================================================================
// Enum : ViewState
// ============================================================================
// CONCEPT RUST : Enum générique
// - Une zone de l'écran est soit vide, soit en chargement, soit chargée,
//   soit en échec (message statique à la place du contenu)
// - Chaque résultat remplace entièrement l'état précédent
// ============================================================================

/// État d'une zone d'affichage alimentée par le backend
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

impl<T> From<Result<T, String>> for ViewState<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => ViewState::Loaded(value),
            Err(message) => ViewState::Failed(message),
        }
    }
}

// ============================================================================
// Saisie et confirmations
// ============================================================================

/// Ce que déclenchera la validation du formulaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    Search,
    Login,
    Register,
    Publish,
    BuyQuantity,
    Recharge,
}

impl InputPurpose {
    /// Formulaire vide correspondant
    pub fn form(&self) -> Form {
        match self {
            InputPurpose::Search => Form::single("Rechercher", "Mot-clé"),
            InputPurpose::Login => Form::new(
                "Connexion",
                vec![FormField::new("Utilisateur"), FormField::secret("Mot de passe")],
            ),
            InputPurpose::Register => Form::new(
                "Inscription",
                vec![
                    FormField::new("Utilisateur"),
                    FormField::secret("Mot de passe"),
                    FormField::new("E-mail"),
                    FormField::new("Téléphone"),
                ],
            ),
            InputPurpose::Publish => Form::new(
                "Publier un article",
                vec![
                    FormField::new("Nom"),
                    FormField::new("Description"),
                    FormField::new("Prix"),
                    FormField::new("Stock"),
                ],
            ),
            InputPurpose::BuyQuantity => Form::single("Acheter", "Quantité").with_value("1"),
            InputPurpose::Recharge => Form::single("Recharger le solde", "Montant"),
        }
    }
}

/// Formulaire ouvert en popup
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub purpose: InputPurpose,
    pub form: Form,
}

/// Action en attente de confirmation (équivalent d'un confirm())
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub prompt: String,
    pub command: AppCommand,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Two-step quit : première pression de 'q' → true, seconde → sortie
    pub confirm_quit: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Catalogue (liste complète ou résultat de recherche)
    pub products: ViewState<Vec<Item>>,
    pub selected_product: usize,
    /// Dernier mot-clé recherché (vide = catalogue complet)
    pub search_keyword: String,

    /// Fiche article ouverte
    pub detail: ViewState<Item>,

    /// Onglet de commandes affiché
    pub orders_role: Role,
    pub orders: ViewState<Vec<Order>>,
    pub selected_order: usize,

    /// Copie de l'utilisateur de la session (None = déconnecté)
    pub user: Option<User>,
    /// Articles publiés par l'utilisateur
    pub my_items: ViewState<Vec<Item>>,

    /// Formulaire ouvert, le cas échéant
    pub input: Option<Input>,
    /// Confirmation en attente
    pub confirmation: Option<Confirmation>,
    /// Popup bloquante (info ou erreur)
    pub notice: Option<Notice>,

    /// Indicateur de chargement (au moins une commande en cours)
    pub is_loading: bool,
    pub loading_message: Option<String>,
    /// Commandes envoyées au worker et pas encore terminées
    pending: usize,
}

impl App {
    /// Crée l'état initial à partir de l'utilisateur de la session
    pub fn new(user: Option<User>) -> Self {
        Self {
            running: true,
            confirm_quit: false,
            current_screen: Screen::Market,
            products: ViewState::Idle,
            selected_product: 0,
            search_keyword: String::new(),
            detail: ViewState::Idle,
            orders_role: Role::Buyer,
            orders: ViewState::Idle,
            selected_order: 0,
            user,
            my_items: ViewState::Idle,
            input: None,
            confirmation: None,
            notice: None,
            is_loading: false,
            loading_message: None,
            pending: 0,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn show(&mut self, screen: Screen) {
        self.current_screen = screen;
    }

    // ========================================================================
    // Navigation dans les listes
    // ========================================================================

    /// Déplace la sélection de la liste de l'écran courant
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    /// - min() borne l'index au dernier élément
    pub fn navigate_up(&mut self) {
        match self.current_screen {
            Screen::Market => self.selected_product = self.selected_product.saturating_sub(1),
            Screen::Orders => self.selected_order = self.selected_order.saturating_sub(1),
            Screen::Detail | Screen::Account => {}
        }
    }

    pub fn navigate_down(&mut self) {
        match self.current_screen {
            Screen::Market => {
                let max_index = list_len(&self.products).saturating_sub(1);
                self.selected_product = (self.selected_product + 1).min(max_index);
            }
            Screen::Orders => {
                let max_index = list_len(&self.orders).saturating_sub(1);
                self.selected_order = (self.selected_order + 1).min(max_index);
            }
            Screen::Detail | Screen::Account => {}
        }
    }

    pub fn selected_product(&self) -> Option<&Item> {
        self.products.loaded()?.get(self.selected_product)
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.orders.loaded()?.get(self.selected_order)
    }

    /// Article affiché sur la fiche
    pub fn current_item(&self) -> Option<&Item> {
        self.detail.loaded()
    }

    /// Actions proposées pour la commande sélectionnée
    pub fn selected_order_actions(&self) -> &'static [OrderAction] {
        self.selected_order()
            .map(|order| order.actions_for(self.orders_role))
            .unwrap_or_default()
    }

    /// Bascule entre "Mes achats" et "Mes ventes"
    pub fn toggle_orders_role(&mut self) {
        self.orders_role = match self.orders_role {
            Role::Buyer => Role::Seller,
            Role::Seller => Role::Buyer,
        };
        self.orders = ViewState::Idle;
        self.selected_order = 0;
    }

    // ========================================================================
    // Chargement
    // ========================================================================

    /// Enregistre une commande partie vers le worker
    ///
    /// Passe la zone concernée en Loading et active l'indicateur.
    pub fn begin(&mut self, command: &AppCommand) {
        match command {
            AppCommand::LoadProducts | AppCommand::Search { .. } => self.products = ViewState::Loading,
            AppCommand::OpenItem { .. } => self.detail = ViewState::Loading,
            AppCommand::LoadOrders { role } if *role == self.orders_role => {
                self.orders = ViewState::Loading
            }
            AppCommand::LoadMyItems => self.my_items = ViewState::Loading,
            _ => {}
        }

        self.pending += 1;
        self.is_loading = true;
        self.loading_message = Some(loading_message(command).to_string());
    }

    /// Applique un résultat du worker
    pub fn apply(&mut self, result: AppResult) {
        match result {
            AppResult::Products(products) => {
                self.products = products.into();
                let max_index = list_len(&self.products).saturating_sub(1);
                self.selected_product = self.selected_product.min(max_index);
            }
            AppResult::Item(item) => self.detail = item.into(),
            AppResult::Orders { role, orders } => {
                // Réponse d'un onglet qui n'est plus affiché : ignorée
                if role == self.orders_role {
                    self.orders = orders.into();
                    let max_index = list_len(&self.orders).saturating_sub(1);
                    self.selected_order = self.selected_order.min(max_index);
                }
            }
            AppResult::MyItems(items) => self.my_items = items.into(),
            AppResult::User(user) => {
                if user.is_none() {
                    self.orders = ViewState::Idle;
                    self.my_items = ViewState::Idle;
                }
                self.user = user;
            }
            AppResult::Notice(notice) => self.notice = Some(notice),
            AppResult::Done => {
                self.pending = self.pending.saturating_sub(1);
                if self.pending == 0 {
                    self.is_loading = false;
                    self.loading_message = None;
                }
            }
        }
    }

    // ========================================================================
    // Popups
    // ========================================================================

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::error(message));
    }

    pub fn request_confirmation(&mut self, prompt: impl Into<String>, command: AppCommand) {
        self.confirmation = Some(Confirmation {
            prompt: prompt.into(),
            command,
        });
    }

    /// Valide la confirmation en attente et retourne sa commande
    pub fn confirm(&mut self) -> Option<AppCommand> {
        self.confirmation.take().map(|c| c.command)
    }

    pub fn cancel_confirmation(&mut self) {
        self.confirmation = None;
    }

    /// Demande une transition de commande, si la matrice l'autorise
    ///
    /// Retourne false (et ne fait rien) si l'action n'est pas proposée.
    pub fn request_order_action(&mut self, action: OrderAction) -> bool {
        if !self.selected_order_actions().contains(&action) {
            return false;
        }
        let Some(order_id) = self.selected_order().map(|o| o.id) else {
            return false;
        };

        let role = self.orders_role;
        self.request_confirmation(
            format!("{} la commande #{} ?", action.label(), order_id),
            AppCommand::OrderAction {
                order_id,
                action,
                role,
            },
        );
        true
    }

    // ========================================================================
    // Formulaires
    // ========================================================================

    pub fn start_input(&mut self, purpose: InputPurpose) {
        let mut form = purpose.form();
        match purpose {
            InputPurpose::Search => form = form.with_value(self.search_keyword.clone()),
            InputPurpose::BuyQuantity => {
                if let Some(item) = self.current_item() {
                    form.title = format!("Acheter {}", item.name);
                }
            }
            _ => {}
        }
        self.input = Some(Input { purpose, form });
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.input.is_some()
    }

    /// Ferme le formulaire et construit les commandes correspondantes
    ///
    /// Les saisies non numériques (quantité, montant) sont refusées ici avec
    /// une popup ; l'achat passe d'abord par une confirmation.
    pub fn submit_input(&mut self) -> Vec<AppCommand> {
        let Some(Input { purpose, form }) = self.input.take() else {
            return Vec::new();
        };

        match purpose {
            InputPurpose::Search => {
                let keyword = form.value(0).trim().to_string();
                self.search_keyword = keyword.clone();
                self.selected_product = 0;
                vec![AppCommand::Search { keyword }]
            }
            InputPurpose::Login => vec![AppCommand::Login {
                username: form.value(0).to_string(),
                password: form.value(1).to_string(),
            }],
            InputPurpose::Register => vec![AppCommand::Register(RegisterRequest {
                username: form.value(0).trim().to_string(),
                password: form.value(1).to_string(),
                email: form.value(2).trim().to_string(),
                phone: form.value(3).trim().to_string(),
            })],
            InputPurpose::Publish => vec![AppCommand::Publish(ItemDraft {
                name: form.value(0).to_string(),
                description: form.value(1).to_string(),
                price: form.value(2).to_string(),
                stock: form.value(3).to_string(),
            })],
            InputPurpose::Recharge => match form.value(0).trim().parse::<f64>() {
                Ok(amount) if amount.is_finite() && amount > 0.0 => {
                    vec![AppCommand::Recharge { amount }]
                }
                _ => {
                    self.show_error("Montant invalide");
                    Vec::new()
                }
            },
            InputPurpose::BuyQuantity => {
                self.prepare_purchase(form.value(0));
                Vec::new()
            }
        }
    }

    /// Contrôle la quantité saisie puis demande confirmation de l'achat
    fn prepare_purchase(&mut self, raw_quantity: &str) {
        let Some(item) = self.current_item().cloned() else {
            self.show_error("Article introuvable");
            return;
        };

        let quantity = match raw_quantity.trim().parse::<u32>() {
            Ok(quantity) if quantity > 0 => quantity,
            _ => {
                self.show_error("Quantité invalide");
                return;
            }
        };

        if !item.can_supply(quantity) {
            self.show_error(
                MarketError::InsufficientStock {
                    requested: quantity,
                    stock: item.stock,
                }
                .to_string(),
            );
            return;
        }

        let prompt = format!(
            "Acheter {} x {} pour ¥{:.2} ?",
            quantity,
            item.name,
            item.total_for(quantity)
        );
        self.request_confirmation(prompt, AppCommand::Buy { item, quantity });
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(None)
    }
}

fn list_len<T>(state: &ViewState<Vec<T>>) -> usize {
    state.loaded().map(Vec::len).unwrap_or(0)
}

/// Message de la barre de chargement pour une commande
fn loading_message(command: &AppCommand) -> &'static str {
    match command {
        AppCommand::LoadProducts => "Chargement des articles...",
        AppCommand::Search { .. } => "Recherche...",
        AppCommand::OpenItem { .. } => "Chargement de l'article...",
        AppCommand::Login { .. } => "Connexion...",
        AppCommand::Register(_) => "Inscription...",
        AppCommand::Logout => "Déconnexion...",
        AppCommand::RefreshUser => "Mise à jour du compte...",
        AppCommand::Recharge { .. } => "Recharge...",
        AppCommand::Publish(_) => "Publication...",
        AppCommand::LoadMyItems => "Chargement de vos articles...",
        AppCommand::Buy { .. } => "Achat en cours...",
        AppCommand::LoadOrders { .. } => "Chargement des commandes...",
        AppCommand::OrderAction { .. } => "Mise à jour de la commande...",
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
