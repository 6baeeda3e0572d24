// ============================================================================
// OtkMarket - client terminal de la place de marché
// ============================================================================
// Programme TUI : catalogue, fiche article, achats, commandes et compte,
// servis par le backend REST (par défaut http://localhost:8080/api).
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Worker thread : runtime tokio + client HTTP hors du thread UI
// 4. Channels mpsc : AppCommand vers le worker, AppResult en retour
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use otkmarket::actions::Marketplace;
use otkmarket::api::{HttpTransport, MarketClient};
use otkmarket::app::App;
use otkmarket::config::Config;
use otkmarket::handler::handle_event;
use otkmarket::session::Session;
use otkmarket::ui::{render, EventHandler};
use otkmarket::worker::{spawn_background_worker, AppCommand, AppResult};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans `<log_dir>/otkmarket.log.AAAA-MM-JJ`
/// (par défaut ~/.local/share/otkmarket/logs sur Linux).
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/otkmarket/logs/otkmarket.log.*
/// RUST_LOG=otkmarket=trace otkmarket
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "otkmarket.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG prioritaire, sinon debug pour otkmarket et info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otkmarket=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::parse();

    // Logging avant tout le reste ; un échec n'empêche pas de démarrer
    init_logging(&config.log_path()).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, "OtkMarket starting up");

    // Tout ce qui peut échouer est préparé avant de passer en mode TUI
    let transport = HttpTransport::new(&config.api_url)?;
    let session = Session::open(&config.session_path());
    let app = App::new(session.current_user().cloned());
    let market = Marketplace::new(MarketClient::new(transport), session);
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    // Pas de join à la sortie : une requête bloquée ne doit pas retenir l'UI
    let _worker = spawn_background_worker(runtime, market, command_rx, result_tx);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::default();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. appliquer les résultats du worker
//   1. dessiner l'interface
//   2. traiter l'événement clavier et envoyer les commandes produites
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    // Chargement initial : catalogue, et solde à jour si une session existe
    let mut initial = vec![AppCommand::LoadProducts];
    if app.is_logged_in() {
        initial.push(AppCommand::RefreshUser);
    }
    dispatch(&mut app, &command_tx, initial);

    let mut worker_alive = true;

    while app.is_running() {
        // ========================================
        // 0. RÉSULTATS : non bloquant (try_recv)
        // ========================================
        loop {
            match result_rx.try_recv() {
                Ok(result) => app.apply(result),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if worker_alive {
                        error!("Worker thread disconnected!");
                        app.show_error("Le service d'arrière-plan s'est arrêté");
                        worker_alive = false;
                    }
                    break;
                }
            }
        }

        // ========================================
        // 1. RENDER
        // ========================================
        terminal.draw(|frame| render(frame, &app))?;

        // ========================================
        // 2. INPUT
        // ========================================
        let event = events.next()?;
        let commands = handle_event(&mut app, &event);
        dispatch(&mut app, &command_tx, commands);
    }

    Ok(())
}

/// Envoie des commandes au worker et passe les zones concernées en chargement
fn dispatch(app: &mut App, command_tx: &mpsc::Sender<AppCommand>, commands: Vec<AppCommand>) {
    for command in commands {
        app.begin(&command);
        if command_tx.send(command).is_err() {
            error!("Worker channel closed, command dropped");
            app.apply(AppResult::Done);
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
// IMPORTANT : toujours restaurer le terminal avant de quitter !
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
