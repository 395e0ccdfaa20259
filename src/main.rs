use gallery_swipe::cli::{AppConfig, Args};
use gallery_swipe::config::UserConfig;
use gallery_swipe::deletion::{DeletionCoordinator, DryRunStore, MediaStore, TrashStore};
use gallery_swipe::domain::DirectoryCatalog;
use gallery_swipe::logging::{init_tracing, TracingConfig};
use gallery_swipe::session::ReviewSession;
use gallery_swipe::tui::{App, AppFlow};
use gallery_swipe::Result;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// How long outstanding deletions get to finish after the screen closes
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let config = AppConfig::resolve(args, &user_config);

    let tracing_config = TracingConfig {
        debug: config.debug,
        log_file: None,
    };
    if let Err(e) = init_tracing(&tracing_config) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    if let Err(e) = run_app_with_config(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Runs the review screen with configuration
pub fn run_app_with_config(config: &AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("gswp-worker")
        .build()?;

    let store: Arc<dyn MediaStore> = if config.dry_run {
        Arc::new(DryRunStore)
    } else {
        Arc::new(TrashStore)
    };
    let coordinator = DeletionCoordinator::new(store, runtime.handle().clone());
    let mut session = ReviewSession::new(config.session_config(), coordinator);
    let catalog = DirectoryCatalog::new(config.directory.clone(), config.catalog_options());

    let mut app = App::new(config.show_welcome, config.confirm_delete, config.dry_run);

    match runtime.block_on(session.load_from(&catalog)) {
        Ok(count) => info!(
            count,
            directory = %config.directory.display(),
            dry_run = config.dry_run,
            "starting review"
        ),
        Err(e) => app.set_status(Some(e.to_string())),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(
        &mut terminal,
        &runtime,
        &mut session,
        &mut app,
        &catalog,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let pending = session.deletions().pending_count();
    if pending > 0 {
        println!("Waiting for {} deletion(s) to finish...", pending);
        let waited = runtime.block_on(tokio::time::timeout(
            SHUTDOWN_GRACE,
            session.wait_for_deletions(),
        ));
        if waited.is_err() {
            warn!(
                pending = session.deletions().pending_count(),
                "exiting with deletions still in flight"
            );
        }
    }
    app.tick(&mut session);

    print_summary(config, &session);

    result
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    runtime: &Runtime,
    session: &mut ReviewSession,
    app: &mut App,
    catalog: &DirectoryCatalog,
) -> Result<()> {
    let (width, _) = crossterm::terminal::size()?;
    session.set_viewport_width(f64::from(width));

    loop {
        app.tick(session);
        terminal.draw(|frame| app.draw(frame, session))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let flow = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(session, key),
            Event::Mouse(mouse) => {
                app.handle_mouse(session, mouse);
                AppFlow::Continue
            }
            Event::Resize(width, _) => {
                session.set_viewport_width(f64::from(width));
                AppFlow::Continue
            }
            _ => AppFlow::Continue,
        };

        match flow {
            AppFlow::Continue => {}
            AppFlow::Quit => break,
            AppFlow::Reload => {
                let result = runtime
                    .block_on(session.load_from(catalog))
                    .map_err(|e| e.to_string());
                app.reloaded(result);
            }
            AppFlow::WelcomeDismissed => {
                // Re-reads the file so an unreadable config is never overwritten
                if let Err(e) = UserConfig::mark_welcome_shown() {
                    warn!(error = %e, "failed to save user config");
                }
            }
        }
    }

    Ok(())
}

fn print_summary(config: &AppConfig, session: &ReviewSession) {
    let stats = session.stats();
    let counts = session.deletions().counts();

    if config.dry_run {
        println!("\n[DRY RUN] Complete");
        println!("   Would have kept: {} items", stats.kept);
        println!("   Would have deleted: {} items", stats.deleted);
        return;
    }

    println!("\nReview finished");
    println!("   Kept: {} items", stats.kept);
    println!("   Deleted: {} items", stats.deleted);
    if counts.failed > 0 {
        println!("   Could not delete {} item(s), see the log for details", counts.failed);
    }
    if counts.pending > 0 {
        println!("   {} deletion(s) did not finish before exit", counts.pending);
    }
}
