//! src/main.rs
//! Headless front end: lists the configured directory once and prints it.
//!
//! Usage: `jetfiles [SEARCH] [--json]`

use std::{panic::PanicHookInfo, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use tokio::{signal, sync::watch};
use tracing::{error, info, warn};

use jetfiles_core::{
    HomeStateHolder, Logger,
    config::Config,
    data::{FileRepository, LocalFileRepository},
    model::HomeUiState,
    view::FileListView,
};

#[derive(Debug, Default)]
struct Args {
    search: Option<String>,
    json: bool,
}

impl Args {
    fn parse() -> Self {
        let mut args = Self::default();
        for arg in std::env::args().skip(1) {
            if arg == "--json" {
                args.json = true;
            } else if args.search.is_none() {
                args.search = Some(arg);
            }
        }
        args
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> Result<()> {
    setup_panic_handler();

    let args = Args::parse();

    let (config, config_error) = match Config::load().await {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let _log_guard = Logger::init_tracing(&config.log).context("Failed to initialize logging")?;
    info!("Starting jetfiles");
    if let Some(e) = config_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    let root: PathBuf = config
        .resolve_root_dir()
        .context("Failed to determine directory to list")?;

    let repository: Arc<dyn FileRepository> = Arc::new(LocalFileRepository::from_config(&config));
    let holder = HomeStateHolder::new(repository, root);

    if let Some(search) = &args.search {
        holder.search_text_changed(search);
    }

    let mut ui_rx = holder.subscribe();
    let state = tokio::select! {
        state = wait_until_settled(&mut ui_rx) => state?,
        _ = signal::ctrl_c() => {
            warn!("Interrupted before the listing finished");
            holder.shutdown();
            return Ok(());
        }
    };

    let view = FileListView::from_state(&state);
    if args.json {
        println!("{}", view.to_json().context("Failed to encode listing")?);
    } else {
        print!("{}", view.render_text());
    }

    // The error has been presented; drain it like the screen would.
    if let Some(shown) = state.head_error() {
        holder.error_shown(shown.id);
    }

    holder.shutdown();
    info!("Application exited cleanly");
    Ok(())
}

async fn wait_until_settled(rx: &mut watch::Receiver<HomeUiState>) -> Result<HomeUiState> {
    let state = rx
        .wait_for(|s: &HomeUiState| !s.is_loading())
        .await
        .context("State holder went away")?
        .clone();
    Ok(state)
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
