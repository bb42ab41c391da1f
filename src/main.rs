// ABOUTME: Command-line front end for previewing and running social-proof notifications

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use social_proof::config::NotificationConfig;
use social_proof::content::{ContentResolver, HttpTransport};
use social_proof::error::RenderError;
use social_proof::render::{HtmlRenderer, InteractionSender, RenderHandle, Renderer};
use social_proof::throttle::{FileStore, SystemClock, ThrottleGate};
use social_proof::{NotificationController, NotificationPayload, Phase};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "social-proof", version, about = "Throttled social-proof notifications")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one notification lifecycle and print the rendered markup
    Run {
        /// TOML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// State file holding the last-shown timestamp
        #[arg(short, long)]
        state: Option<PathBuf>,
        /// Skip the initial delay
        #[arg(long)]
        no_delay: bool,
    },
    /// Resolve notification content without displaying it
    Preview {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
    /// Show the throttle state
    Status {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            config,
            state,
            no_delay,
        } => {
            let mut config = load_config(config.as_deref())?;
            if no_delay {
                config.initial_delay = 0;
            }
            run(config, state).await
        }
        Command::Preview { config, count } => preview(load_config(config.as_deref())?, count).await,
        Command::Status { config, state } => status(&load_config(config.as_deref())?, state),
    }
}

fn load_config(path: Option<&Path>) -> Result<NotificationConfig> {
    match path {
        Some(path) => NotificationConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(NotificationConfig::default()),
    }
}

fn state_store(path: Option<PathBuf>) -> Arc<FileStore> {
    Arc::new(FileStore::new(path.unwrap_or_else(FileStore::default_location)))
}

async fn run(config: NotificationConfig, state: Option<PathBuf>) -> Result<()> {
    let renderer = Arc::new(ConsoleRenderer {
        html: HtmlRenderer::new(&config.theme),
    });
    let controller = NotificationController::builder(config)
        .with_store(state_store(state))
        .with_clock(Arc::new(SystemClock))
        .with_transport(Arc::new(HttpTransport::with_timeout(FETCH_TIMEOUT)?))
        .with_renderer(renderer)
        .build();

    if !controller.init() {
        println!("Notification throttled; try again later.");
        return Ok(());
    }

    let tick_rate = Duration::from_millis(100);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                controller.destroy();
                break;
            }
            _ = tokio::time::sleep(tick_rate) => {
                if controller.phase() == Phase::Idle && controller.pending_timers() == 0 {
                    break;
                }
            }
        }
    }

    Ok(())
}

async fn preview(config: NotificationConfig, count: usize) -> Result<()> {
    let resolver = ContentResolver::new(
        Arc::new(config),
        Arc::new(HttpTransport::with_timeout(FETCH_TIMEOUT)?),
        Box::new(StdRng::from_entropy()),
    );
    for _ in 0..count {
        print_payload(&resolver.resolve().await);
    }
    Ok(())
}

fn status(config: &NotificationConfig, state: Option<PathBuf>) -> Result<()> {
    let store = state_store(state);
    println!("State file: {}", store.path().display());
    let gate = ThrottleGate::new(config, store, Arc::new(SystemClock));

    if !gate.is_enabled() {
        println!("Throttling disabled (saveToStorage = false)");
    }
    match gate.last_shown() {
        Some(time) => println!("Last shown: {}", time.to_rfc3339()),
        None => println!("Last shown: never"),
    }
    println!("Minimum interval: {}h", config.min_time_between);
    println!("May show now: {}", if gate.may_show() { "yes" } else { "no" });
    Ok(())
}

fn print_payload(payload: &NotificationPayload) {
    match &payload.timestamp {
        Some(ts) => println!("{} ({})", payload.message, ts),
        None => println!("{}", payload.message),
    }
}

/// HTML renderer that also prints each lifecycle step to stdout.
struct ConsoleRenderer {
    html: HtmlRenderer,
}

impl Renderer for ConsoleRenderer {
    fn materialize(
        &self,
        payload: &NotificationPayload,
        config: &NotificationConfig,
    ) -> Result<RenderHandle, RenderError> {
        let handle = self.html.materialize(payload, config)?;
        print_payload(payload);
        if let Some(rendered) = self.html.get(&handle) {
            println!("{}", rendered.markup);
        }
        Ok(handle)
    }

    fn play_exit(&self, handle: &RenderHandle) {
        self.html.play_exit(handle);
        println!("[closing]");
    }

    fn detach(&self, handle: &RenderHandle) {
        self.html.detach(handle);
        println!("[closed]");
    }

    fn subscribe(&self, handle: &RenderHandle, events: InteractionSender) {
        self.html.subscribe(handle, events);
    }
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "social_proof=info".into())
    };

    // Log to a timestamped file; fall back to stderr when that is not possible
    let log_dir = dirs::home_dir()
        .map(|home| home.join(".social-proof").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".social-proof/logs"));
    let log_file = log_dir.join(format!(
        "social-proof-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = std::fs::create_dir_all(&log_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
    });

    match file {
        Ok(file) => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(file)
                    .with_ansi(false),
            )
            .with(filter())
            .init(),
        Err(_) => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .with(filter())
            .init(),
    }
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
