mod app;
mod catalog;
mod cloudinary;
mod config;
mod constants;
mod counter;
mod filter;
mod history;
mod input;
mod player;
mod theme;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use app::App;
use catalog::DeviceTab;
use config::Config;
use history::{FileBackend, HistoryStore, MAX_HISTORY_SIZE};

// --- CLI ---

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTab {
  Mobile,
  Pc,
}

impl CliTab {
  fn resolve(self) -> DeviceTab {
    match self {
      CliTab::Mobile => DeviceTab::Mobile,
      CliTab::Pc => DeviceTab::Pc,
    }
  }
}

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Start on this tab instead of the last remembered one
  #[arg(short, long)]
  tab: Option<CliTab>,

  /// Print a shell completion script and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Logging ---

/// Log to a file under the platform data dir so output never fights the TUI.
fn init_logging() -> Option<WorkerGuard> {
  let dirs = ProjectDirs::from("", "", "vguide")?;
  let log_dir = dirs.data_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::never(log_dir, "vguide.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    let mut command = Args::command();
    let binary_name = command.get_name().to_string();
    generate(shell, &mut command, binary_name, &mut std::io::stdout());
    return Ok(());
  }

  let _guard = init_logging();
  info!(version = env!("CARGO_PKG_VERSION"), "starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let config = Config::load();
  let history = HistoryStore::open(Box::new(FileBackend::new()), MAX_HISTORY_SIZE);
  let mut app = App::new(config, history);
  if let Some(tab) = args.tab {
    app.active_tab = tab.resolve();
  }

  app.trigger_catalog_load();
  app.trigger_visit_count();

  loop {
    app.check_pending();
    app.apply_search_if_due(Instant::now());
    app.expire_error();
    app.player.check_finished();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key).await?;
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  app.save_config();
  app.player.stop().await?;
  Ok(())
}
