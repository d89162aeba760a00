/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use anyhow::{Context, Result};
use cg_client::{CoinGeckoClient, Dispatcher, MarketDataSource};
use cg_core::Config;
use clap::Parser;
use dotenvy::dotenv;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod format;
mod render;
mod terminal;
mod theme;

use crate::app::App;
use crate::terminal::TerminalSession;

const LOG_FILE_NAME: &str = "neongecko.log";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "neongecko")]
struct Cli {
  /// Config file (defaults to ~/.config/neongecko/config.json)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Verbose output
  #[arg(short, long)]
  verbose: bool,

  /// Log file (defaults to neongecko.log next to the config file)
  #[arg(long)]
  log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
  // Load environment variables
  dotenv().ok();

  let cli = Cli::parse();

  let config_path = Config::resolve_path(cli.config.as_deref())?;
  let log_path = match &cli.log_file {
    Some(path) => path.clone(),
    None => default_log_path(&config_path),
  };
  init_logging(&log_path, cli.verbose)?;

  let config = Config::load(Some(&config_path)).unwrap_or_else(|e| {
    warn!("Failed to load config, using defaults: {}", e);
    let mut config = Config::default();
    config.apply_env_overrides();
    config
  });
  info!("Starting neongecko (config: {})", config_path.display());

  let runtime = tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .thread_name("neongecko-fetch")
    .build()
    .context("failed to start async runtime")?;
  let runtime_guard = runtime.enter();

  let source: Arc<dyn MarketDataSource> = Arc::new(CoinGeckoClient::new(&config)?);
  let (mut dispatcher, mut events) = Dispatcher::new(runtime.handle().clone());

  let size = crossterm::terminal::size().context("failed to read terminal size")?;
  let mut app = App::new(config, size);

  let result = {
    let _session = TerminalSession::enter().context("failed to set up terminal")?;
    terminal::run(&mut app, &mut dispatcher, &mut events, source)
  };

  drop(dispatcher);
  drop(runtime_guard);
  runtime.shutdown_timeout(Duration::from_millis(500));
  info!("neongecko stopped");
  result
}

fn default_log_path(config_path: &Path) -> PathBuf {
  config_path.parent().unwrap_or_else(|| Path::new(".")).join(LOG_FILE_NAME)
}

/// Log to a file: the terminal belongs to the UI
fn init_logging(path: &Path, verbose: bool) -> Result<()> {
  if let Some(dir) = path.parent() {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create log directory {}", dir.display()))?;
  }
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("failed to open log file {}", path.display()))?;

  let log_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}
