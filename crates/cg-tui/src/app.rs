//! UI state and key handling. No I/O happens here: keys produce
//! [`Command`]s for the event loop, and fetch events are applied as they arrive.

use cg_client::{FetchEvent, FetchIntent, IntentKind};
use cg_core::Config;
use cg_models::{CoinRecord, GlobalMarketSnapshot};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

/// Longest accepted search query, in characters
pub const MAX_QUERY_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Home,
  Coin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinMode {
  Search,
  Display,
}

/// Side effects requested by a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Fetch(FetchIntent),
  Cancel(IntentKind),
}

#[derive(Debug, Default)]
pub struct HomeState {
  pub global: Option<GlobalMarketSnapshot>,
  pub loading: bool,
  pub error: Option<String>,
}

#[derive(Debug)]
pub struct CoinState {
  pub mode: CoinMode,
  pub input: String,
  pub coin: Option<CoinRecord>,
  pub loading: bool,
  pub error: Option<String>,
}

impl Default for CoinState {
  fn default() -> Self {
    Self { mode: CoinMode::Search, input: String::new(), coin: None, loading: false, error: None }
  }
}

#[derive(Debug)]
pub struct App {
  pub view: View,
  pub home: HomeState,
  pub coin: CoinState,
  pub show_help: bool,
  pub config: Config,
  pub size: (u16, u16),
  quit: bool,
}

impl App {
  pub fn new(config: Config, size: (u16, u16)) -> Self {
    Self {
      view: View::Home,
      home: HomeState::default(),
      coin: CoinState::default(),
      show_help: config.display.show_help,
      config,
      size,
      quit: false,
    }
  }

  /// Initial command: load the global snapshot
  pub fn start(&mut self) -> Command {
    self.load_global()
  }

  pub fn should_quit(&self) -> bool {
    self.quit
  }

  pub fn resize(&mut self, width: u16, height: u16) {
    self.size = (width, height);
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      self.quit = true;
      return None;
    }

    match (key.code, self.view) {
      (KeyCode::Tab, View::Home) => return Some(self.open_search()),
      (KeyCode::Tab, View::Coin) => {
        self.view = View::Home;
        return Some(self.load_global());
      }
      (KeyCode::Esc, View::Coin) => {
        self.view = View::Home;
        return None;
      }
      _ => {}
    }

    match self.view {
      View::Home => self.handle_home_key(key.code),
      View::Coin => match self.coin.mode {
        CoinMode::Search => self.handle_search_key(key),
        CoinMode::Display => self.handle_display_key(key.code),
      },
    }
  }

  fn handle_home_key(&mut self, code: KeyCode) -> Option<Command> {
    match code {
      KeyCode::Char('q') => {
        self.quit = true;
        None
      }
      KeyCode::Char('r') => Some(self.load_global()),
      KeyCode::Char('/') | KeyCode::Char('s') => Some(self.open_search()),
      KeyCode::Char('h') => {
        self.show_help = !self.show_help;
        None
      }
      _ => None,
    }
  }

  // Every printable key edits the query here, including `q`
  fn handle_search_key(&mut self, key: KeyEvent) -> Option<Command> {
    match key.code {
      KeyCode::Enter => {
        if self.coin.input.trim().is_empty() {
          return None;
        }
        self.coin.loading = true;
        self.coin.error = None;
        Some(Command::Fetch(FetchIntent::SearchCoin { query: self.coin.input.clone() }))
      }
      KeyCode::Backspace => {
        self.coin.input.pop();
        None
      }
      KeyCode::Char(c)
        if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
      {
        if self.coin.input.chars().count() < MAX_QUERY_LEN {
          self.coin.input.push(c);
        }
        None
      }
      _ => None,
    }
  }

  fn handle_display_key(&mut self, code: KeyCode) -> Option<Command> {
    match code {
      KeyCode::Char('q') => {
        self.quit = true;
        None
      }
      KeyCode::Char('/') | KeyCode::Char('s') => Some(self.reset_search()),
      _ => None,
    }
  }

  fn load_global(&mut self) -> Command {
    self.home.loading = true;
    Command::Fetch(FetchIntent::LoadGlobal)
  }

  fn open_search(&mut self) -> Command {
    self.view = View::Coin;
    self.reset_search()
  }

  /// Fresh empty search; any coin fetch still running is abandoned
  fn reset_search(&mut self) -> Command {
    self.coin = CoinState::default();
    Command::Cancel(IntentKind::Coin)
  }

  /// Apply a delivered fetch event to the state that issued it
  pub fn apply(&mut self, event: FetchEvent) {
    match event {
      FetchEvent::GlobalReady(snapshot) => {
        self.home.global = Some(snapshot);
        self.home.loading = false;
        self.home.error = None;
      }
      FetchEvent::CoinReady(coin) => {
        debug!("Showing {} ({})", coin.name, coin.id);
        self.coin.coin = Some(coin);
        self.coin.mode = CoinMode::Display;
        self.coin.input.clear();
        self.coin.loading = false;
        self.coin.error = None;
      }
      // A failed refresh replaces the snapshot it was refreshing
      FetchEvent::Failed { kind: IntentKind::Global, error } => {
        self.home.loading = false;
        self.home.global = None;
        self.home.error = Some(error.to_string());
      }
      FetchEvent::Failed { kind: IntentKind::Coin, error } => {
        self.coin.loading = false;
        self.coin.error = Some(error.to_string());
      }
    }
  }
}
