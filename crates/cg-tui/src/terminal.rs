//! Terminal session and the UI event loop

use crate::app::{App, Command};
use crate::render::{self, Frame};
use crate::theme::{theme_for, ThemeTokens};
use anyhow::Result;
use cg_client::commands;
use cg_client::{Delivery, Dispatcher, FetchEvent, MarketDataSource};
use chrono::Local;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
  self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
  LeaveAlternateScreen, SetTitle,
};
use crossterm::execute;
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

/// How long one loop iteration waits for input
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Alternate screen in raw mode for as long as this lives
pub struct TerminalSession;

impl TerminalSession {
  pub fn enter() -> io::Result<Self> {
    execute!(
      stdout(),
      EnterAlternateScreen,
      DisableLineWrap,
      Hide,
      Clear(ClearType::All),
      SetTitle("neongecko")
    )?;
    terminal::enable_raw_mode()?;
    Ok(Self)
  }
}

impl Drop for TerminalSession {
  fn drop(&mut self) {
    if let Err(e) = execute!(stdout(), Show, EnableLineWrap, LeaveAlternateScreen) {
      warn!("Failed to restore terminal: {}", e);
    }
    if let Err(e) = terminal::disable_raw_mode() {
      warn!("Failed to disable raw mode: {}", e);
    }
  }
}

/// Drive the UI until the user quits.
///
/// Single-threaded: drains delivered fetch events, redraws when the frame
/// changed, then waits briefly for a key. Fetches run on the dispatcher's
/// runtime and never block this loop.
pub fn run(
  app: &mut App,
  dispatcher: &mut Dispatcher<FetchEvent>,
  events: &mut UnboundedReceiver<Delivery<FetchEvent>>,
  source: Arc<dyn MarketDataSource>,
) -> Result<()> {
  let mut out = stdout();
  let mut last_drawn: Option<(Frame, ThemeTokens, (u16, u16))> = None;

  let start = app.start();
  perform(start, dispatcher, &source);

  while !app.should_quit() {
    while let Ok(delivery) = events.try_recv() {
      if dispatcher.accept(&delivery.ticket) {
        app.apply(delivery.event);
      }
    }

    let theme = theme_for(Local::now().time(), &app.config.theme);
    let frame = render::build_frame(app);
    let current = (frame, theme, app.size);
    if last_drawn.as_ref() != Some(&current) {
      render::draw(&mut out, &current.0, &current.1, current.2)?;
      last_drawn = Some(current);
    }

    if event::poll(POLL_INTERVAL)? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          if let Some(command) = app.handle_key(key) {
            perform(command, dispatcher, &source);
          }
        }
        Event::Resize(width, height) => app.resize(width, height),
        _ => {}
      }
    }
  }

  debug!("Quit requested");
  dispatcher.cancel_all();
  Ok(())
}

fn perform(
  command: Command,
  dispatcher: &mut Dispatcher<FetchEvent>,
  source: &Arc<dyn MarketDataSource>,
) {
  match command {
    Command::Fetch(intent) => {
      commands::issue(dispatcher, Arc::clone(source), intent);
    }
    Command::Cancel(kind) => dispatcher.cancel(kind),
  }
}
