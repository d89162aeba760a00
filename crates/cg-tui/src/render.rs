//! Frame building and drawing.
//!
//! [`build_frame`] turns app state into lines of semantically-toned spans; it
//! knows nothing about colors. [`draw`] resolves tones through the theme for
//! the current pass and writes the frame centered on screen.

use crate::app::{App, CoinMode, View};
use crate::format::{
  format_change, format_currency, format_date, format_supply, format_total_supply, Trend,
};
use crate::theme::ThemeTokens;
use cg_models::{CoinRecord, GlobalMarketSnapshot};
use crossterm::cursor::MoveTo;
use crossterm::style::{
  Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};

/// Terminal width at which coin cards go two per row
pub const GRID_MIN_WIDTH: u16 = 100;
/// Below this width cards shrink
pub const NARROW_WIDTH: u16 = 80;
const CARD_WIDTH: usize = 30;
const NARROW_CARD_WIDTH: usize = 25;
const SEARCH_BOX_WIDTH: usize = 36;
const MARKET_BOX_WIDTH: usize = 40;
const GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Text,
  Accent,
  Label,
  Header,
  Border,
  Help,
  Positive,
  Negative,
  Error,
}

impl Tone {
  fn color(self, theme: &ThemeTokens) -> Color {
    match self {
      Tone::Text => theme.text,
      Tone::Accent => theme.accent,
      Tone::Label => theme.label,
      Tone::Header => theme.header,
      Tone::Border => theme.border,
      Tone::Help => theme.help,
      Tone::Positive => theme.positive,
      Tone::Negative | Tone::Error => theme.negative,
    }
  }

  fn is_bold(self) -> bool {
    matches!(
      self,
      Tone::Accent | Tone::Label | Tone::Header | Tone::Positive | Tone::Negative | Tone::Error
    )
  }

  fn for_trend(trend: Trend) -> Self {
    match trend {
      Trend::Up => Tone::Positive,
      Trend::Down => Tone::Negative,
      Trend::Flat => Tone::Text,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
  pub text: String,
  pub tone: Tone,
}

impl Span {
  pub fn new(text: impl Into<String>, tone: Tone) -> Self {
    Self { text: text.into(), tone }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
  pub spans: Vec<Span>,
}

impl Line {
  pub fn new(spans: Vec<Span>) -> Self {
    Self { spans }
  }

  pub fn single(text: impl Into<String>, tone: Tone) -> Self {
    Self { spans: vec![Span::new(text, tone)] }
  }

  fn labelled(label: &str, value: impl Into<String>, tone: Tone) -> Self {
    Self::new(vec![Span::new(label, Tone::Label), Span::new(value, tone)])
  }

  /// Display width in columns
  pub fn width(&self) -> usize {
    self.spans.iter().map(|s| s.text.chars().count()).sum()
  }

  fn truncated(mut self, max: usize) -> Self {
    let mut remaining = max;
    self.spans.retain_mut(|span| {
      if remaining == 0 {
        return false;
      }
      let len = span.text.chars().count();
      if len > remaining {
        span.text = span.text.chars().take(remaining).collect();
        remaining = 0;
      } else {
        remaining -= len;
      }
      true
    });
    self
  }

  fn append(&mut self, other: Line) {
    self.spans.extend(other.spans);
  }
}

pub type Frame = Vec<Line>;

/// Build the frame for the current view
pub fn build_frame(app: &App) -> Frame {
  match app.view {
    View::Home => home_frame(app),
    View::Coin => match app.coin.mode {
      CoinMode::Search => search_frame(app),
      CoinMode::Display => match &app.coin.coin {
        Some(coin) => coin_frame(app, coin),
        None => vec![Line::single("No coin data available", Tone::Error)],
      },
    },
  }
}

fn home_frame(app: &App) -> Frame {
  let mut frame = vec![Line::single("Crypto Market Overview", Tone::Accent), Line::default()];

  if app.home.loading {
    frame.push(Line::single("Loading global crypto data...", Tone::Text));
  } else if let Some(err) = &app.home.error {
    frame.push(Line::single(format!("Error: {}", err), Tone::Error));
  } else if let Some(global) = &app.home.global {
    frame.extend(market_box(global));
  } else {
    frame.push(Line::single("No data available", Tone::Error));
  }

  frame.push(Line::default());
  if app.show_help {
    for entry in [
      "Navigation:",
      "/ or s   search for a coin",
      "tab      switch view",
      "r        refresh data",
      "h        hide help",
      "q        quit",
    ] {
      frame.push(Line::single(entry, Tone::Help));
    }
  } else {
    frame.push(Line::single("/,s: search • r: refresh • h: help • q: quit", Tone::Help));
  }
  frame
}

fn market_box(global: &GlobalMarketSnapshot) -> Vec<Line> {
  let (change, trend) = format_change(global.market_cap_change_pct_24h);
  let body = vec![
    Line::labelled("Total Market Cap: ", format_currency(global.total_market_cap_usd), Tone::Text),
    Line::labelled("24h Change: ", change, Tone::for_trend(trend)),
    Line::labelled("24h Volume: ", format_currency(global.total_volume_usd), Tone::Text),
  ];
  boxed(None, body, MARKET_BOX_WIDTH)
}

fn search_frame(app: &App) -> Frame {
  let mut frame = vec![Line::single("Search Cryptocurrency", Tone::Accent), Line::default()];

  let input = if app.coin.input.is_empty() {
    Line::single("Enter coin name or symbol...", Tone::Help)
  } else {
    Line::new(vec![Span::new(app.coin.input.clone(), Tone::Text), Span::new("_", Tone::Accent)])
  };
  frame.extend(boxed(None, vec![input], SEARCH_BOX_WIDTH));
  frame.push(Line::default());

  if app.coin.loading {
    frame.push(Line::single("Loading coin data...", Tone::Text));
    frame.push(Line::default());
  } else if let Some(err) = &app.coin.error {
    frame.push(Line::single(format!("Error: {}", err), Tone::Error));
    frame.push(Line::default());
  }

  frame.push(Line::single("Enter: search • Esc: home • Ctrl+C: quit", Tone::Help));
  frame
}

fn coin_frame(app: &App, coin: &CoinRecord) -> Frame {
  let (width, _) = app.size;
  let card_width = if width < NARROW_WIDTH { NARROW_CARD_WIDTH } else { CARD_WIDTH };

  let star = if app.config.is_favorite(&coin.id) { " ★" } else { "" };
  let mut frame = vec![
    Line::single(
      format!("╭─ {} ({}){} ─╮", coin.name.to_uppercase(), coin.symbol.to_uppercase(), star),
      Tone::Accent,
    ),
    Line::default(),
  ];

  let price = price_card(coin, card_width);
  let market = market_card(coin, card_width);
  let supply = supply_card(coin, card_width);
  let performance = performance_card(coin, card_width);

  if width >= GRID_MIN_WIDTH {
    frame.extend(side_by_side(price, market, card_width));
    frame.push(Line::default());
    frame.extend(side_by_side(supply, performance, card_width));
  } else {
    for card in [price, market, supply, performance] {
      frame.extend(card);
      frame.push(Line::default());
    }
    frame.pop();
  }

  frame.push(Line::default());
  frame.push(Line::single("/,s: search • Esc: home • q: quit", Tone::Help));
  frame
}

fn price_card(coin: &CoinRecord, width: usize) -> Vec<Line> {
  let body = vec![
    Line::single(format_currency(coin.current_price), Tone::Accent),
    Line::default(),
    Line::labelled("ATH: ", format_currency(coin.all_time_high), Tone::Text),
    Line::single(format!("  {}", format_date(coin.all_time_high_date)), Tone::Help),
    Line::labelled("ATL: ", format_currency(coin.all_time_low), Tone::Text),
    Line::single(format!("  {}", format_date(coin.all_time_low_date)), Tone::Help),
  ];
  boxed(Some("Current Price"), body, width)
}

fn market_card(coin: &CoinRecord, width: usize) -> Vec<Line> {
  let body = vec![
    Line::labelled("Market Cap: ", format_currency(coin.market_cap), Tone::Text),
    Line::labelled("24h Volume: ", format_currency(coin.total_volume), Tone::Text),
  ];
  boxed(Some("Market Data"), body, width)
}

fn supply_card(coin: &CoinRecord, width: usize) -> Vec<Line> {
  let body = vec![
    Line::labelled(
      "Circulating: ",
      format_supply(coin.circulating_supply, &coin.symbol),
      Tone::Text,
    ),
    Line::labelled("Total: ", format_total_supply(coin.total_supply, &coin.symbol), Tone::Text),
  ];
  boxed(Some("Supply Info"), body, width)
}

fn performance_card(coin: &CoinRecord, width: usize) -> Vec<Line> {
  let body = [
    ("24h: ", coin.price_change_pct_24h),
    ("7d: ", coin.price_change_pct_7d),
    ("30d: ", coin.price_change_pct_30d),
    ("90d: ", coin.price_change_pct_90d),
  ]
  .into_iter()
  .map(|(label, pct)| {
    let (text, trend) = format_change(pct);
    Line::labelled(label, text, Tone::for_trend(trend))
  })
  .collect();
  boxed(Some("Performance"), body, width)
}

/// Rounded box `width` columns wide; content is clipped to fit
fn boxed(title: Option<&str>, body: Vec<Line>, width: usize) -> Vec<Line> {
  let inner = width.saturating_sub(4);
  let rule = "─".repeat(width.saturating_sub(2));

  let mut rows = Vec::with_capacity(body.len() + 4);
  if let Some(title) = title {
    rows.push(Line::single(title, Tone::Header));
    rows.push(Line::default());
  }
  rows.extend(body);

  let mut lines = vec![Line::single(format!("╭{}╮", rule), Tone::Border)];
  for row in rows {
    let row = row.truncated(inner);
    let pad = inner - row.width();
    let mut line = Line::single("│ ", Tone::Border);
    line.append(row);
    line.spans.push(Span::new(" ".repeat(pad), Tone::Text));
    line.spans.push(Span::new(" │", Tone::Border));
    lines.push(line);
  }
  lines.push(Line::single(format!("╰{}╯", rule), Tone::Border));
  lines
}

/// Two equal-width columns separated by a gap; the shorter is padded
fn side_by_side(left: Vec<Line>, right: Vec<Line>, left_width: usize) -> Vec<Line> {
  let rows = left.len().max(right.len());
  let mut left = left.into_iter();
  let mut right = right.into_iter();

  (0..rows)
    .map(|_| {
      let mut line =
        left.next().unwrap_or_else(|| Line::single(" ".repeat(left_width), Tone::Text));
      line.spans.push(Span::new(GAP, Tone::Text));
      if let Some(r) = right.next() {
        line.append(r);
      }
      line
    })
    .collect()
}

/// Paint `frame` centered on a `size` screen using `theme`
pub fn draw<W: Write>(
  out: &mut W,
  frame: &[Line],
  theme: &ThemeTokens,
  size: (u16, u16),
) -> io::Result<()> {
  let (width, height) = size;
  out.queue(SetBackgroundColor(theme.background))?;
  out.queue(Clear(ClearType::All))?;

  let top = (height as usize).saturating_sub(frame.len()) / 2;
  for (i, line) in frame.iter().enumerate() {
    let row = top + i;
    if row >= height as usize {
      break;
    }
    let col = (width as usize).saturating_sub(line.width()) / 2;
    out.queue(MoveTo(col as u16, row as u16))?;

    for span in &line.spans {
      out.queue(SetForegroundColor(span.tone.color(theme)))?;
      if span.tone.is_bold() {
        out.queue(SetAttribute(Attribute::Bold))?;
      }
      out.queue(Print(&span.text))?;
      if span.tone.is_bold() {
        out.queue(SetAttribute(Attribute::NormalIntensity))?;
      }
    }
  }

  out.queue(ResetColor)?;
  out.flush()
}
