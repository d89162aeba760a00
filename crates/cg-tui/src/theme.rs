//! Time-of-day color theme

use cg_core::config::ThemeConfig;
use chrono::{NaiveTime, Timelike};
use crossterm::style::Color;

/// First hour (inclusive) of the day theme
pub const DAY_START_HOUR: u32 = 6;
/// First hour of the night theme
pub const NIGHT_START_HOUR: u32 = 18;

const LAVENDER: Color = Color::Rgb { r: 0xE6, g: 0xE6, b: 0xFA };
const PEACH: Color = Color::Rgb { r: 0xFF, g: 0xDA, b: 0xB9 };
const SKY_BLUE: Color = Color::Rgb { r: 0x87, g: 0xCE, b: 0xEB };
const PINK: Color = Color::Rgb { r: 0xFF, g: 0xB6, b: 0xC1 };
const GREEN: Color = Color::Rgb { r: 0x00, g: 0xFF, b: 0x00 };
const RED: Color = Color::Rgb { r: 0xFF, g: 0x00, b: 0x00 };

const DEFAULT_DAY_BG: Color = Color::Rgb { r: 0xF5, g: 0xDE, b: 0xB3 };
const DEFAULT_NIGHT_BG: Color = Color::Rgb { r: 0x19, g: 0x19, b: 0x70 };
const DEFAULT_ACCENT: Color = Color::Rgb { r: 0x98, g: 0xFB, b: 0x98 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Day,
  Night,
}

/// Resolved colors for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeTokens {
  pub phase: Phase,
  pub background: Color,
  pub text: Color,
  pub accent: Color,
  pub label: Color,
  pub header: Color,
  pub border: Color,
  pub help: Color,
  pub positive: Color,
  pub negative: Color,
}

/// Pick the theme for local time `now`. `force_theme` of `day` or `night`
/// wins over the clock; anything else is ignored.
pub fn theme_for(now: NaiveTime, config: &ThemeConfig) -> ThemeTokens {
  let phase = match config.force_theme.as_str() {
    "day" => Phase::Day,
    "night" => Phase::Night,
    _ if (DAY_START_HOUR..NIGHT_START_HOUR).contains(&now.hour()) => Phase::Day,
    _ => Phase::Night,
  };

  let colors = &config.custom_colors;
  let (background, text) = match phase {
    Phase::Day => (parse_hex_color(&colors.day_bg).unwrap_or(DEFAULT_DAY_BG), Color::Black),
    Phase::Night => (parse_hex_color(&colors.night_bg).unwrap_or(DEFAULT_NIGHT_BG), Color::White),
  };

  ThemeTokens {
    phase,
    background,
    text,
    accent: parse_hex_color(&colors.accent).unwrap_or(DEFAULT_ACCENT),
    label: PEACH,
    header: SKY_BLUE,
    border: LAVENDER,
    help: PINK,
    positive: GREEN,
    negative: RED,
  }
}

/// `#RRGGBB` to an RGB color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
  let digits = hex.strip_prefix('#')?;
  if digits.len() != 6 || !digits.is_ascii() {
    return None;
  }
  let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
  Some(Color::Rgb { r: channel(0..2)?, g: channel(2..4)?, b: channel(4..6)? })
}
