use ratatui::style::Color;

/// A full color palette. Cycled at runtime with Ctrl+T and persisted by name.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub static THEMES: [Theme; 3] = [
  Theme {
    name: "paper",
    bg: Color::Rgb(250, 247, 240),
    fg: Color::Rgb(68, 64, 60),
    accent: Color::Rgb(190, 18, 60),
    muted: Color::Rgb(168, 162, 158),
    border: Color::Rgb(214, 207, 196),
    status: Color::Rgb(21, 128, 61),
    error: Color::Rgb(185, 28, 28),
    highlight_fg: Color::Rgb(250, 247, 240),
    highlight_bg: Color::Rgb(190, 18, 60),
    stripe_bg: Color::Rgb(244, 240, 232),
    key_fg: Color::Rgb(250, 247, 240),
    key_bg: Color::Rgb(120, 113, 108),
  },
  Theme {
    name: "midnight",
    bg: Color::Rgb(15, 23, 42),
    fg: Color::Rgb(226, 232, 240),
    accent: Color::Rgb(251, 113, 133),
    muted: Color::Rgb(100, 116, 139),
    border: Color::Rgb(51, 65, 85),
    status: Color::Rgb(74, 222, 128),
    error: Color::Rgb(248, 113, 113),
    highlight_fg: Color::Rgb(15, 23, 42),
    highlight_bg: Color::Rgb(251, 113, 133),
    stripe_bg: Color::Rgb(23, 32, 54),
    key_fg: Color::Rgb(15, 23, 42),
    key_bg: Color::Rgb(148, 163, 184),
  },
  Theme {
    name: "forest",
    bg: Color::Rgb(24, 33, 27),
    fg: Color::Rgb(220, 228, 214),
    accent: Color::Rgb(163, 217, 119),
    muted: Color::Rgb(110, 127, 106),
    border: Color::Rgb(56, 72, 58),
    status: Color::Rgb(163, 217, 119),
    error: Color::Rgb(235, 111, 92),
    highlight_fg: Color::Rgb(24, 33, 27),
    highlight_bg: Color::Rgb(163, 217, 119),
    stripe_bg: Color::Rgb(30, 41, 34),
    key_fg: Color::Rgb(24, 33, 27),
    key_bg: Color::Rgb(110, 127, 106),
  },
];
