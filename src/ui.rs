use chrono::Local;
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, List, ListItem, Padding, Paragraph, Tabs},
};

use crate::app::{App, AppMode, LoadStatus};
use crate::catalog::DeviceTab;
use crate::cloudinary::video_url;
use crate::history::MAX_HISTORY_SIZE;
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, tabs_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_tabs(frame, app, tabs_area);
  render_main(frame, app, main_area);
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▶ vguide ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let titles: Vec<Line> = DeviceTab::ALL.iter().map(|tab| Line::from(format!(" {} ", tab.label()))).collect();
  let selected = DeviceTab::ALL.iter().position(|tab| *tab == app.active_tab).unwrap_or(0);
  let tabs = Tabs::new(titles)
    .select(selected)
    .style(Style::default().fg(theme.muted))
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD))
    .divider("│");
  frame.render_widget(tabs, area);
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  let [list_area, side_area] = Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)]).areas(area);
  let [history_area, playing_area] =
    Layout::vertical([Constraint::Length(MAX_HISTORY_SIZE as u16 + 2), Constraint::Min(3)]).areas(side_area);

  render_catalog(frame, app, list_area);
  render_history(frame, app, history_area);
  render_now_playing(frame, app, playing_area);
}

fn render_catalog(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();

  let block = Block::bordered()
    .title(catalog_title(app))
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border));

  match app.load_status {
    LoadStatus::Loading => {
      let text = Paragraph::new("Loading videos…")
        .style(Style::default().fg(theme.muted))
        .alignment(Alignment::Center)
        .block(block);
      frame.render_widget(text, area);
      return;
    }
    LoadStatus::Error => {
      let text = Paragraph::new("The video list could not be loaded.\n\nPress Ctrl+R to try again.")
        .style(Style::default().fg(theme.error))
        .alignment(Alignment::Center)
        .block(block);
      frame.render_widget(text, area);
      return;
    }
    LoadStatus::Success => {}
  }

  if app.filtered_indices.is_empty() {
    let msg = if app.applied_query.is_empty() {
      "This catalog has no videos.".to_string()
    } else {
      format!("No videos match '{}'.", app.applied_query)
    };
    let text = Paragraph::new(msg).style(Style::default().fg(theme.muted)).alignment(Alignment::Center).block(block);
    frame.render_widget(text, area);
    return;
  }

  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = app
    .filtered_indices
    .iter()
    .enumerate()
    .map(|(row, &idx)| {
      let video = &app.active_list()[idx];
      let is_selected = Some(row) == app.list_state.selected();
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if row % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let right = video.format.clone();
      let right_w = right.chars().count();
      let title_max = inner_w.saturating_sub(right_w + 2);
      let title = truncate_str(&video.display_title(), title_max);
      let title_w = title.chars().count();
      let gap = inner_w.saturating_sub(title_w + right_w);

      let line = Line::from(vec![
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(theme.muted)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn catalog_title(app: &App) -> String {
  let total = app.active_list().len();
  let shown = app.filtered_indices.len();
  if app.applied_query.is_empty() {
    format!(" {} videos ({}) ", app.active_tab.label(), total)
  } else {
    format!(" {} videos ({}/{}) ", app.active_tab.label(), shown, total)
  }
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let active = app.mode == AppMode::History;
  let border_color = if active { theme.accent } else { theme.border };

  let block = Block::bordered()
    .title(" Recently Viewed ")
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color));

  if app.history.entries().is_empty() {
    let text = Paragraph::new("Nothing viewed yet.").style(Style::default().fg(theme.muted)).block(block);
    frame.render_widget(text, area);
    return;
  }

  let inner_w = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = app
    .history
    .entries()
    .iter()
    .map(|entry| {
      let mark = if entry.watched { "✓ " } else { "  " };
      let mark_w = mark.chars().count();
      let fg = if entry.watched { theme.muted } else { theme.fg };
      let date = entry.viewed_at.with_timezone(&Local).format("%b %d").to_string();
      let date_w = date.chars().count();
      let title_max = inner_w.saturating_sub(date_w + 2 + mark_w);
      let title = truncate_str(&entry.video.display_title(), title_max);
      let gap = inner_w.saturating_sub(mark_w + title.chars().count() + date_w);

      ListItem::new(Line::from(vec![
        Span::styled(mark, Style::default().fg(theme.status)),
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(date, Style::default().fg(theme.muted)),
      ]))
    })
    .collect();

  let highlight = if active {
    Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
  } else {
    Style::default()
  };
  let list = List::new(items).block(block).highlight_symbol("▶ ").highlight_style(highlight);
  frame.render_stateful_widget(list, area, &mut app.history_state);
}

fn render_now_playing(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let block = Block::bordered()
    .title(" Now Playing ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.border))
    .padding(Padding::horizontal(1));

  let Some(ref video) = app.selected else {
    let text = Paragraph::new("Press Enter on a video to play it.")
      .style(Style::default().fg(theme.muted))
      .block(block);
    frame.render_widget(text, area);
    return;
  };

  let inner_w = area.width.saturating_sub(4) as usize;
  let mut lines = vec![
    Line::from(""),
    Line::from(Span::styled(
      truncate_str(&video.display_title(), inner_w),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )),
    Line::from(""),
    Line::from(vec![
      Span::styled("Id      ", Style::default().fg(theme.muted)),
      Span::styled(truncate_str(&video.public_id, inner_w.saturating_sub(8)), Style::default().fg(theme.fg)),
    ]),
    Line::from(vec![
      Span::styled("Format  ", Style::default().fg(theme.muted)),
      Span::styled(video.format.as_str(), Style::default().fg(theme.fg)),
    ]),
    Line::from(""),
    Line::from(Span::styled(
      truncate_str(&video_url(video), inner_w),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
  ];
  if !app.player.is_playing() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Playback finished. Enter replays.", Style::default().fg(theme.muted))));
  }

  frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if app.player.is_playing() {
    (" ♪ Playing".to_string(), Style::default().fg(theme.status))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let border_color = if app.mode == AppMode::Search { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search ")
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.search_input, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .search_input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if app.mode == AppMode::Search {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let is_playing = app.player.is_playing();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Browse => {
      let mut k = vec![("Enter", "Play"), ("j/k", "Navigate"), ("Tab", "Switch tab"), ("/", "Search"), ("h", "History")];
      if is_playing {
        k.push(("^s", "Stop"));
      }
      k.push(("^r", "Reload"));
      k.push(("^t", "Theme"));
      if app.selected.is_some() {
        k.push(("Esc", "Deselect"));
      }
      k
    }
    AppMode::Search => {
      let esc_label = if app.search_input.is_empty() { "Browse" } else { "Clear" };
      vec![("Enter", "Apply"), ("Esc", esc_label), ("↓", "Browse"), ("^t", "Theme")]
    }
    AppMode::History => {
      vec![("Enter", "Play"), ("j/k", "Navigate"), ("w", "Watched"), ("x", "Clear all"), ("Esc", "Back")]
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let right_label = match app.visit_count {
    Some(count) => format!("{} visits · {} ", count, theme.name),
    None => format!("{} ", theme.name),
  };
  let right = Line::from(Span::styled(&right_label, Style::default().fg(theme.muted)));
  let right_area = Rect {
    x: area.x + area.width.saturating_sub(right_label.chars().count() as u16),
    width: right_label.chars().count() as u16,
    ..area
  };
  frame.render_widget(right, right_area);
}
