use anyhow::{Context, Result};
use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub async fn handle_key_event(app: &mut App, key: event::KeyEvent) -> Result<()> {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
    app.trigger_catalog_load();
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
    if app.player.is_playing() {
      app.player.stop().await.context("Failed to stop playback")?;
    }
    return Ok(());
  }

  match app.mode {
    AppMode::Browse => handle_browse_key(app, key).await.context("Failed to handle browse key event")?,
    AppMode::Search => handle_search_key(app, key).await.context("Failed to handle search key event")?,
    AppMode::History => handle_history_key(app, key).await.context("Failed to handle history key event")?,
  }
  Ok(())
}

/// Select the highlighted catalog row and start playback.
async fn play_selected(app: &mut App) {
  let Some(selected) = app.list_state.selected() else { return };
  let Some(&idx) = app.filtered_indices.get(selected) else { return };
  let Some(video) = app.active_list().get(idx).cloned() else { return };

  app.clear_error();
  app.select_video(video.clone());
  if let Err(e) = app.player.play(&video).await {
    app.set_error(format!("Playback error: {}", e));
  }
}

async fn handle_browse_key(app: &mut App, key: event::KeyEvent) -> Result<()> {
  match key.code {
    KeyCode::Enter => {
      play_selected(app).await;
    }
    KeyCode::Tab => {
      let next = app.active_tab.other();
      app.change_tab(next).await;
    }
    KeyCode::Char('/') => {
      app.mode = AppMode::Search;
    }
    KeyCode::Char('h') => {
      app.mode = AppMode::History;
      if !app.history.entries().is_empty() && app.history_state.selected().is_none() {
        app.history_state.select(Some(0));
      }
    }
    KeyCode::Down | KeyCode::Char('j') => {
      let count = app.filtered_indices.len();
      if count > 0 {
        let i = app.list_state.selected().map_or(0, |i| (i + 1) % count);
        app.list_state.select(Some(i));
      }
    }
    KeyCode::Up | KeyCode::Char('k') => {
      let count = app.filtered_indices.len();
      if count > 0 {
        let i = app.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
        app.list_state.select(Some(i));
      }
    }
    KeyCode::Esc => {
      if app.selected.is_some() {
        app.clear_selection().await;
      } else {
        app.mode = AppMode::Search;
      }
    }
    _ => {}
  }
  Ok(())
}

async fn handle_search_key(app: &mut App, key: event::KeyEvent) -> Result<()> {
  match key.code {
    KeyCode::Enter => {
      app.apply_search();
      app.mode = AppMode::Browse;
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.search_input, app.cursor_position);
      app.search_input.insert(byte_idx, c);
      app.cursor_position += 1;
      app.arm_search_debounce();
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.search_input, app.cursor_position);
        app.search_input.remove(byte_idx);
        app.arm_search_debounce();
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.search_input.chars().count() {
        let byte_idx = char_to_byte_index(&app.search_input, app.cursor_position);
        app.search_input.remove(byte_idx);
        app.arm_search_debounce();
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.search_input.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.search_input.chars().count();
    }
    KeyCode::Esc => {
      if !app.search_input.is_empty() {
        app.clear_search().await;
      } else {
        app.mode = AppMode::Browse;
      }
    }
    KeyCode::Down => {
      app.mode = AppMode::Browse;
    }
    _ => {}
  }
  Ok(())
}

async fn handle_history_key(app: &mut App, key: event::KeyEvent) -> Result<()> {
  match key.code {
    KeyCode::Enter => {
      let video =
        app.history_state.selected().and_then(|i| app.history.entries().get(i)).map(|e| e.video.clone());
      if let Some(video) = video {
        app.clear_error();
        app.select_video(video.clone());
        // The entry just moved to the front
        app.history_state.select(Some(0));
        if let Err(e) = app.player.play(&video).await {
          app.set_error(format!("Playback error: {}", e));
        }
      }
    }
    KeyCode::Char('w') | KeyCode::Char(' ') => {
      let id = app
        .history_state
        .selected()
        .and_then(|i| app.history.entries().get(i))
        .map(|e| e.video.public_id.clone());
      if let Some(id) = id {
        app.history.toggle_watched(&id);
      }
    }
    KeyCode::Char('x') => {
      app.history.clear();
      app.history_state.select(None);
    }
    KeyCode::Down | KeyCode::Char('j') => {
      let count = app.history.entries().len();
      if count > 0 {
        let i = app.history_state.selected().map_or(0, |i| (i + 1) % count);
        app.history_state.select(Some(i));
      }
    }
    KeyCode::Up | KeyCode::Char('k') => {
      let count = app.history.entries().len();
      if count > 0 {
        let i = app.history_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
        app.history_state.select(Some(i));
      }
    }
    KeyCode::Esc | KeyCode::Char('h') => {
      app.mode = AppMode::Browse;
    }
    _ => {}
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 0), 0); // 'a'
    assert_eq!(char_to_byte_index(s, 1), 1); // 'é' starts at byte 1
    assert_eq!(char_to_byte_index(s, 2), 3); // '日' starts at byte 3
    assert_eq!(char_to_byte_index(s, 3), 6); // past end
  }

  #[test]
  fn char_to_byte_empty() {
    assert_eq!(char_to_byte_index("", 0), 0);
    assert_eq!(char_to_byte_index("", 5), 0);
  }
}
