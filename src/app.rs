use anyhow::Result;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::catalog::{DeviceTab, Video, VideoCatalog};
use crate::cloudinary;
use crate::config::Config;
use crate::constants::constants;
use crate::counter;
use crate::filter;
use crate::history::HistoryStore;
use crate::player::VideoPlayer;
use crate::theme::THEMES;

// --- Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Browse,
  Search,
  History,
}

/// Where the catalog load stands. There is no partial success: both device
/// lists arrive together or the whole load fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
  Loading,
  Success,
  Error,
}

/// Shown when the catalog fetch fails; the user retries manually.
const LOAD_ERROR_MSG: &str = "Could not load the video list. Press Ctrl+R to retry.";

/// In-flight async task receivers.
#[derive(Default)]
pub(crate) struct AsyncTasks {
  pub(crate) catalog_rx: Option<oneshot::Receiver<Result<VideoCatalog>>>,
  pub(crate) visits_rx: Option<oneshot::Receiver<Option<u64>>>,
}

pub struct App {
  pub mode: AppMode,
  pub theme_index: usize,
  pub active_tab: DeviceTab,
  pub catalog: VideoCatalog,
  pub load_status: LoadStatus,
  /// Raw text in the search box. Mutates on every keystroke.
  pub search_input: String,
  /// Cursor position within the search input (char index).
  pub cursor_position: usize,
  /// Horizontal scroll offset for the search input.
  pub input_scroll: usize,
  /// The query the visible list is actually filtered by. Trails
  /// `search_input` by the debounce window.
  pub applied_query: String,
  /// When the debounce window expires; re-armed on every edit.
  search_deadline: Option<Instant>,
  /// Indices into the active tab's list that match `applied_query`.
  /// When the query is empty, contains all indices.
  pub filtered_indices: Vec<usize>,
  pub list_state: ListState,
  pub history_state: ListState,
  pub selected: Option<Video>,
  pub history: HistoryStore,
  pub player: VideoPlayer,
  pub visit_count: Option<u64>,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  pub should_quit: bool,
  pub(crate) tasks: AsyncTasks,
  /// When the last error was set. Drives the auto-dismiss after 5 seconds.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(config: Config, history: HistoryStore) -> Self {
    let theme_index = if let Some(ref name) = config.theme_name {
      THEMES.iter().position(|t| t.name == name.as_str()).unwrap_or(0)
    } else {
      0
    };
    let active_tab =
      if let Some(ref tab) = config.start_tab { DeviceTab::from_config(tab) } else { DeviceTab::Mobile };

    Self {
      mode: AppMode::Browse,
      theme_index,
      active_tab,
      catalog: VideoCatalog::default(),
      load_status: LoadStatus::Loading,
      search_input: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      applied_query: String::new(),
      search_deadline: None,
      filtered_indices: Vec::new(),
      list_state: ListState::default(),
      history_state: ListState::default(),
      selected: None,
      history,
      player: VideoPlayer::new(),
      visit_count: None,
      last_error: None,
      status_message: None,
      should_quit: false,
      tasks: AsyncTasks::default(),
      error_time: None,
    }
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    &THEMES[self.theme_index]
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  /// Clear the current error message and its expiry timer.
  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after 5 seconds.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(5)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  pub fn save_config(&self) {
    let config = Config {
      theme_name: Some(self.theme().name.to_string()),
      start_tab: Some(self.active_tab.label().to_lowercase()),
    };
    config.save();
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  /// The active tab's full, unfiltered list.
  pub fn active_list(&self) -> &[Video] {
    self.catalog.list(self.active_tab)
  }

  /// Rebuild `filtered_indices` for the active tab and applied query.
  /// Clamps the list selection to stay within the filtered range.
  pub fn recompute_filter(&mut self) {
    self.filtered_indices = filter::filter_indices(self.catalog.list(self.active_tab), &self.applied_query);
    // Clamp selection to new filtered range
    if self.filtered_indices.is_empty() {
      self.list_state.select(None);
    } else {
      let sel = self.list_state.selected().unwrap_or(0);
      if sel >= self.filtered_indices.len() {
        self.list_state.select(Some(self.filtered_indices.len().saturating_sub(1)));
      }
    }
  }

  // --- Search debounce ---

  /// Re-arm the debounce window after an edit to the search box.
  pub fn arm_search_debounce(&mut self) {
    self.search_deadline = Some(Instant::now() + Duration::from_millis(constants().search_debounce_ms));
  }

  /// Apply the raw search text once the debounce window has passed. Called
  /// every loop tick; `now` is injected so the window is testable. Because
  /// the current raw text is what gets applied, a pending older value can
  /// never overwrite newer input.
  pub fn apply_search_if_due(&mut self, now: Instant) {
    if let Some(deadline) = self.search_deadline
      && now >= deadline
    {
      self.apply_search();
    }
  }

  /// Apply the raw text immediately, bypassing the debounce.
  pub fn apply_search(&mut self) {
    self.search_deadline = None;
    if self.applied_query != self.search_input {
      self.applied_query = self.search_input.clone();
      self.recompute_filter();
    }
  }

  // --- Selection ---

  /// Select a video for viewing. The selection and its history record move
  /// together; callers observe both or neither.
  pub fn select_video(&mut self, video: Video) {
    info!(id = %video.public_id, "video selected");
    self.history.add(&video);
    self.selected = Some(video);
  }

  /// Drop the selection and stop any playback tied to it.
  pub async fn clear_selection(&mut self) {
    self.selected = None;
    if let Err(e) = self.player.stop().await {
      warn!(err = %e, "failed to stop playback");
    }
  }

  /// Clear both the raw and applied search text. Clearing the search also
  /// drops the selection.
  pub async fn clear_search(&mut self) {
    self.search_input.clear();
    self.cursor_position = 0;
    self.input_scroll = 0;
    self.applied_query.clear();
    self.search_deadline = None;
    self.clear_selection().await;
    self.recompute_filter();
  }

  /// Switch device tabs. The search box and the selection reset; each tab
  /// starts from the top of its full list.
  pub async fn change_tab(&mut self, tab: DeviceTab) {
    info!(tab = tab.label(), "tab changed");
    self.active_tab = tab;
    self.search_input.clear();
    self.cursor_position = 0;
    self.input_scroll = 0;
    self.applied_query.clear();
    self.search_deadline = None;
    self.clear_selection().await;
    self.recompute_filter();
    self.list_state.select(if self.filtered_indices.is_empty() { None } else { Some(0) });
  }

  // --- Background tasks ---

  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.tasks.catalog_rx.take() {
      match rx.try_recv() {
        Ok(result) => {
          self.status_message = None;
          match result {
            Ok(catalog) => {
              info!(mobile = catalog.mobile.len(), pc = catalog.pc.len(), "catalog loaded");
              self.catalog = catalog;
              self.load_status = LoadStatus::Success;
              self.recompute_filter();
              if !self.filtered_indices.is_empty() {
                self.list_state.select(Some(0));
              }
            }
            Err(e) => {
              warn!(err = %e, "catalog load failed");
              self.load_status = LoadStatus::Error;
              self.set_error(LOAD_ERROR_MSG.to_string());
            }
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.catalog_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.load_status = LoadStatus::Error;
          self.set_error(LOAD_ERROR_MSG.to_string());
        }
      }
    }

    if let Some(mut rx) = self.tasks.visits_rx.take() {
      match rx.try_recv() {
        Ok(count) => {
          self.visit_count = count;
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.tasks.visits_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {}
      }
    }
  }

  /// Kick off a full catalog load. Both tag lists are fetched together; the
  /// UI sees one loading state and one error state for the pair.
  pub fn trigger_catalog_load(&mut self) {
    info!("catalog load triggered");
    self.tasks.catalog_rx = None;
    self.clear_error();
    self.load_status = LoadStatus::Loading;
    self.status_message = Some("Loading videos…".to_string());

    let client = self.player.http_client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(cloudinary::fetch_catalog(&client).await);
    });
    self.tasks.catalog_rx = Some(rx);
  }

  /// Count this run as a visit. Failures surface nowhere but the log.
  pub fn trigger_visit_count(&mut self) {
    let client = self.player.http_client.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(counter::increment_visits(&client).await);
    });
    self.tasks.visits_rx = Some(rx);
  }
}
