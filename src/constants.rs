//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so there is no runtime
//! file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Cloudinary listing
  pub cloud_name: String,
  pub mobile_tag: String,
  pub pc_tag: String,

  // Visit counter
  pub counter_api: String,
  pub counter_namespace: String,
  pub counter_key: String,

  // Input
  pub search_debounce_ms: u64,

  // Playback
  pub player_command: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
