use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use std::process::Stdio;
use tokio::process::{Child as TokioChild, Command};
use tracing::info;

use crate::catalog::Video;
use crate::cloudinary::video_url;
use crate::constants::constants;

/// Hands the selected video's stream URL to an external player process.
pub struct VideoPlayer {
  pub http_client: Client,
  current_process: Option<TokioChild>,
}

impl VideoPlayer {
  pub fn new() -> Self {
    Self { http_client: Client::new(), current_process: None }
  }

  pub fn is_playing(&self) -> bool {
    self.current_process.is_some()
  }

  /// Reap the player process if it exited on its own. Selection is not
  /// affected; the user can replay or pick something else.
  pub fn check_finished(&mut self) {
    if let Some(child) = &mut self.current_process
      && let Ok(Some(status)) = child.try_wait()
    {
      info!(code = ?status.code(), "player exited");
      self.current_process = None;
    }
  }

  pub async fn play(&mut self, video: &Video) -> Result<()> {
    self.stop().await.context("Failed to stop previous playback")?;

    let url = video_url(video);
    let player = constants().player_command.as_str();
    let mut cmd = Command::new(player);
    cmd.args(["--really-quiet", &url]);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());

    let child = cmd.spawn().map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        anyhow!("{player} not found. Install it with: brew install {player} (macOS) or apt install {player} (Linux)")
      } else {
        anyhow!(e).context(format!("Failed to spawn {}", player))
      }
    })?;

    info!(id = %video.public_id, url = %url, "playback started");
    self.current_process = Some(child);
    Ok(())
  }

  pub async fn stop(&mut self) -> Result<()> {
    if let Some(mut child) = self.current_process.take() {
      child.kill().await.context("Failed to kill player process")?;
      let _ = child.wait().await;
    }
    Ok(())
  }
}
