use anyhow::{Context, Result, anyhow};
use futures::future::try_join;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{DeviceTab, Video, VideoCatalog};
use crate::constants::constants;

/// Wire envelope of the tag listing endpoint.
#[derive(Debug, Deserialize)]
struct ListResponse {
  resources: Vec<Video>,
}

/// URL of the JSON listing for one tag.
fn list_url(tag: &str) -> String {
  format!("https://res.cloudinary.com/{}/video/list/{}.json", constants().cloud_name, tag)
}

/// Playable URL for a video resource.
pub fn video_url(video: &Video) -> String {
  format!(
    "https://res.cloudinary.com/{}/video/upload/v{}/{}.{}",
    constants().cloud_name,
    video.version,
    video.public_id,
    video.format
  )
}

/// Decode a listing body and sort it ascending by id.
fn parse_listing(body: &str) -> Result<Vec<Video>> {
  let parsed: ListResponse = serde_json::from_str(body).context("Malformed video listing")?;
  let mut videos = parsed.resources;
  videos.sort_by(|a, b| a.public_id.cmp(&b.public_id));
  Ok(videos)
}

/// Fetch every video carrying `tag`.
pub async fn fetch_videos_by_tag(client: &Client, tag: &str) -> Result<Vec<Video>> {
  let url = list_url(tag);
  debug!(url = %url, "fetching tag listing");
  let response =
    client.get(&url).send().await.with_context(|| format!("Failed to fetch video list for tag '{}'", tag))?;
  if !response.status().is_success() {
    return Err(anyhow!("Video list request for tag '{}' returned {}", tag, response.status()));
  }
  let text = response.text().await.with_context(|| format!("Failed to read video list body for tag '{}'", tag))?;
  parse_listing(&text).with_context(|| format!("Bad video listing for tag '{}'", tag))
}

/// Fetch both device lists together. Either failure fails the whole load,
/// so a half-populated catalog never exists.
pub async fn fetch_catalog(client: &Client) -> Result<VideoCatalog> {
  let (mobile, pc) = try_join(
    fetch_videos_by_tag(client, DeviceTab::Mobile.tag()),
    fetch_videos_by_tag(client, DeviceTab::Pc.tag()),
  )
  .await?;
  Ok(VideoCatalog { mobile, pc })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_listing_decodes_and_sorts() {
    let body = r#"{
      "resources": [
        {"public_id": "bai_3", "format": "mp4", "version": 3},
        {"public_id": "bai_1", "format": "mp4", "version": 1,
         "context": {"custom": {"caption": "Chào mừng", "alt": "Video chào mừng"}}},
        {"public_id": "bai_2", "format": "webm", "version": 2,
         "context": {"custom": {"alt": "Bài hai"}}}
      ]
    }"#;
    let videos = parse_listing(body).unwrap();
    let ids: Vec<&str> = videos.iter().map(|v| v.public_id.as_str()).collect();
    assert_eq!(ids, ["bai_1", "bai_2", "bai_3"]);
    assert_eq!(videos[0].display_title(), "Chào mừng");
    assert_eq!(videos[1].display_title(), "Bài hai");
    assert_eq!(videos[2].display_title(), "bai 3");
  }

  #[test]
  fn parse_listing_tolerates_unknown_fields() {
    let body = r#"{"resources": [{"public_id": "a", "format": "mp4", "version": 9,
      "type": "upload", "width": 1920, "height": 1080}]}"#;
    let videos = parse_listing(body).unwrap();
    assert_eq!(videos.len(), 1);
    assert!(videos[0].context.is_none());
  }

  #[test]
  fn parse_listing_rejects_garbage() {
    assert!(parse_listing("<html>oops</html>").is_err());
    assert!(parse_listing(r#"{"resources": [{"format": "mp4"}]}"#).is_err());
  }

  #[test]
  fn video_url_follows_the_upload_template() {
    let v = Video { public_id: "bai_1".to_string(), format: "mp4".to_string(), version: 1712345, context: None };
    assert_eq!(video_url(&v), "https://res.cloudinary.com/dno8trp3p/video/upload/v1712345/bai_1.mp4");
  }

  #[test]
  fn list_url_targets_the_tag_listing() {
    assert_eq!(list_url("stdangvienhuhh"), "https://res.cloudinary.com/dno8trp3p/video/list/stdangvienhuhh.json");
  }
}
