//! Narrows the active device list down to the rows matching the search box.

use crate::catalog::Video;

/// Fold case and treat underscores as spaces, so a query typed as a raw id
/// still matches the humanized id fallback title.
fn normalize(s: &str) -> String {
  s.to_lowercase().replace('_', " ")
}

/// Check if a video matches the given query string.
/// Case-insensitive substring test against the display title.
pub fn matches(video: &Video, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }
  normalize(&video.display_title()).contains(&normalize(query))
}

/// Indices into `list` whose videos match `query`, in list order.
/// When the query is empty, contains all indices.
pub fn filter_indices(list: &[Video], query: &str) -> Vec<usize> {
  list.iter().enumerate().filter(|(_, video)| matches(video, query)).map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{VideoContext, VideoCustom};

  fn make_video(id: &str, caption: Option<&str>) -> Video {
    Video {
      public_id: id.to_string(),
      format: "mp4".to_string(),
      version: 1,
      context: caption
        .map(|c| VideoContext { custom: Some(VideoCustom { caption: Some(c.to_string()), alt: None }) }),
    }
  }

  // --- matches ---

  #[test]
  fn empty_query_matches_everything() {
    let v = make_video("bai_1", None);
    assert!(matches(&v, ""));
  }

  #[test]
  fn query_is_case_insensitive() {
    let v = make_video("bai_1", Some("Chào mừng đồng chí"));
    assert!(matches(&v, "chào"));
    assert!(matches(&v, "MỪNG"));
  }

  #[test]
  fn query_matches_substrings_anywhere() {
    let v = make_video("bai_1", Some("Hướng dẫn cài đặt"));
    assert!(matches(&v, "cài đặt"));
    assert!(!matches(&v, "đăng nhập"));
  }

  #[test]
  fn query_matches_the_humanized_id_fallback() {
    let v = make_video("bai_2", None);
    assert!(matches(&v, "bai 2"));
    assert!(matches(&v, "bai_2"));
    assert!(!matches(&v, "bai 3"));
  }

  // --- filter_indices ---

  #[test]
  fn filter_keeps_source_order() {
    let list = vec![
      make_video("a", Some("Cài đặt trên iPhone")),
      make_video("b", Some("Đăng ký tài khoản")),
      make_video("c", Some("Cài đặt trên Android")),
    ];
    assert_eq!(filter_indices(&list, "cài đặt"), vec![0, 2]);
    assert_eq!(filter_indices(&list, ""), vec![0, 1, 2]);
    assert!(filter_indices(&list, "zzz").is_empty());
  }
}
