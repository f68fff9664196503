use serde::{Deserialize, Serialize};

use crate::constants::constants;

// --- Tabs ---

/// Which device catalog is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceTab {
  Mobile,
  Pc,
}

impl DeviceTab {
  pub const ALL: [DeviceTab; 2] = [DeviceTab::Mobile, DeviceTab::Pc];

  pub fn label(self) -> &'static str {
    match self {
      DeviceTab::Mobile => "Mobile",
      DeviceTab::Pc => "PC",
    }
  }

  pub fn other(self) -> Self {
    match self {
      DeviceTab::Mobile => DeviceTab::Pc,
      DeviceTab::Pc => DeviceTab::Mobile,
    }
  }

  pub fn from_config(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "pc" => DeviceTab::Pc,
      _ => DeviceTab::Mobile,
    }
  }

  /// The listing tag this tab's videos carry.
  pub fn tag(self) -> &'static str {
    match self {
      DeviceTab::Mobile => constants().mobile_tag.as_str(),
      DeviceTab::Pc => constants().pc_tag.as_str(),
    }
  }
}

// --- Videos ---

/// A single video resource, shaped the way the listing API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
  pub public_id: String,
  pub format: String,
  pub version: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub context: Option<VideoContext>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoContext {
  #[serde(default)]
  pub custom: Option<VideoCustom>,
}

/// Editor-supplied display metadata. Either field may be missing or empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoCustom {
  #[serde(default)]
  pub caption: Option<String>,
  #[serde(default)]
  pub alt: Option<String>,
}

impl Video {
  /// Human-facing title: the caption, else the alt text, else the id with
  /// underscores opened up into spaces. Empty strings count as missing.
  pub fn display_title(&self) -> String {
    let custom = self.context.as_ref().and_then(|c| c.custom.as_ref());
    if let Some(caption) = custom.and_then(|c| c.caption.as_deref())
      && !caption.is_empty()
    {
      return caption.to_string();
    }
    if let Some(alt) = custom.and_then(|c| c.alt.as_deref())
      && !alt.is_empty()
    {
      return alt.to_string();
    }
    self.public_id.replace('_', " ")
  }
}

// --- Catalog ---

/// Both device lists. Loaded together or not at all, so one tab can never
/// show fresh data while the other is stale.
#[derive(Debug, Clone, Default)]
pub struct VideoCatalog {
  pub mobile: Vec<Video>,
  pub pc: Vec<Video>,
}

impl VideoCatalog {
  pub fn list(&self, tab: DeviceTab) -> &[Video] {
    match tab {
      DeviceTab::Mobile => &self.mobile,
      DeviceTab::Pc => &self.pc,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.mobile.is_empty() && self.pc.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn make_video(id: &str, caption: Option<&str>, alt: Option<&str>) -> Video {
    let context = if caption.is_some() || alt.is_some() {
      Some(VideoContext {
        custom: Some(VideoCustom { caption: caption.map(|s| s.to_string()), alt: alt.map(|s| s.to_string()) }),
      })
    } else {
      None
    };
    Video { public_id: id.to_string(), format: "mp4".to_string(), version: 1, context }
  }

  // --- display_title ---

  #[test]
  fn display_title_prefers_caption() {
    let v = make_video("bai_1", Some("Chào mừng"), Some("alt text"));
    assert_eq!(v.display_title(), "Chào mừng");
  }

  #[test]
  fn display_title_falls_back_to_alt() {
    let v = make_video("bai_1", None, Some("Giới thiệu"));
    assert_eq!(v.display_title(), "Giới thiệu");
  }

  #[test]
  fn display_title_empty_caption_counts_as_missing() {
    let v = make_video("bai_1", Some(""), Some("Giới thiệu"));
    assert_eq!(v.display_title(), "Giới thiệu");
  }

  #[test]
  fn display_title_humanizes_the_id() {
    let v = make_video("huong_dan_cai_dat", None, None);
    assert_eq!(v.display_title(), "huong dan cai dat");
    let v = make_video("bai_1", Some(""), Some(""));
    assert_eq!(v.display_title(), "bai 1");
  }

  // --- DeviceTab ---

  #[test]
  fn tab_from_config() {
    assert_eq!(DeviceTab::from_config("pc"), DeviceTab::Pc);
    assert_eq!(DeviceTab::from_config("PC"), DeviceTab::Pc);
    assert_eq!(DeviceTab::from_config("mobile"), DeviceTab::Mobile);
    assert_eq!(DeviceTab::from_config("anything"), DeviceTab::Mobile);
  }

  #[test]
  fn tab_other_flips() {
    assert_eq!(DeviceTab::Mobile.other(), DeviceTab::Pc);
    assert_eq!(DeviceTab::Pc.other(), DeviceTab::Mobile);
  }

  #[test]
  fn catalog_list_selects_by_tab() {
    let catalog = VideoCatalog { mobile: vec![make_video("m", None, None)], pc: Vec::new() };
    assert_eq!(catalog.list(DeviceTab::Mobile).len(), 1);
    assert!(catalog.list(DeviceTab::Pc).is_empty());
    assert!(!catalog.is_empty());
  }
}
