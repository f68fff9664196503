//! Fire-and-forget visit counter. The footer shows the running total when
//! the call succeeds and nothing when it does not.

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::constants::constants;

#[derive(Debug, Deserialize)]
struct CounterResponse {
  value: u64,
}

/// Bump the visit counter and return the new total. Every failure path is
/// logged and reported as `None`; the count never gates anything else.
pub async fn increment_visits(client: &Client) -> Option<u64> {
  let c = constants();
  let url = format!("{}/hit/{}/{}", c.counter_api, c.counter_namespace, c.counter_key);
  let response = match client.get(&url).send().await {
    Ok(response) => response,
    Err(e) => {
      warn!(err = %e, "visit counter unreachable");
      return None;
    }
  };
  if !response.status().is_success() {
    warn!(status = %response.status(), "visit counter returned an error");
    return None;
  }
  match response.json::<CounterResponse>().await {
    Ok(body) => Some(body.value),
    Err(e) => {
      warn!(err = %e, "visit counter response undecodable");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counter_response_decodes_the_value() {
    let r: CounterResponse = serde_json::from_str(r#"{"value": 734}"#).unwrap();
    assert_eq!(r.value, 734);
  }

  #[test]
  fn counter_response_ignores_extra_fields() {
    let r: CounterResponse =
      serde_json::from_str(r#"{"value": 1, "namespace": "stdangvien-huongdan", "key": "visits"}"#).unwrap();
    assert_eq!(r.value, 1);
  }
}
