use std::collections::HashMap;
use uuid::Uuid;

use noble_shared::types::profile::ProfileSummary;

/// Resolve profile summaries from noble-user's internal batch endpoint.
/// Enrichment is best-effort: on any failure the map is empty and previews
/// go out without partner details.
pub async fn fetch_summaries(
    client: &reqwest::Client,
    user_service_url: &str,
    credential_ids: &[Uuid],
) -> HashMap<Uuid, ProfileSummary> {
    if credential_ids.is_empty() {
        return HashMap::new();
    }

    let url = format!("{user_service_url}/internal/profiles/batch");
    let summaries: Vec<ProfileSummary> = match client
        .post(&url)
        .json(&serde_json::json!({ "credential_ids": credential_ids }))
        .send()
        .await
    {
        Ok(resp) => resp.json().await.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch profiles from noble-user");
            vec![]
        }
    };

    summaries
        .into_iter()
        .map(|s| (s.credential_id, s))
        .collect()
}
