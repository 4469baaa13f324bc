//! Availability probe for the brain status endpoint.

use neurostream_data::BrainStatus;
use reqwest::header::ACCEPT;

use crate::error::{IoError, Result};

/// Asks the producer whether the subject's brain can be streamed.
///
/// A 404 is answered locally as "not available" so the caller can end the
/// session with a readable message instead of opening a doomed stream.
pub async fn fetch_brain_status(client: &reqwest::Client, url: &str) -> Result<BrainStatus> {
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(BrainStatus {
            pet_id: String::new(),
            available: false,
            message: "Pet not found".to_string(),
            stage: None,
            evolution_path: None,
        });
    }
    if !status.is_success() {
        return Err(IoError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    let brain: BrainStatus = serde_json::from_str(&body)?;
    tracing::debug!(
        pet_id = %brain.pet_id,
        available = brain.available,
        stage = brain.stage.as_deref().unwrap_or("unknown"),
        "Brain status probed"
    );
    Ok(brain)
}
