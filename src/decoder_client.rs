use crate::errors::AppError;
use crate::models::{DecodeEnvelope, DecodedVehicleRecord};
use std::time::Duration;

/// Outcome of a single decode attempt.
///
/// A tagged result rather than a bare `Option`, so failure handling is
/// explicit at the call site: `Unavailable` triggers the resolver's
/// pattern-table fallback and is never silently treated as "no vehicle".
#[derive(Debug, Clone)]
pub enum DecodeOutcome {
    /// The service answered with a usable record.
    Decoded(DecodedVehicleRecord),
    /// Timeout, transport error, non-success status, or unusable body.
    Unavailable(String),
}

/// Client for the external vehicle-identity decode service (vPIC shape).
#[derive(Clone)]
pub struct VinDecodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl VinDecodeClient {
    /// Creates a new `VinDecodeClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the decode service.
    /// * `timeout` - Hard bound on a single decode attempt. There is no
    ///   retry; one attempt per valuation request.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create decode client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    /// Decodes a 17-character identity code.
    ///
    /// Any failure mode (transport, timeout, non-2xx, unparseable body,
    /// empty result set) collapses into `DecodeOutcome::Unavailable`; the
    /// caller decides whether and how to fall back. An answered record
    /// with an empty make is returned as-is, since "empty make = failed
    /// lookup" is resolution policy, not transport policy.
    pub async fn decode_vin(&self, vin: &str) -> DecodeOutcome {
        let url = format!(
            "{}/vehicles/DecodeVinValues/{}?format=json",
            self.base_url, vin
        );
        tracing::info!("Decoding VIN {} via {}", vin, self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Decode request failed for VIN {}: {}", vin, e);
                return DecodeOutcome::Unavailable(format!("request failed: {}", e));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Decode service returned {}: {}", status, error_text);
            return DecodeOutcome::Unavailable(format!("status {}: {}", status, error_text));
        }

        let envelope: DecodeEnvelope = match response.json().await {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!("Failed to parse decode response for VIN {}: {}", vin, e);
                return DecodeOutcome::Unavailable(format!("unparseable response: {}", e));
            }
        };

        match envelope.results.into_iter().next() {
            Some(record) => {
                tracing::info!(
                    "✓ Decoded VIN {}: {} {} {}",
                    vin,
                    record.model_year,
                    record.make,
                    record.model
                );
                DecodeOutcome::Decoded(record)
            }
            None => {
                tracing::warn!("Decode response for VIN {} carried no results", vin);
                DecodeOutcome::Unavailable("empty result set".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = VinDecodeClient::new(
            "https://example.com".to_string(),
            Duration::from_secs(5),
        );
        assert!(client.is_ok());
    }
}
