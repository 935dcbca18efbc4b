/// Shared valuation pipeline for the HTTP handlers.
///
/// One pass per request:
/// 1. Decode the identity code via the external service (single attempt)
/// 2. Resolve the canonical identity from manual/decoded/pattern sources
/// 3. Look up defect advisories
/// 4. Price: base value, mileage adjustment, options premium
/// 5. Compose the market estimate and the trade-in offer
use crate::decoder_client::{DecodeOutcome, VinDecodeClient};
use crate::defects;
use crate::errors::AppError;
use crate::models::{
    DecodedVehicleRecord, ValuationRequest, ValuationResponse, ADVISORY_FALLBACK_TEXT,
};
use crate::patterns;
use crate::policy::PricingPolicy;
use crate::pricing;
use crate::resolver;
use uuid::Uuid;

/// Rounds a currency amount to whole units at the response edge.
/// Internal math stays unrounded so the stages compose exactly.
fn round_currency(amount: f64) -> f64 {
    amount.round()
}

/// Fetches the decode record for a request, if possible.
///
/// Skips the call entirely for absent or malformed codes; collapses any
/// service failure into `None` with a warning so the resolver falls back
/// to the pattern table. Exactly one attempt, bounded by the client's
/// configured timeout.
async fn decode_for_request(
    decode_client: Option<&VinDecodeClient>,
    vin: Option<&str>,
) -> Option<DecodedVehicleRecord> {
    let vin = vin?.trim();
    if !patterns::is_plausible_vin(vin) {
        if !vin.is_empty() {
            tracing::info!("Identity code '{}' is not VIN-shaped; skipping decode", vin);
        }
        return None;
    }

    let client = match decode_client {
        Some(client) => client,
        None => {
            tracing::info!("No decode client configured; relying on overrides and patterns");
            return None;
        }
    };

    match client.decode_vin(&vin.to_uppercase()).await {
        DecodeOutcome::Decoded(record) => Some(record),
        DecodeOutcome::Unavailable(reason) => {
            tracing::warn!(
                "Decode unavailable ({}); falling back to internal pattern table",
                reason
            );
            None
        }
    }
}

/// Runs the complete valuation pipeline for one request.
///
/// Total for every input except one case: an unresolved identity combined
/// with an explicit request for identity-specific advisories fails with
/// `IdentityUnresolved`, because a defect list for the wrong vehicle is
/// worse than no answer. Everything else degrades to documented defaults.
pub async fn run_valuation(
    decode_client: Option<&VinDecodeClient>,
    policy: &PricingPolicy,
    request: &ValuationRequest,
) -> Result<ValuationResponse, AppError> {
    let request_id = Uuid::new_v4();
    tracing::info!("Starting valuation {}", request_id);

    // Step 1: External decode (single attempt, timeout-bounded)
    let decoded = decode_for_request(decode_client, request.vin.as_deref()).await;

    // Step 2: Resolve canonical identity
    let identity = resolver::resolve_identity(
        &request.overrides,
        decoded.as_ref(),
        request.vin.as_deref(),
        policy.reference_year,
    );
    tracing::info!(
        "Step 2: Resolved identity: {} {} {} (resolved: {})",
        identity.year,
        identity.make,
        identity.model,
        identity.resolved
    );

    if !identity.resolved && request.include_advisories {
        return Err(AppError::IdentityUnresolved);
    }

    // Step 3: Defect advisories
    let advisories = if request.include_advisories {
        defects::lookup(&identity)
    } else {
        Vec::new()
    };
    tracing::info!("Step 3: {} defect advisories", advisories.len());

    // Step 4: Pricing stages
    let base = pricing::base_value(&identity, policy);
    let mileage_delta =
        pricing::mileage_adjustment(identity.year, request.condition.mileage_km, policy);
    let premium = pricing::options_premium(&identity.trim, &request.condition.options, policy);
    tracing::info!(
        "Step 4: base {:.0}, mileage delta {:.0}, options premium {:.0}",
        base,
        mileage_delta,
        premium
    );

    // Step 5: Estimate band and offer
    let mut estimate = pricing::estimate(base, mileage_delta, premium, policy);
    let mut offer = pricing::offer(&estimate, policy);

    estimate.low = round_currency(estimate.low);
    estimate.high = round_currency(estimate.high);
    estimate.mean = round_currency(estimate.mean);
    offer.amount = round_currency(offer.amount);
    tracing::info!(
        "Step 5: estimate [{:.0}, {:.0}] mean {:.0}, offer {:.0}",
        estimate.low,
        estimate.high,
        estimate.mean,
        offer.amount
    );

    Ok(ValuationResponse {
        request_id,
        identity,
        advisories,
        advisory_fallback: ADVISORY_FALLBACK_TEXT.to_string(),
        mileage_delta: round_currency(mileage_delta),
        estimate,
        offer,
    })
}
