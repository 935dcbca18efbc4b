use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Identity Models ============

/// Sentinel used for identity fields no source could resolve.
/// Kept as an explicit string so unresolved identities never propagate
/// nulls into the pricing arithmetic.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Earliest model year accepted as plausible.
pub const MIN_PLAUSIBLE_YEAR: i32 = 1980;

/// Canonical vehicle identity, reconciled from up to three sources.
///
/// Invariant: `year`, `make` and `model` are either all populated or the
/// identity is marked unresolved (sentinel fields, `year` = 0). Immutable
/// once constructed for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleIdentity {
    /// Model year; 0 when unresolved.
    pub year: i32,
    /// Manufacturer name, or [`UNKNOWN_FIELD`] when unresolved.
    pub make: String,
    /// Model name, or [`UNKNOWN_FIELD`] when unresolved.
    pub model: String,
    /// Trim tier; may be empty or "Base".
    pub trim: String,
    /// Body class as reported by the decode source, when known.
    pub body_class: Option<String>,
    /// Engine descriptor (e.g. "V6 3.0L"), when known.
    pub engine: Option<String>,
    /// Whether year/make/model were all determined by some source.
    pub resolved: bool,
}

impl VehicleIdentity {
    /// The unresolved identity: sentinel fields, pipeline-safe defaults.
    pub fn unresolved() -> Self {
        Self {
            year: 0,
            make: UNKNOWN_FIELD.to_string(),
            model: UNKNOWN_FIELD.to_string(),
            trim: String::new(),
            body_class: None,
            engine: None,
            resolved: false,
        }
    }
}

/// Manual override fields supplied by the caller.
///
/// Each field is independently optional: a populated field wins over the
/// decoded/pattern value for that field only, never the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualOverride {
    /// Model year override.
    pub year: Option<i32>,
    /// Make override.
    pub make: Option<String>,
    /// Model override.
    pub model: Option<String>,
    /// Trim override.
    pub trim: Option<String>,
}

impl ManualOverride {
    /// True when no field carries a usable value.
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.make.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.model.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.trim.as_deref().map_or(true, |s| s.trim().is_empty())
    }
}

// ============ Condition Models ============

/// Named boolean option flags that contribute fixed value add-ons.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VehicleOptions {
    /// Leather interior.
    #[serde(default)]
    pub leather: bool,
    /// Sunroof / moonroof.
    #[serde(default)]
    pub sunroof: bool,
    /// Factory towing package.
    #[serde(default)]
    pub towing_package: bool,
    /// Built-in navigation.
    #[serde(default)]
    pub navigation: bool,
}

/// Caller-supplied condition inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionInput {
    /// Odometer reading in km. Negative values are clamped to 0 rather
    /// than rejected, to keep the pipeline total.
    pub mileage_km: i64,
    /// Installed options.
    #[serde(default)]
    pub options: VehicleOptions,
}

// ============ Request / Result Models ============

/// The unit of work for the whole pipeline: one request produces exactly
/// one market estimate and one offer recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRequest {
    /// 17-character VIN, when available.
    pub vin: Option<String>,
    /// Field-level manual overrides.
    #[serde(default)]
    pub overrides: ManualOverride,
    /// Mileage and options.
    pub condition: ConditionInput,
    /// Whether identity-specific defect advisories are requested. When
    /// true and the identity cannot be resolved, the valuation fails
    /// rather than attaching advisories for the wrong vehicle.
    #[serde(default = "default_include_advisories")]
    pub include_advisories: bool,
}

fn default_include_advisories() -> bool {
    true
}

/// Market estimate band. Invariant: `0 <= low <= mean <= high`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketEstimate {
    /// Lower bound of the market band.
    pub low: f64,
    /// Upper bound of the market band.
    pub high: f64,
    /// Mean asking price after mileage and options adjustments.
    pub mean: f64,
}

/// Margin-adjusted trade-in offer. Invariant: `amount <= mean`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OfferRecommendation {
    /// Suggested trade-in amount, floored at zero.
    pub amount: f64,
}

/// Caller-facing valuation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResponse {
    /// Identifier assigned to this valuation run.
    pub request_id: Uuid,
    /// Canonical identity the estimate was computed for.
    pub identity: VehicleIdentity,
    /// Known-issue advisories for this identity, in knowledge-base
    /// declaration order. Empty when nothing matched.
    pub advisories: Vec<String>,
    /// Generic inspection text the caller should render when
    /// `advisories` is empty. Display fallback, not part of the list.
    pub advisory_fallback: String,
    /// Signed mileage adjustment applied to the estimate; positive means
    /// above-average mileage reduced the value.
    pub mileage_delta: f64,
    /// Market estimate band.
    pub estimate: MarketEstimate,
    /// Margin-adjusted offer.
    pub offer: OfferRecommendation,
}

/// Generic text shown in place of an empty advisory list.
pub const ADVISORY_FALLBACK_TEXT: &str =
    "No model-specific issues on file; inspect standard wear items (brakes, tires, suspension, fluids)";

// ============ Query Parameter Models ============

/// Query parameters for the identity-resolve endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveQueryParams {
    /// 17-character VIN to resolve.
    pub vin: Option<String>,
    /// Manual year override.
    pub year: Option<i32>,
    /// Manual make override.
    pub make: Option<String>,
    /// Manual model override.
    pub model: Option<String>,
    /// Manual trim override.
    pub trim: Option<String>,
}

/// Query parameters for the direct defect-lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DefectQueryParams {
    /// Manufacturer name (exact, case-insensitive).
    pub make: String,
    /// Model name (substring match against knowledge-base entries).
    pub model: String,
    /// Model year.
    pub year: i32,
}

// ============ Decode Service Models ============

/// One vehicle record from the decode service.
///
/// Any field may be an empty string signaling "unknown"; an empty `make`
/// means the lookup failed for resolution purposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodedVehicleRecord {
    /// Model year as a string (vPIC returns all fields as strings).
    #[serde(rename = "ModelYear", default)]
    pub model_year: String,
    /// Manufacturer name.
    #[serde(rename = "Make", default)]
    pub make: String,
    /// Model name.
    #[serde(rename = "Model", default)]
    pub model: String,
    /// Series designation (used as trim when `Trim` is empty).
    #[serde(rename = "Series", default)]
    pub series: String,
    /// Trim designation.
    #[serde(rename = "Trim", default)]
    pub trim: String,
    /// Engine displacement in liters.
    #[serde(rename = "DisplacementL", default)]
    pub displacement_l: String,
    /// Number of engine cylinders.
    #[serde(rename = "EngineCylinders", default)]
    pub engine_cylinders: String,
    /// Body class descriptor.
    #[serde(rename = "BodyClass", default)]
    pub body_class: String,
}

/// Envelope returned by the decode service.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeEnvelope {
    /// Decoded records; the first entry is the vehicle.
    #[serde(rename = "Results", default)]
    pub results: Vec<DecodedVehicleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_identity_uses_sentinels() {
        let id = VehicleIdentity::unresolved();
        assert!(!id.resolved);
        assert_eq!(id.year, 0);
        assert_eq!(id.make, UNKNOWN_FIELD);
        assert_eq!(id.model, UNKNOWN_FIELD);
    }

    #[test]
    fn test_manual_override_emptiness() {
        assert!(ManualOverride::default().is_empty());
        assert!(ManualOverride {
            make: Some("   ".to_string()),
            ..Default::default()
        }
        .is_empty());
        assert!(!ManualOverride {
            year: Some(2015),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_valuation_request_defaults_advisories_on() {
        let req: ValuationRequest = serde_json::from_value(serde_json::json!({
            "vin": null,
            "condition": { "mileage_km": 50000 }
        }))
        .unwrap();
        assert!(req.include_advisories);
        assert!(!req.condition.options.leather);
    }

    #[test]
    fn test_decode_envelope_parses_vpic_shape() {
        let env: DecodeEnvelope = serde_json::from_value(serde_json::json!({
            "Count": 1,
            "Results": [{
                "ModelYear": "2019",
                "Make": "RAM",
                "Model": "1500",
                "Series": "Sport",
                "BodyClass": "Pickup"
            }]
        }))
        .unwrap();
        assert_eq!(env.results.len(), 1);
        assert_eq!(env.results[0].make, "RAM");
        assert_eq!(env.results[0].trim, "");
    }
}
