use chrono::{Datelike, Utc};
use serde::Deserialize;

/// Annual mileage a vehicle is expected to accumulate, in km.
/// Expected mileage = (reference_year - model_year) * this norm.
pub const DEFAULT_ANNUAL_MILEAGE_NORM_KM: i64 = 20_000;

/// Currency adjustment per km of deviation from expected mileage.
pub const DEFAULT_PER_KM_RATE: f64 = 0.05;

/// Half-width of the market estimate band around the mean.
/// low = mean * (1 - spread), high = mean * (1 + spread).
pub const DEFAULT_SPREAD_FRACTION: f64 = 0.15;

/// Resale margin retained when converting the market mean into an offer.
/// Business policy, distinct from market-estimation math.
pub const DEFAULT_MARGIN_FRACTION: f64 = 0.15;

/// Flat deduction covering predictable reconditioning work.
pub const DEFAULT_RECONDITIONING_DEDUCTION: f64 = 4_500.0;

/// Flat surcharge applied on top of the age tier for luxury makes.
pub const DEFAULT_LUXURY_SURCHARGE: f64 = 12_000.0;

/// Base value used when no source could resolve the vehicle identity.
pub const DEFAULT_FALLBACK_BASE: f64 = 8_000.0;

/// Premium added once when the trim name contains a recognized keyword.
pub const DEFAULT_TRIM_PREMIUM: f64 = 1_500.0;

/// Undepreciated base value tiers as (max_age_years, value) steps,
/// evaluated in order; the last entry is the floor for anything older.
pub const DEFAULT_AGE_TIERS: [(i32, f64); 4] = [
    (3, 38_000.0),
    (6, 30_000.0),
    (10, 22_000.0),
    (15, 14_000.0),
];

/// Base value for vehicles older than the last age tier.
pub const DEFAULT_AGED_OUT_BASE: f64 = 6_000.0;

/// Makes that receive the luxury surcharge (matched case-insensitively).
pub const LUXURY_MAKES: [&str; 5] = ["Porsche", "BMW", "Mercedes-Benz", "Audi", "Lexus"];

/// Trim keywords that trigger the trim premium (case-insensitive substring).
pub const TRIM_KEYWORDS: [&str; 5] = ["sport", "laramie", "limited", "gt", "premium"];

/// Fixed premiums for each supported option flag.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionPremiums {
    /// Leather interior.
    pub leather: f64,
    /// Sunroof / moonroof.
    pub sunroof: f64,
    /// Factory towing package.
    pub towing_package: f64,
    /// Built-in navigation.
    pub navigation: f64,
}

impl Default for OptionPremiums {
    fn default() -> Self {
        Self {
            leather: 800.0,
            sunroof: 600.0,
            towing_package: 700.0,
            navigation: 400.0,
        }
    }
}

/// Every constant the pricing pipeline depends on, in one immutable value.
///
/// Loaded once at process start and threaded explicitly into each pipeline
/// call, never read as ambient global state, so tests can inject alternate
/// numbers. Multiple valuation passes over the same request (e.g. after a
/// manual edit) therefore stay consistent.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingPolicy {
    /// Year against which vehicle age and expected mileage are computed.
    /// The only time-derived input to the pipeline; fixed here so repeated
    /// runs with the same policy are identical.
    pub reference_year: i32,
    /// See [`DEFAULT_ANNUAL_MILEAGE_NORM_KM`].
    pub annual_mileage_norm_km: i64,
    /// See [`DEFAULT_PER_KM_RATE`].
    pub per_km_rate: f64,
    /// See [`DEFAULT_SPREAD_FRACTION`].
    pub spread_fraction: f64,
    /// See [`DEFAULT_MARGIN_FRACTION`].
    pub margin_fraction: f64,
    /// See [`DEFAULT_RECONDITIONING_DEDUCTION`].
    pub reconditioning_deduction: f64,
    /// See [`DEFAULT_LUXURY_SURCHARGE`].
    pub luxury_surcharge: f64,
    /// See [`DEFAULT_FALLBACK_BASE`].
    pub fallback_base: f64,
    /// See [`DEFAULT_TRIM_PREMIUM`].
    pub trim_premium: f64,
    /// See [`DEFAULT_AGE_TIERS`].
    pub age_tiers: Vec<(i32, f64)>,
    /// See [`DEFAULT_AGED_OUT_BASE`].
    pub aged_out_base: f64,
    /// Per-option premiums.
    pub option_premiums: OptionPremiums,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            reference_year: Utc::now().year(),
            annual_mileage_norm_km: DEFAULT_ANNUAL_MILEAGE_NORM_KM,
            per_km_rate: DEFAULT_PER_KM_RATE,
            spread_fraction: DEFAULT_SPREAD_FRACTION,
            margin_fraction: DEFAULT_MARGIN_FRACTION,
            reconditioning_deduction: DEFAULT_RECONDITIONING_DEDUCTION,
            luxury_surcharge: DEFAULT_LUXURY_SURCHARGE,
            fallback_base: DEFAULT_FALLBACK_BASE,
            trim_premium: DEFAULT_TRIM_PREMIUM,
            age_tiers: DEFAULT_AGE_TIERS.to_vec(),
            aged_out_base: DEFAULT_AGED_OUT_BASE,
            option_premiums: OptionPremiums::default(),
        }
    }
}

impl PricingPolicy {
    /// Whether the make qualifies for the luxury surcharge.
    pub fn is_luxury_make(&self, make: &str) -> bool {
        LUXURY_MAKES
            .iter()
            .any(|m| m.eq_ignore_ascii_case(make.trim()))
    }

    /// Whether the trim name contains a premium keyword.
    pub fn trim_has_premium_keyword(&self, trim: &str) -> bool {
        let trim = trim.to_lowercase();
        TRIM_KEYWORDS.iter().any(|kw| trim.contains(kw))
    }
}
