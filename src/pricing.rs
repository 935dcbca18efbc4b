/// The deterministic pricing stages: base value, mileage adjustment,
/// options/trim premium, and the offer calculator.
///
/// Every constant lives in `PricingPolicy`; nothing here reads ambient
/// state, so recomputing with the same inputs and policy always yields
/// the same numbers.
use crate::models::{
    MarketEstimate, OfferRecommendation, VehicleIdentity, VehicleOptions, MIN_PLAUSIBLE_YEAR,
};
use crate::policy::PricingPolicy;

/// Undepreciated reference price for the identity.
///
/// A step function on vehicle age (policy tiers, in order) plus a flat
/// luxury-make surcharge. Unresolved identities price from the policy's
/// fallback tier so the pipeline stays total.
pub fn base_value(identity: &VehicleIdentity, policy: &PricingPolicy) -> f64 {
    if !identity.resolved {
        return policy.fallback_base;
    }

    // Saturating: the resolver filters years to a plausible range, but
    // this function must stay total for any identity a caller constructs
    let age = policy.reference_year.saturating_sub(identity.year).max(0);
    let tier_value = policy
        .age_tiers
        .iter()
        .find(|(max_age, _)| age <= *max_age)
        .map(|(_, value)| *value)
        .unwrap_or(policy.aged_out_base);

    let surcharge = if policy.is_luxury_make(&identity.make) {
        policy.luxury_surcharge
    } else {
        0.0
    };

    tier_value + surcharge
}

/// Signed mileage adjustment.
///
/// Expected mileage is `(reference_year - year) * annual_mileage_norm_km`;
/// the delta is `(actual - expected) * per_km_rate`. Positive deltas are
/// subtracted from the estimate downstream; negative deltas (under-average
/// mileage) raise it. Actual mileage is clamped to >= 0 first; no upper
/// bound is enforced. Without a plausible model year there is no baseline,
/// so expected mileage is 0 and the full reading counts against the value.
pub fn mileage_adjustment(year: i32, mileage_km: i64, policy: &PricingPolicy) -> f64 {
    let actual = mileage_km.max(0);

    let expected = if year >= MIN_PLAUSIBLE_YEAR {
        policy.reference_year.saturating_sub(year).max(0) as i64 * policy.annual_mileage_norm_km
    } else {
        0
    };

    (actual - expected) as f64 * policy.per_km_rate
}

/// Sum of configured value add-ons: one trim-keyword premium plus one
/// premium per installed option. Purely additive, independent of mileage
/// and base value.
pub fn options_premium(trim: &str, options: &VehicleOptions, policy: &PricingPolicy) -> f64 {
    let mut premium = 0.0;

    if policy.trim_has_premium_keyword(trim) {
        premium += policy.trim_premium;
    }
    if options.leather {
        premium += policy.option_premiums.leather;
    }
    if options.sunroof {
        premium += policy.option_premiums.sunroof;
    }
    if options.towing_package {
        premium += policy.option_premiums.towing_package;
    }
    if options.navigation {
        premium += policy.option_premiums.navigation;
    }

    premium
}

/// Composes the adjusted mean and the spread band around it.
/// A valuation is never negative: the mean floors at zero.
pub fn estimate(
    base_value: f64,
    mileage_delta: f64,
    options_premium: f64,
    policy: &PricingPolicy,
) -> MarketEstimate {
    let mean = (base_value + options_premium - mileage_delta).max(0.0);

    MarketEstimate {
        low: mean * (1.0 - policy.spread_fraction),
        high: mean * (1.0 + policy.spread_fraction),
        mean,
    }
}

/// Converts the market mean into a trade-in offer: resale margin retained,
/// then the flat reconditioning deduction, floored at zero.
pub fn offer(estimate: &MarketEstimate, policy: &PricingPolicy) -> OfferRecommendation {
    let amount =
        (estimate.mean * (1.0 - policy.margin_fraction) - policy.reconditioning_deduction).max(0.0);

    OfferRecommendation { amount }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_policy() -> PricingPolicy {
        PricingPolicy {
            reference_year: 2024,
            ..Default::default()
        }
    }

    fn resolved(year: i32, make: &str, model: &str, trim: &str) -> VehicleIdentity {
        VehicleIdentity {
            year,
            make: make.to_string(),
            model: model.to_string(),
            trim: trim.to_string(),
            body_class: None,
            engine: None,
            resolved: true,
        }
    }

    #[test]
    fn test_base_value_tiers_step_on_age() {
        let policy = test_policy();
        assert_eq!(base_value(&resolved(2023, "Honda", "Civic", ""), &policy), 38_000.0);
        assert_eq!(base_value(&resolved(2019, "Honda", "Civic", ""), &policy), 30_000.0);
        assert_eq!(base_value(&resolved(2015, "Honda", "Civic", ""), &policy), 22_000.0);
        assert_eq!(base_value(&resolved(2010, "Honda", "Civic", ""), &policy), 14_000.0);
        assert_eq!(base_value(&resolved(2000, "Honda", "Civic", ""), &policy), 6_000.0);
    }

    #[test]
    fn test_base_value_luxury_surcharge() {
        let policy = test_policy();
        let porsche = base_value(&resolved(2015, "Porsche", "Macan S", "S"), &policy);
        let honda = base_value(&resolved(2015, "Honda", "Civic", ""), &policy);
        assert_eq!(porsche - honda, policy.luxury_surcharge);
    }

    #[test]
    fn test_base_value_total_for_extreme_years() {
        let policy = test_policy();
        // Arithmetic must saturate, not overflow, for any caller-built year
        assert_eq!(
            base_value(&resolved(i32::MIN, "Honda", "Civic", ""), &policy),
            policy.aged_out_base
        );
        assert_eq!(
            base_value(&resolved(i32::MAX, "Honda", "Civic", ""), &policy),
            38_000.0
        );
    }

    #[test]
    fn test_mileage_adjustment_total_for_extreme_years() {
        let policy = test_policy();
        // Future year saturates to zero expected mileage
        let delta = mileage_adjustment(i32::MAX, 10_000, &policy);
        assert_eq!(delta, 10_000.0 * policy.per_km_rate);
        // Below the plausible floor there is no baseline at all
        let delta = mileage_adjustment(i32::MIN, 10_000, &policy);
        assert_eq!(delta, 10_000.0 * policy.per_km_rate);
    }

    #[test]
    fn test_base_value_unresolved_uses_fallback_tier() {
        let policy = test_policy();
        let id = VehicleIdentity::unresolved();
        assert_eq!(base_value(&id, &policy), policy.fallback_base);
    }

    #[test]
    fn test_mileage_delta_zero_at_expected() {
        let policy = test_policy();
        // 2019 vehicle at reference year 2024 expects 5 * 20,000 km
        assert_eq!(mileage_adjustment(2019, 100_000, &policy), 0.0);
    }

    #[test]
    fn test_mileage_delta_sign_convention() {
        let policy = test_policy();
        // Above expected: positive delta, reduces value downstream
        assert!(mileage_adjustment(2019, 150_000, &policy) > 0.0);
        // Below expected: negative delta, raises value
        assert!(mileage_adjustment(2019, 40_000, &policy) < 0.0);
    }

    #[test]
    fn test_negative_mileage_clamped() {
        let policy = test_policy();
        assert_eq!(
            mileage_adjustment(2019, -5_000, &policy),
            mileage_adjustment(2019, 0, &policy)
        );
    }

    #[test]
    fn test_future_model_year_expects_zero_mileage() {
        let policy = test_policy();
        // reference_year + 1 must not produce a negative expectation
        let delta = mileage_adjustment(2025, 1_000, &policy);
        assert_eq!(delta, 1_000.0 * policy.per_km_rate);
    }

    #[test]
    fn test_options_premium_is_additive() {
        let policy = test_policy();
        let all = VehicleOptions {
            leather: true,
            sunroof: true,
            towing_package: true,
            navigation: true,
        };
        let premium = options_premium("Sport", &all, &policy);
        let expected = policy.trim_premium
            + policy.option_premiums.leather
            + policy.option_premiums.sunroof
            + policy.option_premiums.towing_package
            + policy.option_premiums.navigation;
        assert_eq!(premium, expected);
    }

    #[test]
    fn test_options_premium_no_keyword_no_options() {
        let policy = test_policy();
        assert_eq!(
            options_premium("Base", &VehicleOptions::default(), &policy),
            0.0
        );
    }

    #[test]
    fn test_estimate_band_ordering() {
        let policy = test_policy();
        let est = estimate(30_000.0, 750.0, 1_500.0, &policy);
        assert!(est.low <= est.mean);
        assert!(est.mean <= est.high);
        assert_eq!(est.mean, 30_750.0);
    }

    #[test]
    fn test_estimate_floors_at_zero() {
        let policy = test_policy();
        // Extreme mileage delta overwhelms the base value
        let est = estimate(6_000.0, 1_000_000.0, 0.0, &policy);
        assert_eq!(est.mean, 0.0);
        assert_eq!(est.low, 0.0);
        assert_eq!(est.high, 0.0);
    }

    #[test]
    fn test_offer_applies_margin_and_deduction() {
        let policy = test_policy();
        let est = MarketEstimate {
            low: 0.0,
            high: 0.0,
            mean: 24_450.0,
        };
        let offer = offer(&est, &policy);
        assert_eq!(offer.amount, 24_450.0 * 0.85 - 4_500.0);
        assert!(offer.amount <= est.mean);
    }

    #[test]
    fn test_offer_floors_at_zero() {
        let policy = test_policy();
        let est = MarketEstimate {
            low: 0.0,
            high: 0.0,
            mean: 1_000.0,
        };
        assert_eq!(offer(&est, &policy).amount, 0.0);
    }
}
