use crate::models::VehicleIdentity;
use regex::Regex;

/// A fixed identity pattern keyed by VIN prefix.
///
/// The prefix covers the manufacturer/model/engine positions of the VIN
/// (WMI + VDS), which is enough to pin down the configurations the
/// dealership sees repeatedly without calling the decode service.
struct VinPattern {
    prefix: &'static str,
    year: i32,
    make: &'static str,
    model: &'static str,
    trim: &'static str,
    engine: &'static str,
    body_class: &'static str,
}

/// Internal pattern table, checked in declaration order.
/// Fallback source when the decode service is unavailable or inconclusive.
const VIN_PATTERNS: &[VinPattern] = &[
    VinPattern {
        prefix: "WP1AB2A58",
        year: 2015,
        make: "Porsche",
        model: "Macan S",
        trim: "S",
        engine: "V6 3.0L Gasoline",
        body_class: "SUV",
    },
    VinPattern {
        prefix: "1C6SRFFT",
        year: 2019,
        make: "Ram",
        model: "1500",
        trim: "Laramie",
        engine: "V8 5.7L HEMI",
        body_class: "Pickup",
    },
    VinPattern {
        prefix: "2HGFC2F5",
        year: 2017,
        make: "Honda",
        model: "Civic",
        trim: "LX",
        engine: "I4 2.0L",
        body_class: "Sedan",
    },
    VinPattern {
        prefix: "1FTEW1EP",
        year: 2018,
        make: "Ford",
        model: "F-150",
        trim: "XLT",
        engine: "V6 2.7L EcoBoost",
        body_class: "Pickup",
    },
];

/// Checks whether a string has the shape of a VIN: 17 characters from the
/// VIN alphabet (letters I, O and Q are excluded by the standard).
///
/// Malformed codes are not an error anywhere in the pipeline; they simply
/// contribute nothing to identity resolution.
pub fn is_plausible_vin(raw: &str) -> bool {
    let vin_regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
    vin_regex.is_match(&raw.trim().to_uppercase())
}

/// Looks up the identity-code prefix table.
///
/// Returns the first matching pattern as a resolved identity, or `None`
/// when the code matches nothing. Matching is case-insensitive on the
/// normalized (trimmed, uppercased) code.
pub fn match_vin_pattern(raw: &str) -> Option<VehicleIdentity> {
    let vin = raw.trim().to_uppercase();
    if vin.is_empty() {
        return None;
    }

    let pattern = VIN_PATTERNS.iter().find(|p| vin.starts_with(p.prefix))?;
    tracing::debug!(
        "VIN prefix {} matched internal pattern: {} {} {}",
        pattern.prefix,
        pattern.year,
        pattern.make,
        pattern.model
    );

    Some(VehicleIdentity {
        year: pattern.year,
        make: pattern.make.to_string(),
        model: pattern.model.to_string(),
        trim: pattern.trim.to_string(),
        body_class: Some(pattern.body_class.to_string()),
        engine: Some(pattern.engine.to_string()),
        resolved: true,
    })
}
