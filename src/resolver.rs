/// Identity resolution: reconciles up to three candidate sources into one
/// canonical `VehicleIdentity`.
///
/// Source precedence, field by field:
/// 1. Manual override (a non-empty manual field wins outright for that field)
/// 2. Externally decoded record (skipped when unavailable or make is empty)
/// 3. Internal VIN-prefix pattern table
///
/// The resolver is total and idempotent: malformed input never errors, it
/// just contributes nothing, and an identity that cannot be completed is
/// marked unresolved with explicit sentinel fields.
use crate::models::{
    DecodedVehicleRecord, ManualOverride, VehicleIdentity, MIN_PLAUSIBLE_YEAR, UNKNOWN_FIELD,
};
use crate::patterns;

/// A partial identity contributed by one source. Fields a source cannot
/// speak to stay `None` so the merge can fall through to lower-precedence
/// sources per field.
#[derive(Debug, Clone, Default)]
pub struct PartialIdentity {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub body_class: Option<String>,
    pub engine: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Filters a candidate year to the plausible range
/// (1980..=reference_year + 1). Applied to every source that carries a
/// free-form year, so garbage like a decode response of "-2147483648"
/// never reaches the pricing arithmetic.
fn plausible_year(year: Option<i32>, reference_year: i32, source: &str) -> Option<i32> {
    year.filter(|y| {
        let plausible = (MIN_PLAUSIBLE_YEAR..=reference_year + 1).contains(y);
        if !plausible {
            tracing::warn!("Ignoring implausible {} year: {}", source, y);
        }
        plausible
    })
}

/// Manual override fields, filtered to usable values.
///
/// An implausible year (outside 1980..=reference_year+1) is ignored with a
/// warning rather than rejected, per the clamp-don't-abort input policy.
fn manual_source(overrides: &ManualOverride, reference_year: i32) -> Option<PartialIdentity> {
    if overrides.is_empty() {
        return None;
    }

    let year = plausible_year(overrides.year, reference_year, "manual override");

    Some(PartialIdentity {
        year,
        make: non_empty(overrides.make.as_deref()),
        model: non_empty(overrides.model.as_deref()),
        trim: non_empty(overrides.trim.as_deref()),
        body_class: None,
        engine: None,
    })
}

/// Externally decoded record. An empty make is treated as a failed lookup
/// and disqualifies the whole record, falling through to the pattern table.
fn decoded_source(record: &DecodedVehicleRecord, reference_year: i32) -> Option<PartialIdentity> {
    if record.make.trim().is_empty() {
        tracing::warn!("Decode record has empty make; treating lookup as failed");
        return None;
    }

    let year = plausible_year(
        record.model_year.trim().parse::<i32>().ok(),
        reference_year,
        "decoded",
    );

    // Prefer the explicit trim designation, fall back to the series name
    let trim = non_empty(Some(&record.trim)).or_else(|| non_empty(Some(&record.series)));

    let engine = match (
        non_empty(Some(&record.engine_cylinders)),
        non_empty(Some(&record.displacement_l)),
    ) {
        (Some(cyl), Some(disp)) => Some(format!("{}-cyl {}L", cyl, disp)),
        (Some(cyl), None) => Some(format!("{}-cyl", cyl)),
        (None, Some(disp)) => Some(format!("{}L", disp)),
        (None, None) => None,
    };

    Some(PartialIdentity {
        year,
        make: non_empty(Some(&record.make)),
        model: non_empty(Some(&record.model)),
        trim,
        body_class: non_empty(Some(&record.body_class)),
        engine,
    })
}

/// Internal fixed pattern table keyed by identity-code prefix.
fn pattern_source(vin: Option<&str>) -> Option<PartialIdentity> {
    let id = patterns::match_vin_pattern(vin?)?;
    Some(PartialIdentity {
        year: Some(id.year),
        make: Some(id.make),
        model: Some(id.model),
        trim: non_empty(Some(&id.trim)),
        body_class: id.body_class,
        engine: id.engine,
    })
}

/// Merges partial identities in precedence order: the first source with a
/// value for a field wins that field.
fn merge_partials(sources: Vec<PartialIdentity>) -> VehicleIdentity {
    let mut merged = PartialIdentity::default();
    for source in sources {
        merged.year = merged.year.or(source.year);
        merged.make = merged.make.or(source.make);
        merged.model = merged.model.or(source.model);
        merged.trim = merged.trim.or(source.trim);
        merged.body_class = merged.body_class.or(source.body_class);
        merged.engine = merged.engine.or(source.engine);
    }

    let resolved = merged.year.is_some() && merged.make.is_some() && merged.model.is_some();
    if !resolved {
        tracing::info!("No source fully resolved the identity; marking unresolved");
    }

    // Unresolved fields get explicit sentinels, never nulls, so the
    // pricing arithmetic downstream stays total.
    VehicleIdentity {
        year: merged.year.unwrap_or(0),
        make: merged.make.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        model: merged.model.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        trim: merged.trim.unwrap_or_default(),
        body_class: merged.body_class,
        engine: merged.engine,
        resolved,
    }
}

/// Produces the canonical identity for a request.
///
/// `decoded` is the already-fetched decode result (`None` when the lookup
/// was skipped or unavailable); this function itself performs no I/O, no
/// caching and no retry.
pub fn resolve_identity(
    overrides: &ManualOverride,
    decoded: Option<&DecodedVehicleRecord>,
    vin: Option<&str>,
    reference_year: i32,
) -> VehicleIdentity {
    let mut sources = Vec::new();

    if let Some(manual) = manual_source(overrides, reference_year) {
        sources.push(manual);
    }
    if let Some(decoded) = decoded.and_then(|record| decoded_source(record, reference_year)) {
        sources.push(decoded);
    }
    if let Some(pattern) = pattern_source(vin) {
        sources.push(pattern);
    }

    merge_partials(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ram_record() -> DecodedVehicleRecord {
        DecodedVehicleRecord {
            model_year: "2019".to_string(),
            make: "Ram".to_string(),
            model: "1500".to_string(),
            series: "Sport".to_string(),
            trim: String::new(),
            displacement_l: "5.7".to_string(),
            engine_cylinders: "8".to_string(),
            body_class: "Pickup".to_string(),
        }
    }

    #[test]
    fn test_manual_field_wins_over_decoded_field() {
        // Manual supplies make only; decode supplies both make and model
        let overrides = ManualOverride {
            make: Some("Dodge".to_string()),
            ..Default::default()
        };
        let record = ram_record();
        let id = resolve_identity(&overrides, Some(&record), None, 2024);

        assert!(id.resolved);
        assert_eq!(id.make, "Dodge");
        assert_eq!(id.model, "1500");
        assert_eq!(id.year, 2019);
    }

    #[test]
    fn test_decoded_record_preferred_over_pattern() {
        let record = ram_record();
        // VIN matches the Macan pattern, but the decode answered
        let id = resolve_identity(
            &ManualOverride::default(),
            Some(&record),
            Some("WP1AB2A58FLB70195"),
            2024,
        );
        assert_eq!(id.make, "Ram");
        assert_eq!(id.model, "1500");
    }

    #[test]
    fn test_empty_make_falls_back_to_pattern_table() {
        let record = DecodedVehicleRecord {
            make: "".to_string(),
            ..ram_record()
        };
        let id = resolve_identity(
            &ManualOverride::default(),
            Some(&record),
            Some("WP1AB2A58FLB70195"),
            2024,
        );
        assert!(id.resolved);
        assert_eq!(id.make, "Porsche");
        assert_eq!(id.model, "Macan S");
        assert_eq!(id.year, 2015);
    }

    #[test]
    fn test_no_source_yields_unresolved_sentinels() {
        let id = resolve_identity(&ManualOverride::default(), None, Some("not-a-vin"), 2024);
        assert!(!id.resolved);
        assert_eq!(id.make, UNKNOWN_FIELD);
        assert_eq!(id.model, UNKNOWN_FIELD);
        assert_eq!(id.year, 0);
    }

    #[test]
    fn test_implausible_decoded_year_ignored() {
        // A hostile or corrupt decode response must not smuggle a year
        // past the plausibility filter the manual source already applies
        let record = DecodedVehicleRecord {
            model_year: "-2147483648".to_string(),
            ..ram_record()
        };
        let id = resolve_identity(&ManualOverride::default(), Some(&record), None, 2024);
        assert!(!id.resolved);
        assert_eq!(id.year, 0);
        assert_eq!(id.make, "Ram");

        let record = DecodedVehicleRecord {
            model_year: "9999".to_string(),
            ..ram_record()
        };
        let id = resolve_identity(&ManualOverride::default(), Some(&record), None, 2024);
        assert!(!id.resolved);
        assert_eq!(id.year, 0);
    }

    #[test]
    fn test_implausible_manual_year_ignored() {
        let overrides = ManualOverride {
            year: Some(1776),
            make: Some("Porsche".to_string()),
            model: Some("Macan S".to_string()),
            ..Default::default()
        };
        let id = resolve_identity(&overrides, None, None, 2024);
        // Year could not be resolved from any source
        assert!(!id.resolved);
        assert_eq!(id.year, 0);
        assert_eq!(id.make, "Porsche");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let overrides = ManualOverride {
            trim: Some("Sport".to_string()),
            ..Default::default()
        };
        let record = ram_record();
        let first = resolve_identity(&overrides, Some(&record), None, 2024);
        let second = resolve_identity(&overrides, Some(&record), None, 2024);
        assert_eq!(first, second);
    }

    #[test]
    fn test_series_used_when_trim_empty() {
        let id = resolve_identity(&ManualOverride::default(), Some(&ram_record()), None, 2024);
        assert_eq!(id.trim, "Sport");
        assert_eq!(id.engine.as_deref(), Some("8-cyl 5.7L"));
    }
}
