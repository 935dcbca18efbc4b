use crate::models::VehicleIdentity;

/// One knowledge-base entry: known issues for a make/model/year-range.
///
/// `model_fragment` matches as a case-insensitive substring of the model
/// name, so "Macan" covers "Macan S" and "Macan Turbo".
struct DefectEntry {
    make: &'static str,
    model_fragment: &'static str,
    year_min: i32,
    year_max: i32,
    advisories: &'static [&'static str],
}

/// Static reference data, read-only at runtime. Matching entries are
/// concatenated in declaration order; ordering here is curation, not
/// alphabetical accident.
const DEFECT_KB: &[DefectEntry] = &[
    DefectEntry {
        make: "Porsche",
        model_fragment: "Macan",
        year_min: 2014,
        year_max: 2018,
        advisories: &[
            "Timing cover bolts: known major oil leak risk; repair is labor-intensive and costly",
            "Transfer case: recurring shudder under acceleration, often needs replacement",
            "Above ~180,000 km: air suspension (if equipped) and control arms commonly due",
        ],
    },
    DefectEntry {
        make: "Ram",
        model_fragment: "1500",
        year_min: 2019,
        year_max: 2021,
        advisories: &[
            "eTorque 48V system: battery and belt-starter generator failures reported",
            "Rear axle: whine/hum under light throttle on early production units",
            "Uconnect head unit: screen delamination and spontaneous reboots",
        ],
    },
    DefectEntry {
        make: "Honda",
        model_fragment: "Civic",
        year_min: 2016,
        year_max: 2018,
        advisories: &[
            "1.5T engines: fuel dilution of engine oil in cold climates; check oil level and smell",
            "A/C condenser: premature failure, verify cold output at idle",
        ],
    },
    DefectEntry {
        make: "Ford",
        model_fragment: "F-150",
        year_min: 2015,
        year_max: 2017,
        advisories: &[
            "Cam phaser rattle on cold start (V8); listen before purchase",
            "Aluminum body panels: repairs are specialist work, inspect prior bodywork closely",
        ],
    },
    DefectEntry {
        make: "BMW",
        model_fragment: "X5",
        year_min: 2011,
        year_max: 2018,
        advisories: &[
            "Timing chain guides (N20/N47): failure risk at high mileage",
            "Oil filter housing gasket: common leak onto serpentine belt",
        ],
    },
];

/// Looks up known-issue advisories for an identity.
///
/// Exact case-insensitive make, case-insensitive substring model, model
/// year inside the entry's inclusive range. All matching entries are
/// concatenated in declaration order. No match returns an empty list; the
/// generic "inspect standard wear items" text is a display fallback
/// supplied separately, never part of this list.
pub fn lookup(identity: &VehicleIdentity) -> Vec<String> {
    // An unresolved identity must never pick up another vehicle's defects
    if !identity.resolved {
        return Vec::new();
    }

    let make = identity.make.trim();
    let model = identity.model.to_lowercase();

    let advisories: Vec<String> = DEFECT_KB
        .iter()
        .filter(|entry| {
            entry.make.eq_ignore_ascii_case(make)
                && model.contains(&entry.model_fragment.to_lowercase())
                && (entry.year_min..=entry.year_max).contains(&identity.year)
        })
        .flat_map(|entry| entry.advisories.iter().map(|s| s.to_string()))
        .collect();

    tracing::debug!(
        "Defect lookup for {} {} {}: {} advisories",
        identity.year,
        identity.make,
        identity.model,
        advisories.len()
    );

    advisories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(year: i32, make: &str, model: &str) -> VehicleIdentity {
        VehicleIdentity {
            year,
            make: make.to_string(),
            model: model.to_string(),
            trim: String::new(),
            body_class: None,
            engine: None,
            resolved: true,
        }
    }

    #[test]
    fn test_macan_s_matches_macan_entry() {
        let advisories = lookup(&identity(2015, "Porsche", "Macan S"));
        assert_eq!(advisories.len(), 3);
        assert!(advisories[0].contains("Timing cover bolts"));
    }

    #[test]
    fn test_make_match_is_case_insensitive() {
        let advisories = lookup(&identity(2019, "RAM", "1500"));
        assert!(!advisories.is_empty());
        assert!(advisories.iter().any(|a| a.contains("eTorque")));
    }

    #[test]
    fn test_year_outside_range_excluded() {
        assert!(lookup(&identity(2013, "Porsche", "Macan S")).is_empty());
        assert!(lookup(&identity(2022, "Ram", "1500")).is_empty());
    }

    #[test]
    fn test_year_range_is_inclusive() {
        assert!(!lookup(&identity(2014, "Porsche", "Macan")).is_empty());
        assert!(!lookup(&identity(2018, "Porsche", "Macan Turbo")).is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(lookup(&identity(2015, "Toyota", "Corolla")).is_empty());
    }

    #[test]
    fn test_unresolved_identity_matches_nothing() {
        let unresolved = VehicleIdentity::unresolved();
        assert!(lookup(&unresolved).is_empty());
    }
}
