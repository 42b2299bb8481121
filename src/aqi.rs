// EPA Air Quality Index derivation from particulate-matter readings

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker emitted for readings with no computable index.
const UNAVAILABLE_MARKER: &str = "-";

/// Derived Air Quality Index value for a single reading.
///
/// `Raw` carries a negative concentration through unchanged. The sensor
/// network occasionally reports small negative concentrations and the index
/// has always passed them along instead of flagging them; downstream
/// consumers rely on seeing the raw value there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Aqi {
    Index(i64),
    Raw(f64),
    Unavailable,
}

impl Aqi {
    pub fn description(&self) -> Option<&'static str> {
        match self {
            Aqi::Index(value) => aqi_description(*value),
            _ => None,
        }
    }
}

impl Serialize for Aqi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Aqi::Index(value) => serializer.serialize_i64(*value),
            Aqi::Raw(value) => serializer.serialize_f64(*value),
            Aqi::Unavailable => serializer.serialize_str(UNAVAILABLE_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for Aqi {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(i64),
            Float(f64),
            Marker(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Int(value) => Ok(Aqi::Index(value)),
            Repr::Float(value) => Ok(Aqi::Raw(value)),
            Repr::Marker(marker) if marker == UNAVAILABLE_MARKER => Ok(Aqi::Unavailable),
            Repr::Marker(other) => Err(D::Error::custom(format!("unexpected AQI marker {other:?}"))),
        }
    }
}

/// Maps a PM concentration (µg/m³) to an AQI value using the EPA
/// piecewise-linear breakpoint table.
///
/// NaN and concentrations above 1000 are unavailable. Negative
/// concentrations are returned unchanged, see [`Aqi::Raw`].
pub fn aqi_from_pm(pm: f64) -> Aqi {
    if pm.is_nan() {
        return Aqi::Unavailable;
    }
    if pm < 0.0 {
        return Aqi::Raw(pm);
    }
    if pm > 1000.0 {
        return Aqi::Unavailable;
    }

    let index = if pm > 350.5 {
        calc_aqi(pm, 500.0, 401.0, 500.0, 350.5)
    } else if pm > 250.5 {
        calc_aqi(pm, 400.0, 301.0, 350.4, 250.5)
    } else if pm > 150.5 {
        calc_aqi(pm, 300.0, 201.0, 250.4, 150.5)
    } else if pm > 55.5 {
        calc_aqi(pm, 200.0, 151.0, 150.4, 55.5)
    } else if pm > 35.5 {
        calc_aqi(pm, 150.0, 101.0, 55.4, 35.5)
    } else if pm > 12.1 {
        calc_aqi(pm, 100.0, 51.0, 35.4, 12.1)
    } else {
        calc_aqi(pm, 50.0, 0.0, 12.0, 0.0)
    };
    Aqi::Index(index)
}

/// Maps an AQI value to its descriptive band, selected by the highest
/// matching lower-bound threshold. Values below 0 have no band.
pub fn aqi_description(aqi: i64) -> Option<&'static str> {
    if aqi >= 401 {
        Some("Hazardous")
    } else if aqi >= 301 {
        Some("Hazardous")
    } else if aqi >= 201 {
        Some("Very Unhealthy")
    } else if aqi >= 151 {
        Some("Unhealthy")
    } else if aqi >= 101 {
        Some("Unhealthy for Sensitive Groups")
    } else if aqi >= 51 {
        Some("Moderate")
    } else if aqi >= 0 {
        Some("Good")
    } else {
        None
    }
}

/// Linear interpolation within one breakpoint segment:
/// `(Ihigh - Ilow) / (BPhigh - BPlow) * (Cp - BPlow) + Ilow`, rounded.
fn calc_aqi(cp: f64, ih: f64, il: f64, bph: f64, bpl: f64) -> i64 {
    ((ih - il) / (bph - bpl) * (cp - bpl) + il).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Position of a band in severity order, for monotonicity checks.
    fn band_rank(band: &str) -> usize {
        [
            "Good",
            "Moderate",
            "Unhealthy for Sensitive Groups",
            "Unhealthy",
            "Very Unhealthy",
            "Hazardous",
        ]
        .iter()
        .position(|b| *b == band)
        .unwrap()
    }

    #[test]
    fn test_nan_is_unavailable() {
        assert_eq!(aqi_from_pm(f64::NAN), Aqi::Unavailable);
    }

    #[test]
    fn test_above_range_is_unavailable() {
        assert_eq!(aqi_from_pm(1000.1), Aqi::Unavailable);
    }

    #[test]
    fn test_negative_passes_through_unchanged() {
        assert_eq!(aqi_from_pm(-4.2), Aqi::Raw(-4.2));
        assert_eq!(aqi_from_pm(-4.2).description(), None);
    }

    #[test]
    fn test_zero_is_good() {
        assert_eq!(aqi_from_pm(0.0), Aqi::Index(0));
        assert_eq!(aqi_from_pm(0.0).description(), Some("Good"));
    }

    #[test]
    fn test_breakpoint_routing() {
        // each documented breakpoint value stays in the lower segment, a
        // nudge above it crosses into the next one
        assert_eq!(aqi_from_pm(12.1), Aqi::Index(50));
        assert_eq!(aqi_from_pm(12.2), Aqi::Index(51));
        assert_eq!(aqi_from_pm(35.5), Aqi::Index(100));
        assert_eq!(aqi_from_pm(35.6), Aqi::Index(101));
        assert_eq!(aqi_from_pm(150.5), Aqi::Index(200));
        assert_eq!(aqi_from_pm(150.6), Aqi::Index(201));
        assert_eq!(aqi_from_pm(250.5), Aqi::Index(300));
        assert_eq!(aqi_from_pm(250.6), Aqi::Index(301));
        assert_eq!(aqi_from_pm(350.5), Aqi::Index(400));
        assert_eq!(aqi_from_pm(350.6), Aqi::Index(401));
    }

    #[test]
    fn test_sensitive_groups_boundary() {
        assert_eq!(aqi_from_pm(55.5), Aqi::Index(150));
        assert_eq!(
            aqi_from_pm(55.5).description(),
            Some("Unhealthy for Sensitive Groups")
        );
        assert_eq!(aqi_from_pm(55.6), Aqi::Index(151));
        assert_eq!(aqi_from_pm(55.6).description(), Some("Unhealthy"));
    }

    #[test]
    fn test_description_bands() {
        assert_eq!(aqi_description(0), Some("Good"));
        assert_eq!(aqi_description(50), Some("Good"));
        assert_eq!(aqi_description(51), Some("Moderate"));
        assert_eq!(aqi_description(101), Some("Unhealthy for Sensitive Groups"));
        assert_eq!(aqi_description(151), Some("Unhealthy"));
        assert_eq!(aqi_description(201), Some("Very Unhealthy"));
        assert_eq!(aqi_description(301), Some("Hazardous"));
        assert_eq!(aqi_description(401), Some("Hazardous"));
        assert_eq!(aqi_description(-1), None);
    }

    #[test]
    fn test_serialization_round_trip() {
        let index: Aqi = serde_json::from_str("151").unwrap();
        assert_eq!(index, Aqi::Index(151));
        assert_eq!(serde_json::to_string(&Aqi::Index(151)).unwrap(), "151");

        let unavailable: Aqi = serde_json::from_str("\"-\"").unwrap();
        assert_eq!(unavailable, Aqi::Unavailable);
        assert_eq!(
            serde_json::to_string(&Aqi::Unavailable).unwrap(),
            "\"-\""
        );

        let raw: Aqi = serde_json::from_str("-4.2").unwrap();
        assert_eq!(raw, Aqi::Raw(-4.2));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_description_defined_in_range(pm in 0.0f64..=1000.0) {
            let aqi = aqi_from_pm(pm);
            prop_assert!(matches!(aqi, Aqi::Index(_)));
            prop_assert!(aqi.description().is_some());
        }

        #[test]
        fn prop_band_non_decreasing(low in 0.0f64..=1000.0, high in 0.0f64..=1000.0) {
            let (low, high) = if low <= high { (low, high) } else { (high, low) };
            let low_rank = band_rank(aqi_from_pm(low).description().unwrap());
            let high_rank = band_rank(aqi_from_pm(high).description().unwrap());
            prop_assert!(low_rank <= high_rank);
        }
    }
}
