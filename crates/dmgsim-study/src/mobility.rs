//! User mobility descriptors and the beamforming period they imply.
//!
//! Descriptors are short strings:
//! - `"0"` - static user, a single training per observed horizon
//! - `"s<speed>"` - user circling the AP at `speed` m/s
//! - `"a<rate>"` - head rotation at `rate` degrees per second

use crate::error::StudyError;
use dmgsim_phy::constants::UE_TO_AP_DISTANCE_M;
use dmgsim_timeslot::Nanos;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// How fast the user leaves its current antenna sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mobility {
    /// No movement.
    #[default]
    Static,
    /// Movement along a circle around the AP, in m/s.
    Linear(u32),
    /// Rotation in place, in degrees per second.
    Angular(u32),
}

impl Mobility {
    /// Parse a mobility descriptor.
    pub fn parse(s: &str) -> Result<Self, StudyError> {
        let s = s.trim();
        if s == "0" {
            return Ok(Mobility::Static);
        }

        let invalid = || StudyError::InvalidParams(format!("Invalid mobility descriptor: '{}'", s));

        let (kind, value) = match s.char_indices().nth(1) {
            Some((split, _)) => s.split_at(split),
            None => return Err(invalid()),
        };
        let rate: u32 = value.parse().map_err(|_| invalid())?;
        if rate == 0 {
            return Err(StudyError::InvalidParams(format!(
                "Mobility rate must be positive, use \"0\" for a static user: '{}'",
                s
            )));
        }

        match kind {
            "s" => Ok(Mobility::Linear(rate)),
            "a" => Ok(Mobility::Angular(rate)),
            _ => Err(invalid()),
        }
    }

    /// Beamforming period in ns for an antenna with `sectors` sectors.
    ///
    /// A static user gets a period one nanosecond longer than `horizon`, so
    /// exactly one training falls into the observed time.
    pub fn bft_period(&self, sectors: u64, horizon: Nanos) -> Nanos {
        // Sectors divide the entire circle
        let sector_width = 360.0 / sectors as f64;
        match *self {
            Mobility::Static => horizon + 1,
            Mobility::Linear(speed) => {
                (PI * UE_TO_AP_DISTANCE_M * sector_width * 1e9 / 180.0 / speed as f64) as Nanos
            }
            Mobility::Angular(rate) => (sector_width * 1e9 / rate as f64) as Nanos,
        }
    }
}

impl FromStr for Mobility {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Mobility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mobility::Static => write!(f, "0"),
            Mobility::Linear(speed) => write!(f, "s{}", speed),
            Mobility::Angular(rate) => write!(f, "a{}", rate),
        }
    }
}

impl Serialize for Mobility {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Mobility {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MobilityVisitor;

        impl<'de> Visitor<'de> for MobilityVisitor {
            type Value = Mobility;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("0, \"s<speed>\" or \"a<rate>\"")
            }

            // A bare `0` in YAML arrives as an integer
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Mobility, E> {
                match v {
                    0 => Ok(Mobility::Static),
                    _ => Err(E::invalid_value(de::Unexpected::Unsigned(v), &self)),
                }
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Mobility, E> {
                match v {
                    0 => Ok(Mobility::Static),
                    _ => Err(E::invalid_value(de::Unexpected::Signed(v), &self)),
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Mobility, E> {
                Mobility::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MobilityVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HORIZON: Nanos = 1_000_000_000;

    #[test]
    fn test_parse_descriptors() {
        assert_eq!(Mobility::parse("0").unwrap(), Mobility::Static);
        assert_eq!(Mobility::parse("s5").unwrap(), Mobility::Linear(5));
        assert_eq!(Mobility::parse("a120").unwrap(), Mobility::Angular(120));
        assert_eq!(" s12 ".parse::<Mobility>().unwrap(), Mobility::Linear(12));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for descriptor in ["", "s", "x5", "s-1", "a1.5", "5", "s0", "a0", "00"] {
            assert!(
                matches!(Mobility::parse(descriptor), Err(StudyError::InvalidParams(_))),
                "accepted '{}'",
                descriptor
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for mobility in [Mobility::Static, Mobility::Linear(3), Mobility::Angular(90)] {
            assert_eq!(Mobility::parse(&mobility.to_string()).unwrap(), mobility);
        }
    }

    #[test]
    fn test_static_period_exceeds_horizon() {
        assert_eq!(Mobility::Static.bft_period(28, HORIZON), HORIZON + 1);
    }

    #[test]
    fn test_linear_period() {
        // 32 sectors: 11.25 deg sector, arc of 0.9817 m at 5 m, walked at 1 m/s
        let period = Mobility::Linear(1).bft_period(32, HORIZON);
        assert_eq!(period, 981_747_704);
        assert_eq!(Mobility::Linear(2).bft_period(32, HORIZON), 490_873_852);
    }

    #[test]
    fn test_angular_period() {
        // 36 sectors: 10 deg per sector at 100 deg/s
        assert_eq!(Mobility::Angular(100).bft_period(36, HORIZON), 100_000_000);
        assert_eq!(Mobility::Angular(90).bft_period(4, HORIZON), 1_000_000_000);
    }

    #[test]
    fn test_deserialize_yaml() {
        let parsed: Vec<Mobility> = serde_yaml::from_str("[0, '0', s5, a60]").unwrap();
        assert_eq!(
            parsed,
            vec![
                Mobility::Static,
                Mobility::Static,
                Mobility::Linear(5),
                Mobility::Angular(60)
            ]
        );
        assert!(serde_yaml::from_str::<Mobility>("7").is_err());
        assert!(serde_yaml::from_str::<Mobility>("q1").is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let yaml = serde_yaml::to_string(&Mobility::Angular(45)).unwrap();
        assert_eq!(yaml.trim(), "a45");
    }
}
