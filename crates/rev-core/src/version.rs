//! Per-section version numbers and increment rules
//!
//! Versions are `major.minor` with an optional hotfix component, rendered as
//! `"1.4"` or `"1.4.2"`. A section with no recorded version is at `0.1`.

use crate::error::{Error, Result};
use rev_content::Section;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How a published section's version moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementKind {
    Major,
    Minor,
    Hotfix,
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Hotfix => write!(f, "hotfix"),
        }
    }
}

impl FromStr for IncrementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "hotfix" => Ok(Self::Hotfix),
            _ => Err(Error::InvalidIncrement {
                input: s.to_string(),
            }),
        }
    }
}

/// A section version: `major.minor[.hotfix]`
///
/// Orders by major, then minor, then hotfix (absent sorts before any hotfix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionNumber {
    major: u64,
    minor: u64,
    hotfix: Option<u64>,
}

impl VersionNumber {
    /// Version of a section that has never been published
    pub const INITIAL: Self = Self {
        major: 0,
        minor: 1,
        hotfix: None,
    };

    pub fn new(major: u64, minor: u64) -> Self {
        Self {
            major,
            minor,
            hotfix: None,
        }
    }

    pub fn with_hotfix(major: u64, minor: u64, hotfix: u64) -> Self {
        Self {
            major,
            minor,
            hotfix: Some(hotfix),
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn hotfix(&self) -> Option<u64> {
        self.hotfix
    }

    /// The next version for an increment of `kind`
    ///
    /// - `Major`: major + 1, minor reset to 0, hotfix cleared
    /// - `Minor`: minor + 1, hotfix cleared
    /// - `Hotfix`: hotfix + 1 when a hotfix component exists, otherwise the
    ///   same as `Minor`
    ///
    /// Fails with [`Error::VersionOverflow`] when the bumped component is
    /// already `u64::MAX`.
    pub fn increment(self, kind: IncrementKind) -> Result<Self> {
        let overflow = || Error::VersionOverflow {
            version: self,
            kind,
        };
        let next = match (kind, self.hotfix) {
            (IncrementKind::Major, _) => {
                Self::new(self.major.checked_add(1).ok_or_else(overflow)?, 0)
            }
            (IncrementKind::Hotfix, Some(hotfix)) => Self::with_hotfix(
                self.major,
                self.minor,
                hotfix.checked_add(1).ok_or_else(overflow)?,
            ),
            (IncrementKind::Minor, _) | (IncrementKind::Hotfix, None) => {
                Self::new(self.major, self.minor.checked_add(1).ok_or_else(overflow)?)
            }
        };
        Ok(next)
    }
}

impl Default for VersionNumber {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hotfix {
            Some(hotfix) => write!(f, "{}.{}.{}", self.major, self.minor, hotfix),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for VersionNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVersion {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(invalid("expected major.minor or major.minor.hotfix"));
        }

        let mut numbers = Vec::with_capacity(parts.len());
        for part in &parts {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("components must be non-negative integers"));
            }
            let n: u64 = part
                .parse()
                .map_err(|_| invalid("components must be non-negative integers"))?;
            numbers.push(n);
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            hotfix: numbers.get(2).copied(),
        })
    }
}

impl TryFrom<String> for VersionNumber {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<VersionNumber> for String {
    fn from(version: VersionNumber) -> Self {
        version.to_string()
    }
}

/// Current version of every published section
///
/// Treated as a value: operations consume the state and return the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionState {
    sections: BTreeMap<Section, VersionNumber>,
}

impl VersionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version of a section, `0.1` if none was recorded
    pub fn get(&self, section: &Section) -> VersionNumber {
        self.recorded(section).unwrap_or(VersionNumber::INITIAL)
    }

    /// The recorded version of a section, if any
    pub fn recorded(&self, section: &Section) -> Option<VersionNumber> {
        self.sections.get(section).copied()
    }

    /// Record an explicit version for a section
    pub fn with_version(mut self, section: Section, version: VersionNumber) -> Self {
        self.sections.insert(section, version);
        self
    }

    /// Increment one section's version
    pub fn increment(mut self, section: &Section, kind: IncrementKind) -> Result<Self> {
        let next = self.get(section).increment(kind)?;
        self.sections.insert(section.clone(), next);
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Section, &VersionNumber)> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0.1", IncrementKind::Major, "1.0")]
    #[case("1.4.2", IncrementKind::Major, "2.0")]
    #[case("0.1", IncrementKind::Minor, "0.2")]
    #[case("1.4.2", IncrementKind::Minor, "1.5")]
    #[case("1.4.2", IncrementKind::Hotfix, "1.4.3")]
    #[case("1.4", IncrementKind::Hotfix, "1.5")]
    #[case("1.4.0", IncrementKind::Hotfix, "1.4.1")]
    fn increment_rules(#[case] from: &str, #[case] kind: IncrementKind, #[case] expected: &str) {
        let version: VersionNumber = from.parse().unwrap();
        assert_eq!(version.increment(kind).unwrap().to_string(), expected);
    }

    #[rstest]
    #[case("0.1")]
    #[case("3.12")]
    #[case("3.12.7")]
    fn display_round_trips(#[case] input: &str) {
        let version: VersionNumber = input.parse().unwrap();
        assert_eq!(version.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("1")]
    #[case("1.2.3.4")]
    #[case("1.x")]
    #[case("-1.2")]
    #[case("1..2")]
    #[case("+1.+2")]
    #[case("1.-0")]
    #[case("1. 2")]
    #[case("18446744073709551616.0")]
    fn parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            input.parse::<VersionNumber>(),
            Err(Error::InvalidVersion { .. })
        ));
    }

    #[rstest]
    #[case("18446744073709551615.3", IncrementKind::Major)]
    #[case("2.18446744073709551615", IncrementKind::Minor)]
    #[case("2.18446744073709551615", IncrementKind::Hotfix)]
    #[case("2.3.18446744073709551615", IncrementKind::Hotfix)]
    fn increment_at_u64_max_is_an_error(#[case] from: &str, #[case] kind: IncrementKind) {
        let version: VersionNumber = from.parse().unwrap();
        assert!(matches!(
            version.increment(kind),
            Err(Error::VersionOverflow { version: v, kind: k }) if v == version && k == kind
        ));
    }

    #[test]
    fn state_loaded_at_u64_max_refuses_major_increment() {
        let guide = Section::named("guide").unwrap();
        let state: VersionState =
            serde_json::from_str(r#"{"guide":"18446744073709551615.3"}"#).unwrap();

        let err = state.clone().increment(&guide, IncrementKind::Major).unwrap_err();
        assert!(err.to_string().contains("18446744073709551615.3"));
        assert_eq!(state.get(&guide).major(), u64::MAX);
    }

    #[test]
    fn ordering_is_numeric() {
        let v = |s: &str| s.parse::<VersionNumber>().unwrap();
        assert!(v("0.10") > v("0.9"));
        assert!(v("1.0") > v("0.99.99"));
        assert!(v("1.2.0") > v("1.2"));
        assert!(v("1.2.1") < v("1.3"));
    }

    #[test]
    fn repeated_hotfix_increments_strictly_increase() {
        let mut version = VersionNumber::with_hotfix(2, 0, 0);
        for expected in 1..5 {
            version = version.increment(IncrementKind::Hotfix).unwrap();
            assert_eq!(version.hotfix(), Some(expected));
            assert_eq!((version.major(), version.minor()), (2, 0));
        }
    }

    #[test]
    fn state_starts_sections_at_initial_version() {
        let guide = Section::named("guide").unwrap();
        let state = VersionState::new();
        assert_eq!(state.get(&guide), VersionNumber::INITIAL);
        assert_eq!(state.recorded(&guide), None);

        let state = state.increment(&guide, IncrementKind::Minor).unwrap();
        assert_eq!(state.get(&guide).to_string(), "0.2");
    }

    #[test]
    fn state_serializes_as_string_map() {
        let state = VersionState::new()
            .with_version(Section::named("guide").unwrap(), VersionNumber::new(1, 2))
            .with_version(
                Section::named("procedure").unwrap(),
                VersionNumber::with_hotfix(0, 3, 1),
            );

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({"guide": "1.2", "procedure": "0.3.1"}));

        let parsed: VersionState = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn increment_kind_parses_case_insensitively() {
        assert_eq!("Major".parse::<IncrementKind>().unwrap(), IncrementKind::Major);
        assert_eq!(" hotfix ".parse::<IncrementKind>().unwrap(), IncrementKind::Hotfix);
        assert!("patch".parse::<IncrementKind>().is_err());
    }
}
