//! Identifiers shared by every layer of the booking system

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique key of a passenger
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassengerId(pub u64);

/// Unique key of a flight
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightNumber(pub u32);

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FlightNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PassengerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl FromStr for FlightNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Fare class partitioning a flight's seats
///
/// The variants are declared in cabin order, which is also the order in
/// which seat rows are laid out and in which whole-flight promotion runs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum FareClass {
    /// First class
    First,
    /// Business class
    Business,
    /// Economy class
    Economy,
}

impl FareClass {
    /// All fare classes in cabin order
    pub const ALL: [FareClass; 3] = [FareClass::First, FareClass::Business, FareClass::Economy];

    /// Position of the class in [`FareClass::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        match self {
            FareClass::First => 0,
            FareClass::Business => 1,
            FareClass::Economy => 2,
        }
    }

    /// Name of the class as used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            FareClass::First => "First",
            FareClass::Business => "Business",
            FareClass::Economy => "Economy",
        }
    }
}

impl fmt::Display for FareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a fare class
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fare class `{0}`")]
pub struct UnknownFareClass(pub String);

impl FromStr for FareClass {
    type Err = UnknownFareClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FareClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFareClass(s.to_owned()))
    }
}

/// Opaque seat label such as `7C`
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(String);

impl SeatId {
    /// Create a seat id from its label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The seat label
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Row and letter of a generated label, used to order seat manifests
    ///
    /// Labels that do not follow the `<row><letter>` pattern sort after all
    /// generated ones.
    pub fn sort_key(&self) -> (u32, &str) {
        let digits = self.0.bytes().take_while(u8::is_ascii_digit).count();
        match self.0[..digits].parse() {
            Ok(row) => (row, &self.0[digits..]),
            Err(_) => (u32::MAX, self.0.as_str()),
        }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeatId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}
