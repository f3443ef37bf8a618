//! HL7 null flavors.
//!
//! A null flavor stands in for a value that is absent but accounted for
//! (masked, unknown, not asked, ...). Fields that accept one declare the
//! subset they allow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HL7 v3 null flavor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NullFlavor {
    /// Masked: value withheld for privacy or security reasons.
    Msk,
    /// Asked but unknown.
    Asku,
    /// Not asked.
    Nask,
    /// No information.
    Ni,
    /// Unknown.
    Unk,
    /// Positive infinity.
    Pinf,
    /// Negative infinity.
    Ninf,
    /// Not applicable.
    Na,
}

impl NullFlavor {
    pub const ALL: [NullFlavor; 8] = [
        NullFlavor::Msk,
        NullFlavor::Asku,
        NullFlavor::Nask,
        NullFlavor::Ni,
        NullFlavor::Unk,
        NullFlavor::Pinf,
        NullFlavor::Ninf,
        NullFlavor::Na,
    ];

    /// Wire code as it appears in the `nullFlavor` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            NullFlavor::Msk => "MSK",
            NullFlavor::Asku => "ASKU",
            NullFlavor::Nask => "NASK",
            NullFlavor::Ni => "NI",
            NullFlavor::Unk => "UNK",
            NullFlavor::Pinf => "PINF",
            NullFlavor::Ninf => "NINF",
            NullFlavor::Na => "NA",
        }
    }
}

impl fmt::Display for NullFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NullFlavor {
    type Err = String;

    /// Codes are matched exactly; HL7 null flavors are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NullFlavor::ALL
            .into_iter()
            .find(|flavor| flavor.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown null flavor: {s}"))
    }
}

/// A value that may be replaced by a null flavor.
///
/// The two states are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullable<T> {
    Value(T),
    NullFlavor(NullFlavor),
}

impl<T> Nullable<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Nullable::Value(value) => Some(value),
            Nullable::NullFlavor(_) => None,
        }
    }

    pub fn null_flavor(&self) -> Option<NullFlavor> {
        match self {
            Nullable::Value(_) => None,
            Nullable::NullFlavor(flavor) => Some(*flavor),
        }
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Nullable::Value(value)
    }
}

/// Flavor subsets used by field declarations.
pub mod flavors {
    use super::NullFlavor::{self, Asku, Msk, Na, Nask, Ni, Ninf, Pinf, Unk};

    pub const NONE: &[NullFlavor] = &[];
    pub const MSK: &[NullFlavor] = &[Msk];
    pub const UNK: &[NullFlavor] = &[Unk];
    pub const NI: &[NullFlavor] = &[Ni];
    pub const ASKU_NASK: &[NullFlavor] = &[Asku, Nask];
    pub const MSK_ASKU_NASK: &[NullFlavor] = &[Msk, Asku, Nask];
    pub const MSK_ASKU_NASK_UNK: &[NullFlavor] = &[Msk, Asku, Nask, Unk];
    pub const ASKU_NASK_UNK: &[NullFlavor] = &[Asku, Nask, Unk];
    pub const UNK_NA: &[NullFlavor] = &[Unk, Na];
    pub const INFINITY: &[NullFlavor] = &[Ninf, Pinf];
}
