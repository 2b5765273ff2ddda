//! Paste settings accepted by the API.
//!
//! # Design
//! Both types serialize to the strings the API and the saved state file
//! use, so an invalid value cannot be stored in a `Client` or restored from
//! disk.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How long a paste stays online (`api_paste_expire_date`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Expiration {
    #[serde(rename = "N")]
    Never,
    #[default]
    #[serde(rename = "10M")]
    TenMinutes,
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "2W")]
    TwoWeeks,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl Expiration {
    pub const ALL: [Expiration; 9] = [
        Expiration::Never,
        Expiration::TenMinutes,
        Expiration::OneHour,
        Expiration::OneDay,
        Expiration::OneWeek,
        Expiration::TwoWeeks,
        Expiration::OneMonth,
        Expiration::SixMonths,
        Expiration::OneYear,
    ];

    /// Wire code, e.g. `10M`.
    pub fn code(self) -> &'static str {
        match self {
            Expiration::Never => "N",
            Expiration::TenMinutes => "10M",
            Expiration::OneHour => "1H",
            Expiration::OneDay => "1D",
            Expiration::OneWeek => "1W",
            Expiration::TwoWeeks => "2W",
            Expiration::OneMonth => "1M",
            Expiration::SixMonths => "6M",
            Expiration::OneYear => "1Y",
        }
    }

    /// Display name. Plurals are regular (`6 Months`, not `6 Month`); labels
    /// only appear in messages, never on the wire.
    pub fn label(self) -> &'static str {
        match self {
            Expiration::Never => "Never",
            Expiration::TenMinutes => "10 Minutes",
            Expiration::OneHour => "1 Hour",
            Expiration::OneDay => "1 Day",
            Expiration::OneWeek => "1 Week",
            Expiration::TwoWeeks => "2 Weeks",
            Expiration::OneMonth => "1 Month",
            Expiration::SixMonths => "6 Months",
            Expiration::OneYear => "1 Year",
        }
    }

    /// Every accepted code with its label, for error messages and help text.
    pub fn valid_codes() -> String {
        Self::ALL
            .iter()
            .map(|e| format!("{} ({})", e.code(), e.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Expiration {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.code() == s)
            .ok_or_else(|| ConfigError::InvalidExpiration {
                code: s.to_string(),
                valid: Self::valid_codes(),
            })
    }
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Who can see a paste (`api_paste_private`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Unlisted,
    Private,
}

impl Visibility {
    /// Wire code: `0` public, `1` unlisted, `2` private.
    pub fn code(self) -> &'static str {
        match self {
            Visibility::Public => "0",
            Visibility::Unlisted => "1",
            Visibility::Private => "2",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Unlisted => "unlisted",
            Visibility::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = ConfigError;

    /// Accepts the names (any case) or the wire codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Visibility::Public, Visibility::Unlisted, Visibility::Private]
            .into_iter()
            .find(|v| v.code() == s || v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::InvalidVisibility(s.to_string()))
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
