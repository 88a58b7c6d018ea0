//! Flat records and the fixed field-key schema.
//!
//! A [`Record`] is the storage representation of one user: a mapping of
//! uppercase field keys to strings. A missing key and an empty string both mean
//! "no value". The key set in [`FieldKey`] is the contract any storage engine has
//! to honor to stand in for the in-memory table.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{FALSE, TRUE, params};

/// How a field's string value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Opaque text; empty means unset.
    Text,
    /// Boolean stored as exactly `"0"` or `"1"`.
    Flag,
    /// Non-negative decimal integer; empty reads as zero.
    Counter,
    /// RFC3339 timestamp; empty means unset.
    Timestamp,
}

/// The fixed set of columns in the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Id,
    UserName,
    Email,
    EmailConfirmed,
    PasswordHash,
    PhoneNumber,
    PhoneConfirmed,
    SecurityStamp,
    ConcurrencyStamp,
    AccessFailedCount,
    LockoutEnabled,
    LockoutEnd,
    TwoFactorEnabled,
}

impl FieldKey {
    /// Every column, in schema order.
    pub const ALL: [FieldKey; 13] = [
        FieldKey::Id,
        FieldKey::UserName,
        FieldKey::Email,
        FieldKey::EmailConfirmed,
        FieldKey::PasswordHash,
        FieldKey::PhoneNumber,
        FieldKey::PhoneConfirmed,
        FieldKey::SecurityStamp,
        FieldKey::ConcurrencyStamp,
        FieldKey::AccessFailedCount,
        FieldKey::LockoutEnabled,
        FieldKey::LockoutEnd,
        FieldKey::TwoFactorEnabled,
    ];

    /// The uppercase key used in stored records.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKey::Id => "ID",
            FieldKey::UserName => "USERNAME",
            FieldKey::Email => "EMAIL",
            FieldKey::EmailConfirmed => "EMAIL_CONFIRMED",
            FieldKey::PasswordHash => "PASSWORD_HASH",
            FieldKey::PhoneNumber => "PHONE_NUMBER",
            FieldKey::PhoneConfirmed => "PHONE_CONFIRMED",
            FieldKey::SecurityStamp => "SECURITY_STAMP",
            FieldKey::ConcurrencyStamp => "CONCURRENCY_STAMP",
            FieldKey::AccessFailedCount => "ACCESS_FAILED_COUNT",
            FieldKey::LockoutEnabled => "LOCKOUT_ENABLED",
            FieldKey::LockoutEnd => "LOCKOUT_END",
            FieldKey::TwoFactorEnabled => "TWO_FACTOR_ENABLED",
        }
    }

    /// The procedure parameter that carries this field in `insertUser`/`updateUser`.
    pub const fn param(self) -> &'static str {
        match self {
            FieldKey::Id => params::ID,
            FieldKey::UserName => params::USERNAME,
            FieldKey::Email => params::EMAIL,
            FieldKey::EmailConfirmed => params::EMAIL_CONFIRMED,
            FieldKey::PasswordHash => params::PASSWORD_HASH,
            FieldKey::PhoneNumber => params::PHONE_NUMBER,
            FieldKey::PhoneConfirmed => params::PHONE_CONFIRMED,
            FieldKey::SecurityStamp => params::SECURITY_STAMP,
            FieldKey::ConcurrencyStamp => params::CONCURRENCY_STAMP,
            FieldKey::AccessFailedCount => params::ACCESS_FAILED_COUNT,
            FieldKey::LockoutEnabled => params::LOCKOUT_ENABLED,
            FieldKey::LockoutEnd => params::LOCKOUT_END,
            FieldKey::TwoFactorEnabled => params::TWO_FACTOR_ENABLED,
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            FieldKey::EmailConfirmed
            | FieldKey::PhoneConfirmed
            | FieldKey::LockoutEnabled
            | FieldKey::TwoFactorEnabled => FieldKind::Flag,
            FieldKey::AccessFailedCount => FieldKind::Counter,
            FieldKey::LockoutEnd => FieldKind::Timestamp,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored form of a boolean: exactly `"1"` or `"0"`.
pub fn encode_flag(value: bool) -> &'static str {
    if value { TRUE } else { FALSE }
}

/// Stored form of a timestamp: RFC3339 in UTC with a `Z` suffix.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Strict RFC3339 parse of a stored timestamp, normalized to UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// One flat row of the user table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw stored string for a field, empty strings included.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.0.get(key.as_str()).map(String::as_str)
    }

    /// Returns the stored string for a field, treating empty as absent.
    pub fn value(&self, key: FieldKey) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Returns the stored string under an arbitrary key.
    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.0.insert(key.as_str().to_string(), value.into());
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, key: FieldKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// The row id, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.value(FieldKey::Id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(FieldKey, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (FieldKey, String)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.set(key, value);
        }
        record
    }
}
