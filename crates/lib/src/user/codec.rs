//! Conversion between [`User`] and the flat stored form.
//!
//! [`encode`] produces the parameter set `insertUser` and `updateUser` take;
//! [`decode`] rebuilds a user from a row those procedures return.
//!
//! Decoding is lenient where the stored form is ambiguous by design (a flag is
//! `true` only for exactly `"1"`, empty text is absent) and strict where a value
//! cannot be represented at all: a missing id, a non-numeric counter or an
//! unparsable timestamp is a [`UserError::CorruptRecord`].

use tracing::error;

use super::{User, UserError, new_stamp, normalize};
use crate::Result;
use crate::constants::TRUE;
use crate::procedure::Parameters;
use crate::store::{FieldKey, Record, parse_timestamp};

/// Encodes a user as the full parameter set of `insertUser`/`updateUser`.
///
/// Absent optional text is sent as `""`. A missing security or concurrency stamp
/// is replaced with a fresh one, so every write carries both.
pub fn encode(user: &User) -> Parameters {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let stamp = |value: &Option<String>| {
        value
            .as_ref()
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(new_stamp)
    };

    Parameters::new()
        .with(FieldKey::Id.param(), &user.id)
        .with(FieldKey::UserName.param(), text(&user.user_name))
        .with(FieldKey::Email.param(), text(&user.email))
        .with(FieldKey::EmailConfirmed.param(), user.email_confirmed)
        .with(FieldKey::PasswordHash.param(), text(&user.password_hash))
        .with(FieldKey::PhoneNumber.param(), text(&user.phone_number))
        .with(FieldKey::PhoneConfirmed.param(), user.phone_number_confirmed)
        .with(FieldKey::SecurityStamp.param(), stamp(&user.security_stamp))
        .with(FieldKey::ConcurrencyStamp.param(), stamp(&user.concurrency_stamp))
        .with(FieldKey::AccessFailedCount.param(), user.access_failed_count)
        .with(FieldKey::LockoutEnabled.param(), user.lockout_enabled)
        .with(FieldKey::LockoutEnd.param(), user.lockout_end)
        .with(FieldKey::TwoFactorEnabled.param(), user.two_factor_enabled)
}

/// Rebuilds a user from a stored record.
///
/// The normalized name and email are recomputed from the stored values.
///
/// # Errors
/// `UserError::CorruptRecord` if the record has no id, or holds a counter or
/// timestamp that cannot be parsed.
pub fn decode(record: &Record) -> Result<User> {
    let id = record
        .id()
        .ok_or_else(|| corrupt(record, FieldKey::Id, record.get(FieldKey::Id).unwrap_or("")))?;

    let text = |key: FieldKey| record.value(key).map(str::to_string);
    let flag = |key: FieldKey| record.get(key) == Some(TRUE);

    let access_failed_count = match record.value(FieldKey::AccessFailedCount) {
        None => 0,
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| corrupt(record, FieldKey::AccessFailedCount, raw))?,
    };
    let lockout_end = match record.value(FieldKey::LockoutEnd) {
        None => None,
        Some(raw) => {
            Some(parse_timestamp(raw).ok_or_else(|| corrupt(record, FieldKey::LockoutEnd, raw))?)
        }
    };

    let user_name = text(FieldKey::UserName);
    let email = text(FieldKey::Email);
    Ok(User {
        id: id.to_string(),
        normalized_user_name: user_name.as_deref().map(normalize),
        user_name,
        normalized_email: email.as_deref().map(normalize),
        email,
        email_confirmed: flag(FieldKey::EmailConfirmed),
        password_hash: text(FieldKey::PasswordHash),
        phone_number: text(FieldKey::PhoneNumber),
        phone_number_confirmed: flag(FieldKey::PhoneConfirmed),
        security_stamp: text(FieldKey::SecurityStamp),
        concurrency_stamp: text(FieldKey::ConcurrencyStamp),
        access_failed_count,
        lockout_enabled: flag(FieldKey::LockoutEnabled),
        lockout_end,
        two_factor_enabled: flag(FieldKey::TwoFactorEnabled),
    })
}

fn corrupt(record: &Record, field: FieldKey, value: &str) -> crate::Error {
    error!(id = record.id(), %field, value, "Stored user record is corrupt");
    UserError::CorruptRecord {
        id: record.id().map(str::to_string),
        field: field.as_str().to_string(),
        value: value.to_string(),
    }
    .into()
}
