//! Constants used throughout the Userstore library.
//!
//! This module provides central definitions for procedure parameter names and
//! the encodings used in flat records. Field keys live on
//! [`FieldKey`](crate::store::FieldKey).

/// Stored encoding of `true` for boolean fields.
pub const TRUE: &str = "1";

/// Stored encoding of `false` for boolean fields.
pub const FALSE: &str = "0";

/// Parameter names accepted by the procedures.
pub mod params {
    pub const ID: &str = "id";
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const EMAIL_CONFIRMED: &str = "emailConfirmed";
    pub const PASSWORD_HASH: &str = "passwordHash";
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const PHONE_CONFIRMED: &str = "phoneConfirmed";
    pub const SECURITY_STAMP: &str = "securityStamp";
    pub const CONCURRENCY_STAMP: &str = "concurrencyStamp";
    pub const ACCESS_FAILED_COUNT: &str = "accessFailedCount";
    pub const LOCKOUT_ENABLED: &str = "lockoutEnabled";
    pub const LOCKOUT_END: &str = "lockoutEnd";
    pub const TWO_FACTOR_ENABLED: &str = "twoFactorEnabled";

    /// Flag argument of `setLockoutEnabled`.
    pub const ENABLED: &str = "enabled";

    /// Stamp argument of `setSecurityStamp`.
    pub const STAMP: &str = "stamp";
}
