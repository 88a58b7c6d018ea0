//! Standard procedure bodies.
//!
//! Every handler validates its parameters before touching the table, so a
//! rejected call never leaves a partial write behind.

use tracing::trace;

use super::{Handler, Operation, ParamReader, Parameters, ProcedureError};
use crate::Result;
use crate::constants::params;
use crate::store::{FieldKey, FieldKind, Record, RowRef, StoreError, Table};

/// Returns the standard handler for an operation.
pub(super) fn standard(op: Operation) -> Handler {
    match op {
        Operation::FindById => Handler::query(find_by_id),
        Operation::FindByUsername => Handler::query(find_by_username),
        Operation::InsertUser => Handler::mutation(insert_user),
        Operation::DeleteUser => Handler::mutation(delete_user),
        Operation::UpdateUsername => Handler::mutation(update_username),
        Operation::UpdateUser => Handler::mutation(update_user),
        Operation::UpdatePassword => Handler::mutation(update_password),
        Operation::IncrementAccessFailedCount => Handler::mutation(increment_access_failed_count),
        Operation::ResetAccessFailedCount => Handler::mutation(reset_access_failed_count),
        Operation::SetLockoutEnabled => Handler::mutation(set_lockout_enabled),
        Operation::SetLockoutEnd => Handler::mutation(set_lockout_end),
        Operation::SetSecurityStamp => Handler::mutation(set_security_stamp),
    }
}

fn find_by_id(table: &Table, params: &Parameters) -> Result<Vec<Record>> {
    let id = ParamReader::new(Operation::FindById, params).required_text(params::ID)?;
    Ok(table.find_by(|r| r.get(FieldKey::Id) == Some(id.as_str())))
}

/// Matches rows whose upper-cased user name equals the argument exactly.
///
/// The argument is expected to be normalized already.
fn find_by_username(table: &Table, params: &Parameters) -> Result<Vec<Record>> {
    let name =
        ParamReader::new(Operation::FindByUsername, params).required_text(params::USERNAME)?;
    Ok(table.find_by(|r| {
        r.get(FieldKey::UserName)
            .is_some_and(|stored| stored.to_uppercase() == name)
    }))
}

fn insert_user(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let reader = ParamReader::new(Operation::InsertUser, params);
    let mut record = Record::new();
    for key in FieldKey::ALL {
        let value = if key == FieldKey::Id {
            reader.optional_field(key.param(), FieldKind::Text)?
        } else {
            reader.required_field(key.param(), key.kind())?
        };
        record.set(key, value);
    }

    let inserted = table.insert(record)?;
    Ok(vec![inserted.clone()])
}

fn delete_user(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let id = ParamReader::new(Operation::DeleteUser, params).required_text(params::ID)?;
    match table.delete_by(|r| r.get(FieldKey::Id) == Some(id.as_str())) {
        Some(_) => Ok(Vec::new()),
        None => Err(not_found(Operation::DeleteUser, FieldKey::Id, &id)),
    }
}

fn update_username(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let reader = ParamReader::new(Operation::UpdateUsername, params);
    let id = reader.required_text(params::ID)?;
    let name = reader.required_text(params::USERNAME)?;
    update_by_id(
        table,
        Operation::UpdateUsername,
        &id,
        [(FieldKey::UserName, name)],
    )
}

/// Overwrites every field except the id.
fn update_user(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let reader = ParamReader::new(Operation::UpdateUser, params);
    let id = reader.required_text(params::ID)?;
    let mut fields = Vec::with_capacity(FieldKey::ALL.len() - 1);
    for key in FieldKey::ALL.into_iter().filter(|key| *key != FieldKey::Id) {
        fields.push((key, reader.required_field(key.param(), key.kind())?));
    }
    update_by_id(table, Operation::UpdateUser, &id, fields)
}

/// Targets the row by its stored user name, compared exactly.
fn update_password(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let reader = ParamReader::new(Operation::UpdatePassword, params);
    let name = reader.required_text(params::USERNAME)?;
    let hash = reader.required_text(params::PASSWORD_HASH)?;

    let row = table
        .position(|r| r.get(FieldKey::UserName) == Some(name.as_str()))
        .ok_or_else(|| not_found(Operation::UpdatePassword, FieldKey::UserName, &name))?;
    let updated = table.update_fields(row, [(FieldKey::PasswordHash, hash)])?;
    Ok(vec![updated.clone()])
}

fn increment_access_failed_count(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let op = Operation::IncrementAccessFailedCount;
    let id = ParamReader::new(op, params).required_text(params::ID)?;
    let row = locate_by_id(table, op, &id)?;

    let current = match table.row(row).and_then(|r| r.value(FieldKey::AccessFailedCount)) {
        None => 0,
        Some(raw) => raw.parse::<u32>().map_err(|_| corrupt_counter(raw))?,
    };
    let next = current
        .checked_add(1)
        .ok_or_else(|| corrupt_counter(&current.to_string()))?;
    trace!(id = %id, count = next, "Incrementing access failed count");

    let updated = table.update_fields(row, [(FieldKey::AccessFailedCount, next.to_string())])?;
    Ok(vec![updated.clone()])
}

fn reset_access_failed_count(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let op = Operation::ResetAccessFailedCount;
    let id = ParamReader::new(op, params).required_text(params::ID)?;
    update_by_id(table, op, &id, [(FieldKey::AccessFailedCount, "0".to_string())])
}

fn set_lockout_enabled(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let op = Operation::SetLockoutEnabled;
    let reader = ParamReader::new(op, params);
    let id = reader.required_text(params::ID)?;
    let enabled = reader.required_field(params::ENABLED, FieldKind::Flag)?;
    update_by_id(table, op, &id, [(FieldKey::LockoutEnabled, enabled)])
}

/// An absent or empty `lockoutEnd` clears the field.
fn set_lockout_end(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let op = Operation::SetLockoutEnd;
    let reader = ParamReader::new(op, params);
    let id = reader.required_text(params::ID)?;
    let end = reader.optional_field(params::LOCKOUT_END, FieldKind::Timestamp)?;
    update_by_id(table, op, &id, [(FieldKey::LockoutEnd, end)])
}

/// An absent or empty `stamp` clears the field.
fn set_security_stamp(table: &mut Table, params: &Parameters) -> Result<Vec<Record>> {
    let op = Operation::SetSecurityStamp;
    let reader = ParamReader::new(op, params);
    let id = reader.required_text(params::ID)?;
    let stamp = reader.optional_field(params::STAMP, FieldKind::Text)?;
    update_by_id(table, op, &id, [(FieldKey::SecurityStamp, stamp)])
}

fn locate_by_id(table: &Table, op: Operation, id: &str) -> Result<RowRef> {
    table
        .position(|r| r.get(FieldKey::Id) == Some(id))
        .ok_or_else(|| not_found(op, FieldKey::Id, id))
}

fn update_by_id(
    table: &mut Table,
    op: Operation,
    id: &str,
    fields: impl IntoIterator<Item = (FieldKey, String)>,
) -> Result<Vec<Record>> {
    let row = locate_by_id(table, op, id)?;
    let updated = table.update_fields(row, fields)?;
    Ok(vec![updated.clone()])
}

fn not_found(op: Operation, field: FieldKey, value: &str) -> crate::Error {
    ProcedureError::NotFound {
        operation: op.as_str().to_string(),
        field: field.as_str().to_string(),
        value: value.to_string(),
    }
    .into()
}

fn corrupt_counter(value: &str) -> crate::Error {
    StoreError::CorruptValue {
        field: FieldKey::AccessFailedCount.as_str().to_string(),
        value: value.to_string(),
    }
    .into()
}
