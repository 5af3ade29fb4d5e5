//! Per-section reconciliation rules
//!
//! A policy combines a collaborator's current section with an incoming one
//! and produces the section handed to the collaborator.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{BackupError, BackupResult};
use crate::snapshot::json_type_name;

/// How an incoming section is reconciled with live state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePolicy {
    /// Incoming replaces current verbatim
    WholeReplace,

    /// Only the named fields are copied from incoming into current;
    /// every other current field is left alone
    FieldWhitelist(BTreeSet<String>),

    /// Union of both maps keyed by stable id, incoming wins on conflicts
    KeyedMap,
}

impl MergePolicy {
    /// Build a whitelist policy from field names
    pub fn field_whitelist<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FieldWhitelist(fields.into_iter().map(Into::into).collect())
    }

    /// Short name for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WholeReplace => "whole-replace",
            Self::FieldWhitelist(_) => "field-whitelist",
            Self::KeyedMap => "keyed-map",
        }
    }

    /// Whether a whitelist policy would copy this field
    pub fn allows_field(&self, field: &str) -> bool {
        match self {
            Self::FieldWhitelist(fields) => fields.contains(field),
            Self::WholeReplace | Self::KeyedMap => true,
        }
    }

    /// Reconcile `incoming` against `current`
    ///
    /// A `null` current section is treated as empty.
    pub fn merge(&self, current: &Value, incoming: &Value) -> BackupResult<Value> {
        match self {
            Self::WholeReplace => Ok(incoming.clone()),
            Self::FieldWhitelist(fields) => {
                let mut merged = object_or_empty(current, "current")?;
                let incoming = expect_object(incoming, "incoming")?;

                for (field, value) in incoming {
                    if fields.contains(field) {
                        merged.insert(field.clone(), value.clone());
                    } else {
                        tracing::debug!(field = %field, "Ignoring field outside the whitelist");
                    }
                }

                Ok(Value::Object(merged))
            }
            Self::KeyedMap => {
                let mut merged = object_or_empty(current, "current")?;
                let incoming = expect_object(incoming, "incoming")?;

                for (key, value) in incoming {
                    merged.insert(key.clone(), value.clone());
                }

                Ok(Value::Object(merged))
            }
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldWhitelist(fields) => write!(f, "{} ({} fields)", self.kind(), fields.len()),
            _ => f.write_str(self.kind()),
        }
    }
}

fn expect_object<'a>(value: &'a Value, side: &str) -> BackupResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        BackupError::Validation(format!(
            "{} section must be an object, found {}",
            side,
            json_type_name(value)
        ))
    })
}

fn object_or_empty(value: &Value, side: &str) -> BackupResult<Map<String, Value>> {
    if value.is_null() {
        return Ok(Map::new());
    }
    expect_object(value, side).cloned()
}
