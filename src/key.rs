//! Destination key derivation from DynamoDB key attributes.

use anyhow::bail;
use serde_json::Value;

/// Policy for deriving the destination key from a record's decoded key
/// attributes.
///
/// Derivation is deterministic: identical key attributes always produce the
/// identical key, regardless of event type. That is what keeps upserts and
/// deletes idempotent across stream redeliveries.
#[derive(Debug, Clone)]
pub enum KeyBuilder {
    /// Use the first attribute present from the list.
    FirstOf(Vec<String>),
    /// Join all listed attributes with a separator, e.g. `pk#sk` for tables
    /// with a partition and sort key.
    Composite {
        fields: Vec<String>,
        separator: char,
    },
}

impl Default for KeyBuilder {
    /// `pk`, falling back to `id`, falling back to `ID`.
    ///
    /// Adjust this to the source table's actual schema; the default only
    /// covers single-attribute primary keys with common names.
    fn default() -> Self {
        KeyBuilder::FirstOf(vec!["pk".into(), "id".into(), "ID".into()])
    }
}

impl KeyBuilder {
    /// Composite-key policy joining `fields` in order.
    pub fn composite(fields: Vec<String>, separator: char) -> Self {
        KeyBuilder::Composite { fields, separator }
    }

    /// Derive the destination key from decoded key attributes.
    ///
    /// Fails when no configured attribute is present or an attribute is not
    /// a scalar; the caller treats that as a per-record error.
    pub fn build(&self, attributes: &Value) -> anyhow::Result<String> {
        match self {
            KeyBuilder::FirstOf(candidates) => {
                for name in candidates {
                    if let Some(value) = attributes.get(name) {
                        return scalar_to_key(name, value);
                    }
                }
                bail!("no key attribute found (tried {})", candidates.join(", "));
            }
            KeyBuilder::Composite { fields, separator } => {
                let mut parts = Vec::with_capacity(fields.len());
                for name in fields {
                    match attributes.get(name) {
                        Some(value) => parts.push(scalar_to_key(name, value)?),
                        None => bail!("composite key attribute '{name}' is missing"),
                    }
                }
                Ok(parts.join(&separator.to_string()))
            }
        }
    }
}

fn scalar_to_key(name: &str, value: &Value) -> anyhow::Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => bail!("key attribute '{name}' is not a scalar: {other}"),
    }
}
