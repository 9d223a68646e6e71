//! Property records as received from clients and as returned after filtering.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::concat_address;

/// Property type selected by the filter.
pub const HTV_TYPE: &str = "htv";

/// Workflow state selected by the filter.
pub const COMPLETED_WORKFLOW: &str = "completed";

/// A property record from the request payload.
///
/// Only `type`, `workflow` and `address` are recognised. Any other field
/// (`shortId`, `reference`, `status`, ...) is accepted and dropped.
///
/// Deserialization never fails: a record is an opaque JSON value until the
/// filter has looked at it. A `type` or `workflow` that is not a string is
/// read as absent, so the record cannot match. An `address` that is not an
/// object is read as absent too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct PropertyRecord {
    /// Property type, e.g. `"htv"`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Workflow state, e.g. `"completed"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,

    /// Postal address. Absent and `null` are both treated as an empty address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl PropertyRecord {
    /// Build a record with the given type and workflow and no address.
    pub fn new(kind: impl Into<String>, workflow: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            workflow: Some(workflow.into()),
            address: None,
        }
    }

    /// Attach an address to the record.
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }
}

impl From<Value> for PropertyRecord {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        let text = |value: Option<Value>| match value {
            Some(Value::String(text)) => Some(text),
            _ => None,
        };

        Self {
            kind: text(fields.remove("type")),
            workflow: text(fields.remove("workflow")),
            address: match fields.remove("address") {
                Some(address @ Value::Object(_)) => Some(Address::from(address)),
                _ => None,
            },
        }
    }
}

/// Postal address attached to a property record.
///
/// Every field is optional. Strings are kept as they are and numbers are
/// rendered as text, so a numeric postcode such as `2060` becomes `"2060"`.
/// `true` becomes `"true"`. Any other value is read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
}

impl From<Value> for Address {
    fn from(value: Value) -> Self {
        let Value::Object(fields) = value else {
            return Self::default();
        };
        let field = |key: &str| fields.get(key).and_then(text_or_number);

        Self {
            unit_number: field("unitNumber"),
            building_number: field("buildingNumber"),
            street: field("street"),
            suburb: field("suburb"),
            state: field("state"),
            postcode: field("postcode"),
        }
    }
}

fn text_or_number(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Record returned to the client for every property that survives the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredProperty {
    pub concataddress: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub workflow: String,
}

impl From<&PropertyRecord> for FilteredProperty {
    fn from(record: &PropertyRecord) -> Self {
        let address = record.address.clone().unwrap_or_default();
        Self {
            concataddress: concat_address(&address),
            kind: record.kind.clone().unwrap_or_default(),
            workflow: record.workflow.clone().unwrap_or_default(),
        }
    }
}
