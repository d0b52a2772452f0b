// Property bags: the loosely-typed values resources are described with.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a property in a property bag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyKey(String);

impl PropertyKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PropertyKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for PropertyKey {
	fn from(key: &str) -> Self {
		Self(key.to_string())
	}
}

impl Borrow<str> for PropertyKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

/// A single value in a resource property bag.
///
/// `Computed` marks a value whose concrete contents are not known until the
/// deployment actually executes; it can only appear during preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyValue {
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	Array(Vec<PropertyValue>),
	Object(PropertyMap),
	Computed,
}

impl PropertyValue {
	pub fn is_computed(&self) -> bool {
		matches!(self, PropertyValue::Computed)
	}

	pub fn is_string(&self) -> bool {
		matches!(self, PropertyValue::String(_))
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			PropertyValue::String(s) => Some(s),
			_ => None,
		}
	}
}

impl From<&str> for PropertyValue {
	fn from(s: &str) -> Self {
		PropertyValue::String(s.to_string())
	}
}

/// A resource's property bag.
pub type PropertyMap = BTreeMap<PropertyKey, PropertyValue>;
