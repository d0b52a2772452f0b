// Namespaced configuration keys.
//
// Provider configuration is addressed by `<namespace>:<name>` keys, where
// the namespace is the provider package the value belongs to.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A configuration key, rendered as `<namespace>:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
	namespace: String,
	name: String,
}

/// Error parsing a configuration key from its string form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
	#[error("config key '{0}' must have the form '<namespace>:<name>'")]
	MissingNamespace(String),
	#[error("config key '{0}' may contain at most one ':' delimiter")]
	TooManySegments(String),
}

impl Key {
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			name: name.into(),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.namespace, self.name)
	}
}

impl FromStr for Key {
	type Err = KeyParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.split(':');
		match (parts.next(), parts.next(), parts.next()) {
			(Some(namespace), Some(name), None) if !namespace.is_empty() => {
				Ok(Self::new(namespace, name))
			},
			(_, None, _) | (Some(""), ..) => Err(KeyParseError::MissingNamespace(s.to_string())),
			_ => Err(KeyParseError::TooManySegments(s.to_string())),
		}
	}
}

/// Provider configuration: string values addressed by namespaced keys.
pub type ConfigMap = BTreeMap<Key, String>;
