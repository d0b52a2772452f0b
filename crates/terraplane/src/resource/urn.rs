// URNs and IDs: the two halves of a resource's identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tokens::TypeToken;

/// Uniform resource name identifying a resource within a deployment.
///
/// URNs have the shape `urn:pulumi:<stack>::<project>::<type>::<name>` and
/// are treated as opaque strings except for the embedded type token, which
/// is what identifies provider resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
	pub fn new(urn: impl Into<String>) -> Self {
		Self(urn.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The resource type token embedded in this URN.
	///
	/// The type portion of a child resource's URN is qualified with its
	/// ancestry, separated by `$`; only the final segment is the resource's
	/// own type.
	pub fn resource_type(&self) -> TypeToken {
		let qualified = self.0.split("::").nth(2).unwrap_or("");
		let own = qualified.rsplit('$').next().unwrap_or(qualified);
		TypeToken::new(own)
	}
}

impl fmt::Display for Urn {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Urn {
	fn from(urn: &str) -> Self {
		Self(urn.to_string())
	}
}

/// Opaque identifier assigned to a live resource instance.
///
/// The empty value is reserved as the unknown-ID sentinel: it keys a
/// provider that has been checked but not yet created or updated, and is
/// never a valid assigned ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The sentinel ID of a provider instance that has not been assigned a
	/// concrete ID yet.
	pub fn unknown() -> Self {
		Self(String::new())
	}

	pub fn is_unknown(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Id {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resource_type_is_third_component() {
		let urn = Urn::new("urn:pulumi:stack::proj::pulumi:providers:aws::default");
		assert_eq!(urn.resource_type().as_str(), "pulumi:providers:aws");
	}

	#[test]
	fn test_resource_type_takes_last_parent_segment() {
		let urn = Urn::new("urn:pulumi:stack::proj::aws:ec2:Vpc$aws:ec2:Subnet::main");
		assert_eq!(urn.resource_type().as_str(), "aws:ec2:Subnet");
	}

	#[test]
	fn test_unknown_id_is_empty() {
		assert!(Id::unknown().is_unknown());
		assert!(!Id::new("v0").is_unknown());
	}
}
