// Token newtypes shared across the resource model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a provider package, e.g. `aws`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Package(String);

impl Package {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Package {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Package {
	fn from(name: &str) -> Self {
		Self(name.to_string())
	}
}

/// A resource type token of the form `<package>:<module>:<name>`.
///
/// Missing trailing components decompose to empty strings rather than
/// errors; callers that require a particular shape validate it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeToken(String);

impl TypeToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The package component (everything before the first `:`).
	pub fn package(&self) -> &str {
		self.segments().0
	}

	/// The module component (between the first and second `:`).
	pub fn module(&self) -> &str {
		self.segments().1
	}

	/// The name component (everything after the second `:`).
	pub fn name(&self) -> &str {
		self.segments().2
	}

	fn segments(&self) -> (&str, &str, &str) {
		let mut parts = self.0.splitn(3, ':');
		let package = parts.next().unwrap_or("");
		let module = parts.next().unwrap_or("");
		let name = parts.next().unwrap_or("");
		(package, module, name)
	}
}

impl fmt::Display for TypeToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TypeToken {
	fn from(token: &str) -> Self {
		Self(token.to_string())
	}
}

/// A module member token, e.g. a provider function like `aws:index:getAmi`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleMember(String);

impl ModuleMember {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ModuleMember {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
