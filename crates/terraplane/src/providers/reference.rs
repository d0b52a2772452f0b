// Provider references and provider-URN validation.
//
// A reference is the (URN, ID) pair identifying one provider instance; its
// canonical string form `<URN>::<ID>` appears in checkpoint files and
// diagnostics. URNs themselves may contain `::`, so parsing splits at the
// last occurrence of the delimiter.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::resource::{Id, Package, TypeToken, Urn};

/// Package component required of provider type tokens.
const PROVIDER_PACKAGE: &str = "pulumi";
/// Module component required of provider type tokens.
const PROVIDER_MODULE: &str = "providers";
/// Delimiter between the URN and ID portions of a reference string.
const ID_DELIMITER: &str = "::";

/// Reasons a URN fails provider-URN validation.
///
/// The three cases arise from different kinds of state corruption and are
/// reported distinctly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrnError {
	#[error("invalid package in type: expected 'pulumi', got '{0}'")]
	WrongPackage(String),
	#[error("invalid module in type: expected 'providers', got '{0}'")]
	WrongModule(String),
	#[error("provider URNs must specify a type name")]
	MissingName,
}

/// Error parsing a reference from its string form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseReferenceError {
	#[error("expected '::' in provider reference '{0}'")]
	MissingDelimiter(String),
	#[error(transparent)]
	InvalidUrn(#[from] UrnError),
}

/// Returns true if the type token names a provider resource, i.e. has the
/// form `pulumi:providers:<pkg>` with a nonempty package.
pub fn is_provider_type(typ: &TypeToken) -> bool {
	typ.package() == PROVIDER_PACKAGE && typ.module() == PROVIDER_MODULE && !typ.name().is_empty()
}

/// Validates that `urn` names a provider resource.
pub fn validate_provider_urn(urn: &Urn) -> Result<(), UrnError> {
	let typ = urn.resource_type();
	if typ.package() != PROVIDER_PACKAGE {
		return Err(UrnError::WrongPackage(typ.package().to_string()));
	}
	if typ.module() != PROVIDER_MODULE {
		return Err(UrnError::WrongModule(typ.module().to_string()));
	}
	if typ.name().is_empty() {
		return Err(UrnError::MissingName);
	}
	Ok(())
}

/// Identifies a particular provider instance by URN and ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
	urn: Urn,
	id: Id,
}

impl Reference {
	/// Creates a reference, validating that `urn` names a provider.
	pub fn new(urn: Urn, id: Id) -> Result<Self, UrnError> {
		validate_provider_urn(&urn)?;
		Ok(Self { urn, id })
	}

	pub fn urn(&self) -> &Urn {
		&self.urn
	}

	pub fn id(&self) -> &Id {
		&self.id
	}

	/// The package implemented by the provider this reference names.
	pub fn package(&self) -> Package {
		Package::new(self.urn.resource_type().name())
	}
}

impl fmt::Display for Reference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}{}", self.urn, ID_DELIMITER, self.id)
	}
}

impl FromStr for Reference {
	type Err = ParseReferenceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let sep = s
			.rfind(ID_DELIMITER)
			.ok_or_else(|| ParseReferenceError::MissingDelimiter(s.to_string()))?;
		let urn = Urn::new(&s[..sep]);
		validate_provider_urn(&urn)?;
		let id = Id::new(&s[sep + ID_DELIMITER.len()..]);
		Ok(Self { urn, id })
	}
}

impl Serialize for Reference {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Reference {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(D::Error::custom)
	}
}
