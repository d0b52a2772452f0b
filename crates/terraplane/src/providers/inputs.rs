// Extraction of provider inputs from resource property bags.
//
// A provider resource is configured through its property bag: the reserved
// `version` property selects the plugin version, and every other string
// property becomes a namespaced config value. Parsing accumulates
// validation failures instead of short-circuiting, so the user sees all of
// them at once.

use semver::Version;
use thiserror::Error;

use crate::config::{ConfigMap, Key};
use crate::plugin::CheckFailure;
use crate::resource::{Package, PropertyMap, PropertyValue};

/// Reserved property naming the plugin version to load. Never forwarded as
/// provider config.
const VERSION_PROPERTY: &str = "version";

/// Inputs needed to load and configure a provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderInputs {
	/// Requested plugin version; `None` means the latest compatible.
	pub version: Option<Version>,
	/// Provider configuration, keyed by `<package>:<name>`.
	pub config: ConfigMap,
}

/// Error extracting a provider version from a property bag.
#[derive(Debug, Error)]
pub enum VersionError {
	#[error("'version' must be a string")]
	NotAString,
	#[error("could not parse provider version: {0}")]
	Invalid(#[from] semver::Error),
}

/// Parses a semantic version the way users actually write them: a leading
/// `v` and missing minor or patch components are tolerated.
pub fn parse_version_tolerant(s: &str) -> Result<Version, semver::Error> {
	let s = s.trim();
	let s = s.strip_prefix('v').unwrap_or(s);
	let (core, rest) = match s.find(['-', '+']) {
		Some(at) => s.split_at(at),
		None => (s, ""),
	};
	match core.split('.').count() {
		1 => Version::parse(&format!("{}.0.0{}", core, rest)),
		2 => Version::parse(&format!("{}.0{}", core, rest)),
		_ => Version::parse(s),
	}
}

/// Extracts the `version` property, failing on any malformed value.
///
/// This is the single-value variant used when rehydrating persisted
/// providers, where a bad version is fatal rather than a user-correctable
/// validation failure.
pub fn extract_version(properties: &PropertyMap) -> Result<Option<Version>, VersionError> {
	match properties.get(VERSION_PROPERTY) {
		None => Ok(None),
		Some(PropertyValue::String(s)) => Ok(Some(parse_version_tolerant(s)?)),
		Some(_) => Err(VersionError::NotAString),
	}
}

/// Parses a provider's version and configuration out of a property bag.
///
/// The second return value reports whether any property in the bag was
/// computed/unknown.
pub fn parse_properties(
	pkg: &Package,
	properties: &PropertyMap,
	allow_unknowns: bool,
) -> (ProviderInputs, bool, Vec<CheckFailure>) {
	let mut failures = Vec::new();

	let version = match extract_version(properties) {
		Ok(version) => version,
		Err(err) => {
			failures.push(CheckFailure::new(VERSION_PROPERTY, err.to_string()));
			None
		},
	};

	let mut contains_unknowns = false;
	let mut config = ConfigMap::new();
	for (key, value) in properties {
		if key.as_str() == VERSION_PROPERTY {
			continue;
		}

		match value {
			PropertyValue::Computed => {
				contains_unknowns = true;
				if !allow_unknowns {
					failures.push(CheckFailure::new(
						key.as_str(),
						"provider properties must not be unknown",
					));
				}
			},
			PropertyValue::String(s) => {
				config.insert(Key::new(pkg.as_str(), key.as_str()), s.clone());
			},
			_ => {
				failures.push(CheckFailure::new(
					key.as_str(),
					"provider property values must be strings",
				));
			},
		}
	}

	let inputs = ProviderInputs { version, config };
	(inputs, contains_unknowns, failures)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::PropertyKey;

	fn props(entries: &[(&str, PropertyValue)]) -> PropertyMap {
		entries
			.iter()
			.map(|(k, v)| (PropertyKey::from(*k), v.clone()))
			.collect()
	}

	#[test]
	fn test_tolerant_versions() {
		assert_eq!(parse_version_tolerant("1.2.3").unwrap(), Version::new(1, 2, 3));
		assert_eq!(parse_version_tolerant("v1.2.3").unwrap(), Version::new(1, 2, 3));
		assert_eq!(parse_version_tolerant("1.2").unwrap(), Version::new(1, 2, 0));
		assert_eq!(parse_version_tolerant("1").unwrap(), Version::new(1, 0, 0));
		assert_eq!(
			parse_version_tolerant("1.2.3-alpha.1").unwrap().to_string(),
			"1.2.3-alpha.1"
		);
		assert_eq!(
			parse_version_tolerant("v2-rc1").unwrap().to_string(),
			"2.0.0-rc1"
		);
		assert!(parse_version_tolerant("not-a-version").is_err());
	}

	#[test]
	fn test_version_and_strings_become_inputs() {
		let pkg = Package::new("aws");
		let bag = props(&[
			("version", PropertyValue::from("1.2.3")),
			("region", PropertyValue::from("us-west-2")),
			("profile", PropertyValue::from("dev")),
		]);

		let (inputs, unknowns, failures) = parse_properties(&pkg, &bag, false);
		assert!(failures.is_empty());
		assert!(!unknowns);
		assert_eq!(inputs.version, Some(Version::new(1, 2, 3)));
		assert_eq!(
			inputs.config.get(&Key::new("aws", "region")),
			Some(&"us-west-2".to_string())
		);
		assert_eq!(
			inputs.config.get(&Key::new("aws", "profile")),
			Some(&"dev".to_string())
		);
		// the version property is reserved and never forwarded as config
		assert!(!inputs.config.contains_key(&Key::new("aws", "version")));
	}

	#[test]
	fn test_non_string_version_is_a_single_failure() {
		let pkg = Package::new("aws");
		let bag = props(&[("version", PropertyValue::Number(1.0))]);

		let (inputs, _, failures) = parse_properties(&pkg, &bag, false);
		assert_eq!(inputs.version, None);
		assert_eq!(failures.len(), 1);
		assert_eq!(failures[0].property.as_str(), "version");
		assert_eq!(failures[0].reason, "'version' must be a string");
	}

	#[test]
	fn test_malformed_version_reports_parser_message() {
		let pkg = Package::new("aws");
		let bag = props(&[("version", PropertyValue::from("one.two"))]);

		let (_, _, failures) = parse_properties(&pkg, &bag, false);
		assert_eq!(failures.len(), 1);
		assert_eq!(failures[0].property.as_str(), "version");
		assert!(failures[0]
			.reason
			.starts_with("could not parse provider version:"));
	}

	#[test]
	fn test_unknowns_fail_unless_allowed() {
		let pkg = Package::new("aws");
		let bag = props(&[
			("region", PropertyValue::Computed),
			("zone", PropertyValue::Computed),
		]);

		let (_, unknowns, failures) = parse_properties(&pkg, &bag, false);
		assert!(unknowns);
		assert_eq!(failures.len(), 2);
		for failure in &failures {
			assert_eq!(failure.reason, "provider properties must not be unknown");
		}

		let (inputs, unknowns, failures) = parse_properties(&pkg, &bag, true);
		assert!(unknowns);
		assert!(failures.is_empty());
		assert!(inputs.config.is_empty());
	}

	#[test]
	fn test_non_string_values_fail() {
		let pkg = Package::new("aws");
		let bag = props(&[("count", PropertyValue::Number(3.0))]);

		let (_, _, failures) = parse_properties(&pkg, &bag, false);
		assert_eq!(failures.len(), 1);
		assert_eq!(failures[0].property.as_str(), "count");
		assert_eq!(failures[0].reason, "provider property values must be strings");
	}

	#[test]
	fn test_extract_version_is_fatal_on_malformed_input() {
		let bag = props(&[("version", PropertyValue::Number(1.0))]);
		assert!(matches!(
			extract_version(&bag),
			Err(VersionError::NotAString)
		));

		let bag = props(&[("version", PropertyValue::from("1.4.0"))]);
		assert_eq!(extract_version(&bag).unwrap(), Some(Version::new(1, 4, 0)));

		assert_eq!(extract_version(&PropertyMap::new()).unwrap(), None);
	}
}
