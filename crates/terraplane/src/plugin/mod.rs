// Plugin capability surface.
//
// Everything the registry consumes from the plugin host lives here: the
// provider capability trait, the host that loans out provider handles, and
// the plain-data types that cross the plugin boundary.

use std::sync::Arc;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::config::ConfigMap;
use crate::resource::{Id, ModuleMember, Package, PropertyKey, PropertyMap, Status, Urn};

/// Error crossing the plugin boundary.
///
/// Plugin errors arrive as opaque messages over the wire and are surfaced
/// verbatim.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct PluginError {
	message: String,
}

impl PluginError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// A structured validation failure for a single property.
///
/// Failures are data, not errors: they accumulate, are returned alongside a
/// successful call, and are rendered to the user for correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFailure {
	pub property: PropertyKey,
	pub reason: String,
}

impl CheckFailure {
	pub fn new(property: impl Into<PropertyKey>, reason: impl Into<String>) -> Self {
		Self {
			property: property.into(),
			reason: reason.into(),
		}
	}
}

/// Degree of change reported by a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffChanges {
	/// The provider could not determine whether anything changed.
	Unknown,
	None,
	Some,
}

/// Result of diffing old provider inputs against new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
	pub changes: DiffChanges,
	/// Properties whose change forces replacement of the resource.
	#[serde(default)]
	pub replace_keys: Vec<PropertyKey>,
}

impl DiffResult {
	/// A diff that reports nothing: changes unknown, no replacement.
	pub fn unknown() -> Self {
		Self {
			changes: DiffChanges::Unknown,
			replace_keys: Vec::new(),
		}
	}

	/// Replacement is signaled solely by a nonempty replace-key set.
	pub fn requires_replacement(&self) -> bool {
		!self.replace_keys.is_empty()
	}
}

/// Descriptive metadata about a loaded plugin binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<Version>,
}

/// The provider capability set.
///
/// A provider implements create/read/update/delete for the resources of one
/// package. Handles are safe for concurrent use; serialization of calls, if
/// a plugin needs it, is the host's responsibility. All operations are
/// synchronous from the caller's perspective.
pub trait Provider: Send + Sync {
	/// The package this provider implements.
	fn pkg(&self) -> Package;

	/// Configure the provider with validated inputs. Must be called before
	/// any CRUD operation outside of preview.
	fn configure(&self, config: &ConfigMap) -> Result<(), PluginError>;

	/// Validate the configuration of a provider resource.
	fn check_config(
		&self,
		olds: &PropertyMap,
		news: &PropertyMap,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError>;

	/// Diff the configuration of a provider resource.
	fn diff_config(&self, olds: &PropertyMap, news: &PropertyMap) -> Result<DiffResult, PluginError>;

	/// Validate the inputs of a resource before creation or update.
	fn check(
		&self,
		urn: &Urn,
		olds: &PropertyMap,
		news: &PropertyMap,
		allow_unknowns: bool,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError>;

	/// Compare the old state of a resource against its new inputs.
	fn diff(
		&self,
		urn: &Urn,
		id: &Id,
		olds: &PropertyMap,
		news: &PropertyMap,
		allow_unknowns: bool,
	) -> Result<DiffResult, PluginError>;

	/// Create a resource, returning its assigned ID and output properties.
	fn create(&self, urn: &Urn, news: &PropertyMap) -> Result<(Id, PropertyMap, Status), PluginError>;

	/// Read the live state of a resource.
	fn read(&self, urn: &Urn, id: &Id, props: &PropertyMap) -> Result<PropertyMap, PluginError>;

	/// Update a resource to match its new inputs.
	fn update(
		&self,
		urn: &Urn,
		id: &Id,
		olds: &PropertyMap,
		news: &PropertyMap,
	) -> Result<(PropertyMap, Status), PluginError>;

	/// Delete a resource.
	fn delete(&self, urn: &Urn, id: &Id, props: &PropertyMap) -> Result<Status, PluginError>;

	/// Invoke a provider function.
	fn invoke(
		&self,
		tok: &ModuleMember,
		args: &PropertyMap,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError>;

	/// Metadata about the plugin binary backing this provider.
	fn get_plugin_info(&self) -> Result<PluginInfo, PluginError>;

	/// Ask the provider to abandon any in-flight work. Best effort.
	fn signal_cancellation(&self) -> Result<(), PluginError>;

	/// Release the provider. Called by the owner exactly once, through
	/// [`Host::close_provider`].
	fn close(&self) -> Result<(), PluginError>;
}

/// Launches and terminates the subprocesses behind provider handles.
pub trait Host: Send + Sync {
	/// Load the plugin implementing `pkg` at the given version; `None`
	/// means the latest compatible version. The returned handle is owned by
	/// the caller until passed back to [`Host::close_provider`]. Successive
	/// calls may or may not return the same handle.
	fn provider(
		&self,
		pkg: &Package,
		version: Option<&Version>,
	) -> Result<Arc<dyn Provider>, PluginError>;

	/// Terminate the plugin behind `provider`. Must be called exactly once
	/// per handle returned from [`Host::provider`].
	fn close_provider(&self, provider: &Arc<dyn Provider>) -> Result<(), PluginError>;
}
