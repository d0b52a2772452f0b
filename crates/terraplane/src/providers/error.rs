// Errors raised while rehydrating the registry from persisted state.

use thiserror::Error;

use crate::plugin::PluginError;
use crate::resource::Urn;

/// Errors from registry construction.
///
/// Operational errors (load, configure, delete-unknown) surface through the
/// provider capability set as [`PluginError`]s; these variants cover the
/// rehydration path, where the offending persisted resource is named.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// A persisted provider resource is missing a concrete ID.
	#[error("provider '{0}' has no ID")]
	MissingId(Urn),
	/// A persisted provider resource carries an unparsable version input.
	#[error("invalid version for provider '{urn}': {reason}")]
	InvalidVersion { urn: Urn, reason: String },
	/// A persisted provider resource carries inputs that no longer parse.
	#[error("invalid inputs for provider '{urn}': {reason}")]
	InvalidInputs { urn: Urn, reason: String },
	/// The plugin host could not produce a plugin for the persisted
	/// package and version.
	#[error("failed to load plugin for provider '{urn}': {source}")]
	Load { urn: Urn, source: PluginError },
	/// A reloaded plugin rejected its persisted configuration.
	#[error("failed to configure provider '{urn}': {source}")]
	Configure { urn: Urn, source: PluginError },
}
