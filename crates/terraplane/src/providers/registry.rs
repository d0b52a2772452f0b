// The provider registry: a meta-provider over plugin subprocesses.
//
// The registry implements the same capability set as the providers it
// stores, so the engine drives provider resources through the ordinary
// resource lifecycle: Check loads the plugin and validates its config, Diff
// decides replacement, Create and Update configure, Delete closes. Lookups
// issued while the engine processes other resources resolve through
// `get_provider`.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::RegistryError;
use super::inputs::{extract_version, parse_properties};
use super::reference::{is_provider_type, Reference};
use super::shim::create_shim;
use super::store::ProviderStore;
use crate::config::ConfigMap;
use crate::plugin::{
	CheckFailure, DiffResult, Host, PluginError, PluginInfo, Provider,
};
use crate::resource::{Id, ModuleMember, Package, PropertyMap, State, Status, Urn};

/// The nominal package of the meta-provider itself.
const REGISTRY_PACKAGE: &str = "pulumi";

/// Tracks the provider instances of a single deployment.
///
/// One registry exists per deployment, parameterized by the plugin host and
/// the prior deployment's persisted state. Between a provider resource's
/// Check and its Create or Update, the instance is staged under the
/// unknown-ID reference; afterwards it is also registered under its
/// concrete ID.
///
/// Dropping the registry does not close surviving handles: their ownership
/// transfers to the engine's state persistence.
pub struct Registry {
	host: Arc<dyn Host>,
	providers: ProviderStore,
	is_preview: bool,
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("is_preview", &self.is_preview)
			.finish_non_exhaustive()
	}
}

impl Registry {
	/// Builds a registry from the prior deployment's resource states.
	///
	/// Every persisted provider resource is reloaded and configured with
	/// its recorded inputs; non-provider resources are ignored. Persisted
	/// providers must carry concrete IDs.
	pub fn new(
		host: Arc<dyn Host>,
		prior: &[State],
		is_preview: bool,
	) -> Result<Self, RegistryError> {
		let registry = Self {
			host,
			providers: ProviderStore::new(),
			is_preview,
		};

		let mut restored = 0;
		for state in prior {
			if !is_provider_type(&state.resource_type()) {
				continue;
			}

			if state.id.is_unknown() {
				return Err(RegistryError::MissingId(state.urn.clone()));
			}

			let reference = Reference::new(state.urn.clone(), state.id.clone())
				.expect("provider type implies a valid provider URN");
			let pkg = reference.package();

			let version =
				extract_version(&state.inputs).map_err(|err| RegistryError::InvalidVersion {
					urn: state.urn.clone(),
					reason: err.to_string(),
				})?;

			debug!("loading provider {} for {}", pkg, state.urn);
			let provider = registry
				.host
				.provider(&pkg, version.as_ref())
				.map_err(|source| RegistryError::Load {
					urn: state.urn.clone(),
					source,
				})?;

			let (inputs, _, failures) = parse_properties(&pkg, &state.inputs, false);
			if let Some(failure) = failures.first() {
				registry.close_ignoring_error(&provider);
				return Err(RegistryError::InvalidInputs {
					urn: state.urn.clone(),
					reason: format!("'{}': {}", failure.property, failure.reason),
				});
			}

			if let Err(source) = provider.configure(&inputs.config) {
				registry.close_ignoring_error(&provider);
				return Err(RegistryError::Configure {
					urn: state.urn.clone(),
					source,
				});
			}

			registry.set_provider(reference, &provider);
			restored += 1;
		}

		if restored > 0 {
			info!("restored {} providers from prior state", restored);
		}
		Ok(registry)
	}

	/// Returns the provider registered under `reference`, if any.
	///
	/// This is the lookup the engine issues when a non-provider resource
	/// names `reference` as its provider.
	pub fn get_provider(&self, reference: &Reference) -> Option<Arc<dyn Provider>> {
		self.providers.get(reference)
	}

	/// The staging reference a provider occupies between Check and
	/// Create/Update.
	fn unknown_reference(urn: &Urn) -> Reference {
		Reference::new(urn.clone(), Id::unknown())
			.unwrap_or_else(|err| panic!("provider operations require a provider URN: {}", err))
	}

	fn concrete_reference(urn: &Urn, id: &Id) -> Reference {
		Reference::new(urn.clone(), id.clone())
			.unwrap_or_else(|err| panic!("provider operations require a provider URN: {}", err))
	}

	/// Registers `provider` under `reference`, closing any evicted
	/// occupant. A slot can legitimately be overwritten with the same
	/// handle (e.g. repeated preview diffs); that never closes it.
	fn set_provider(&self, reference: Reference, provider: &Arc<dyn Provider>) {
		if let Some(evicted) = self.providers.set(reference, Arc::clone(provider)) {
			if !Arc::ptr_eq(&evicted, provider) {
				self.close_ignoring_error(&evicted);
			}
		}
	}

	fn close_ignoring_error(&self, provider: &Arc<dyn Provider>) {
		if let Err(err) = self.host.close_provider(provider) {
			warn!("error closing provider; ignoring: {}", err);
		}
	}

	/// Re-derives the provider config from inputs that already passed
	/// Check.
	fn checked_config(pkg: &Package, news: &PropertyMap) -> Result<ConfigMap, PluginError> {
		let (inputs, _, failures) = parse_properties(pkg, news, false);
		if let Some(failure) = failures.first() {
			return Err(PluginError::new(format!(
				"invalid property '{}': {}",
				failure.property, failure.reason
			)));
		}
		Ok(inputs.config)
	}
}

impl Provider for Registry {
	fn pkg(&self) -> Package {
		Package::new(REGISTRY_PACKAGE)
	}

	fn configure(&self, _config: &ConfigMap) -> Result<(), PluginError> {
		panic!("the provider registry is not configurable");
	}

	fn check_config(
		&self,
		_olds: &PropertyMap,
		_news: &PropertyMap,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError> {
		panic!("the provider registry has no configuration of its own");
	}

	fn diff_config(
		&self,
		_olds: &PropertyMap,
		_news: &PropertyMap,
	) -> Result<DiffResult, PluginError> {
		panic!("the provider registry has no configuration of its own");
	}

	fn check(
		&self,
		urn: &Urn,
		olds: &PropertyMap,
		news: &PropertyMap,
		allow_unknowns: bool,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError> {
		let reference = Self::unknown_reference(urn);
		let pkg = reference.package();

		// Validation failures are returned to the user, not raised.
		let (inputs, has_unknowns, failures) = parse_properties(&pkg, news, allow_unknowns);
		if !failures.is_empty() {
			return Ok((news.clone(), failures));
		}

		// Unknown config values can only occur during preview. Real
		// configuration is impossible, so stage a shim instead.
		if has_unknowns {
			assert!(
				allow_unknowns,
				"unknown property values require allow_unknowns"
			);
			let shim = create_shim(self.host.as_ref(), &pkg, inputs.version.as_ref())?;
			self.set_provider(reference, &shim);
			return Ok((news.clone(), Vec::new()));
		}

		let provider = self.host.provider(&pkg, inputs.version.as_ref())?;

		let checked = match provider.check_config(olds, news) {
			Ok((checked, failures)) if failures.is_empty() => checked,
			result => {
				// Ownership of the transient plugin reverts to the host.
				self.close_ignoring_error(&provider);
				return result;
			},
		};

		// During preview the instance must answer queries before Create or
		// Update ever run, so it is configured eagerly; otherwise
		// configuration waits for the step that actually executes.
		if self.is_preview {
			if let Err(err) = provider.configure(&inputs.config) {
				self.close_ignoring_error(&provider);
				return Err(err);
			}
		}

		debug!("staged provider {} for {}", pkg, urn);
		self.set_provider(reference, &provider);
		Ok((checked, Vec::new()))
	}

	fn diff(
		&self,
		urn: &Urn,
		id: &Id,
		olds: &PropertyMap,
		news: &PropertyMap,
		_allow_unknowns: bool,
	) -> Result<DiffResult, PluginError> {
		assert!(!id.is_unknown(), "diff requires a concrete provider ID");

		let reference = Self::unknown_reference(urn);
		let provider = self
			.providers
			.get(&reference)
			.unwrap_or_else(|| panic!("'check' has not been called for provider {}", urn));

		let diff = provider.diff_config(olds, news)?;

		if diff.requires_replacement() {
			// The engine replaces the provider through a fresh
			// Check/Create; this instance will not be called again.
			debug!(
				"provider {} requires replacement: {:?}",
				urn, diff.replace_keys
			);
			self.providers.remove(&reference);
			self.close_ignoring_error(&provider);
		} else if self.is_preview {
			// Later preview steps resolve the existing concrete ID.
			self.set_provider(Self::concrete_reference(urn, id), &provider);
		}

		Ok(diff)
	}

	fn create(&self, urn: &Urn, news: &PropertyMap) -> Result<(Id, PropertyMap, Status), PluginError> {
		assert!(!self.is_preview, "create must not be called during preview");

		let reference = Self::unknown_reference(urn);
		let provider = self
			.providers
			.get(&reference)
			.unwrap_or_else(|| panic!("'check' has not been called for provider {}", urn));

		let config = Self::checked_config(&reference.package(), news)?;
		provider.configure(&config)?;

		let id = Id::new(Uuid::new_v4().to_string());
		debug!("created provider {} as {}", urn, id);

		// Re-key the instance under its assigned ID. The staging slot is
		// dropped without closing: it is the same handle.
		self.providers.remove(&reference);
		self.set_provider(Self::concrete_reference(urn, &id), &provider);
		Ok((id, PropertyMap::new(), Status::Ok))
	}

	fn read(&self, _urn: &Urn, _id: &Id, _props: &PropertyMap) -> Result<PropertyMap, PluginError> {
		panic!("the provider registry is not a readable resource");
	}

	fn update(
		&self,
		urn: &Urn,
		id: &Id,
		_olds: &PropertyMap,
		news: &PropertyMap,
	) -> Result<(PropertyMap, Status), PluginError> {
		let reference = Self::concrete_reference(urn, id);
		let provider = self
			.providers
			.get(&reference)
			.unwrap_or_else(|| panic!("no provider registered under {}", reference));

		let config = Self::checked_config(&reference.package(), news)?;
		provider.configure(&config)?;
		Ok((PropertyMap::new(), Status::Ok))
	}

	fn delete(&self, urn: &Urn, id: &Id, _props: &PropertyMap) -> Result<Status, PluginError> {
		let reference = Self::concrete_reference(urn, id);
		let Some(provider) = self.providers.remove(&reference) else {
			return Err(PluginError::new(format!("unknown provider '{}'", reference)));
		};

		self.close_ignoring_error(&provider);
		Ok(Status::Ok)
	}

	fn invoke(
		&self,
		_tok: &ModuleMember,
		_args: &PropertyMap,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError> {
		panic!("the provider registry does not expose functions");
	}

	fn get_plugin_info(&self) -> Result<PluginInfo, PluginError> {
		panic!("the provider registry is not a plugin");
	}

	fn signal_cancellation(&self) -> Result<(), PluginError> {
		// TODO: propagate cancellation to in-flight host loads.
		Ok(())
	}

	fn close(&self) -> Result<(), PluginError> {
		// Individual plugins are closed by Delete or replacement.
		Ok(())
	}
}
