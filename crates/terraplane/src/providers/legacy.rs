// Legacy provider loading.
//
// Before providers became first-class resources, a deployment loaded at
// most one instance of each provider package, configured from stack
// configuration, and addressed it with the fixed ID `v0`. This pathway
// survives for deployments whose programs predate provider resources. A
// deployment uses either this registry or [`Registry`](super::Registry),
// never both.

use std::sync::Arc;

use tracing::{debug, warn};

use super::inputs::parse_properties;
use super::reference::Reference;
use super::shim::create_shim;
use super::store::ProviderStore;
use crate::plugin::{CheckFailure, Host, PluginError, Provider};
use crate::resource::{Id, PropertyMap, Urn};

/// ID assigned to every legacy provider instance.
const LEGACY_ID: &str = "v0";

/// Outcome of a legacy registration attempt.
pub enum Registration {
	/// The provider was loaded, configured, and registered.
	Registered {
		reference: Reference,
		provider: Arc<dyn Provider>,
	},
	/// The property bag failed validation; nothing was registered.
	Invalid(Vec<CheckFailure>),
}

impl std::fmt::Debug for Registration {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Registration::Registered { reference, .. } => f
				.debug_struct("Registration::Registered")
				.field("reference", reference)
				.finish_non_exhaustive(),
			Registration::Invalid(failures) => {
				f.debug_tuple("Registration::Invalid").field(failures).finish()
			}
		}
	}
}

/// Registry for legacy, single-instance providers.
pub struct LegacyRegistry {
	host: Arc<dyn Host>,
	providers: ProviderStore,
}

impl LegacyRegistry {
	pub fn new(host: Arc<dyn Host>) -> Self {
		Self {
			host,
			providers: ProviderStore::new(),
		}
	}

	/// Loads and registers the provider for `urn`.
	///
	/// Outside preview the instance is keyed by the fixed legacy ID; when
	/// the property bag contains unknown values (preview only), a shim is
	/// registered under the unknown ID instead.
	pub fn register_provider(
		&self,
		urn: &Urn,
		properties: &PropertyMap,
		allow_unknowns: bool,
	) -> Result<Registration, PluginError> {
		let reference = Reference::new(urn.clone(), Id::new(LEGACY_ID))
			.map_err(|err| PluginError::new(err.to_string()))?;
		let pkg = reference.package();

		debug!("loading provider {}", urn);
		let (inputs, has_unknowns, failures) = parse_properties(&pkg, properties, allow_unknowns);
		if !failures.is_empty() {
			return Ok(Registration::Invalid(failures));
		}

		// Unknown config means this is a preview and no real ID is needed.
		if has_unknowns {
			assert!(
				allow_unknowns,
				"unknown property values require allow_unknowns"
			);
			let shim = create_shim(self.host.as_ref(), &pkg, inputs.version.as_ref())?;
			let reference = Reference::new(urn.clone(), Id::unknown())
				.expect("validated as a provider URN above");
			self.set_provider(reference.clone(), &shim);
			return Ok(Registration::Registered {
				reference,
				provider: shim,
			});
		}

		let provider = self.host.provider(&pkg, inputs.version.as_ref())?;
		if let Err(err) = provider.configure(&inputs.config) {
			if let Err(close_err) = self.host.close_provider(&provider) {
				warn!("error closing provider; ignoring: {}", close_err);
			}
			return Err(err);
		}
		debug!("loaded provider {}", urn);

		self.set_provider(reference.clone(), &provider);
		Ok(Registration::Registered {
			reference,
			provider,
		})
	}

	/// Returns the provider registered under `reference`, if any.
	pub fn get_provider(&self, reference: &Reference) -> Option<Arc<dyn Provider>> {
		self.providers.get(reference)
	}

	fn set_provider(&self, reference: Reference, provider: &Arc<dyn Provider>) {
		if let Some(evicted) = self.providers.set(reference, Arc::clone(provider)) {
			if !Arc::ptr_eq(&evicted, provider) {
				if let Err(err) = self.host.close_provider(&evicted) {
					warn!("error closing provider; ignoring: {}", err);
				}
			}
		}
	}
}
