// Concurrent map of live provider handles.
//
// The store is the single source of truth for which provider handles are
// live. Locks are held only across the map operation itself, never across a
// plugin call: plugin calls cross a process boundary and may reenter engine
// code.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::reference::Reference;
use crate::plugin::Provider;

/// Maps provider references to live provider handles.
#[derive(Default)]
pub(crate) struct ProviderStore {
	providers: RwLock<HashMap<Reference, Arc<dyn Provider>>>,
}

impl ProviderStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Looks up the provider registered under `reference`.
	pub fn get(&self, reference: &Reference) -> Option<Arc<dyn Provider>> {
		self.providers.read().get(reference).cloned()
	}

	/// Registers `provider` under `reference`, returning the evicted
	/// occupant if the slot was already taken.
	pub fn set(
		&self,
		reference: Reference,
		provider: Arc<dyn Provider>,
	) -> Option<Arc<dyn Provider>> {
		self.providers.write().insert(reference, provider)
	}

	/// Removes and returns the provider registered under `reference`.
	pub fn remove(&self, reference: &Reference) -> Option<Arc<dyn Provider>> {
		self.providers.write().remove(reference)
	}
}
