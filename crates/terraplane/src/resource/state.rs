// Persisted resource state and operation outcomes.

use serde::{Deserialize, Serialize};

use super::property::PropertyMap;
use super::tokens::TypeToken;
use super::urn::{Id, Urn};

/// Outcome of a provider CRUD operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
	Ok,
	PartialFailure,
	Unknown,
}

/// Persisted state of a single resource, as recorded in a deployment
/// checkpoint and handed back to the engine when a deployment resumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
	pub urn: Urn,
	pub id: Id,
	#[serde(default)]
	pub inputs: PropertyMap,
	#[serde(default)]
	pub outputs: PropertyMap,
}

impl State {
	pub fn new(urn: Urn, id: Id, inputs: PropertyMap) -> Self {
		Self {
			urn,
			id,
			inputs,
			outputs: PropertyMap::new(),
		}
	}

	/// The resource type embedded in this state's URN.
	pub fn resource_type(&self) -> TypeToken {
		self.urn.resource_type()
	}
}
