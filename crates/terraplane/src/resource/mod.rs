// Resource model consumed by the provider registry.
//
// These are the engine-facing value types: URNs and IDs, property bags with
// computed markers, token newtypes, and persisted resource state. The
// registry treats all of them as opaque except for the type token embedded
// in a URN, which is what identifies provider resources.

mod property;
mod state;
mod tokens;
mod urn;

pub use property::{PropertyKey, PropertyMap, PropertyValue};
pub use state::{State, Status};
pub use tokens::{ModuleMember, Package, TypeToken};
pub use urn::{Id, Urn};
