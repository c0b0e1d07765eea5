//! External-collaborator seams: secret store and object store.
//!
//! The shipped backends are local (filesystem, environment, in-memory);
//! cloud backends are a deployment concern and plug in behind the same
//! traits.

mod env;
mod fs;
mod memory;
mod traits;

pub use env::EnvSecretStore;
pub use fs::FsObjectStore;
pub use memory::{MemoryObjectStore, MemorySecretStore};
pub use traits::{ObjectStore, SecretStore};
