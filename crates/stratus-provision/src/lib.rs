pub mod executor;
pub mod http;
pub mod memory;
pub mod types;

pub use executor::{provision, ProvisionReport};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use types::{CreateOutcome, CreatedResource, ProvisioningBackend};
