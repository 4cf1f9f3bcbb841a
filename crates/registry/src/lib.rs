mod error;
mod local;
mod package;
mod remote;
mod source;

pub use error::{RegistryError, ResolveAllError, SelectSourceError};
pub use local::LocalSource;
pub use package::{Artifact, Package, RegistryIndex, INDEX_PATH};
pub use remote::{RemoteSource, DEFAULT_HOST};
pub use source::{PackageSource, SUPPORTED_REGISTRY_TYPE};

use serde::de::DeserializeOwned;

/// Parse the YAML body of `artifact`, attaching where it came from on failure.
fn parse_artifact<Value: DeserializeOwned>(
    artifact: Artifact,
    location: String,
    body: &[u8],
) -> Result<Value, RegistryError> {
    serde_yaml::from_slice(body)
        .map_err(|error| RegistryError::Parse { artifact, location, error })
}
