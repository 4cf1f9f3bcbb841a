use crate::Artifact;
use derive_more::{Display, Error};
use miette::Diagnostic;
use reqwest::StatusCode;
use std::{io, path::PathBuf};

/// Error type of a single artifact lookup.
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum RegistryError {
    #[display("The {artifact} does not exist at {location}")]
    #[diagnostic(
        code(crx_registry::not_found),
        help("Check the spelling, or run `crx search` to list the available packages.")
    )]
    NotFound { artifact: Artifact, location: String },

    #[display("Failed to parse the {artifact} from {location}: {error}")]
    #[diagnostic(code(crx_registry::parse_error))]
    Parse {
        artifact: Artifact,
        location: String,
        #[error(source)]
        error: serde_yaml::Error,
    },

    #[display("Failed to fetch {url}: {error}")]
    #[diagnostic(code(crx_registry::network_error))]
    Network {
        url: String,
        #[error(source)]
        error: reqwest::Error,
    },

    #[display("Failed to fetch {url}: HTTP {status}")]
    #[diagnostic(code(crx_registry::http_status))]
    HttpStatus { url: String, status: StatusCode },

    #[display("Failed to read {path:?}: {error}")]
    #[diagnostic(code(crx_registry::io_error))]
    ReadFile {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

/// Error type of [`PackageSource::resolve_all`](crate::PackageSource::resolve_all)
/// and [`PackageSource::resolve_many`](crate::PackageSource::resolve_many).
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum ResolveAllError {
    #[diagnostic(transparent)]
    Index(#[error(source)] RegistryError),

    #[display("Failed to resolve package {name:?}: {error}")]
    #[diagnostic(code(crx_registry::resolve_package))]
    Package {
        name: String,
        #[error(source)]
        error: RegistryError,
    },
}

impl ResolveAllError {
    /// Name of the package that failed, if the failure wasn't the index itself.
    pub fn package_name(&self) -> Option<&str> {
        match self {
            ResolveAllError::Index(_) => None,
            ResolveAllError::Package { name, .. } => Some(name),
        }
    }
}

/// Error type of [`PackageSource::select`](crate::PackageSource::select).
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum SelectSourceError {
    #[display("No package registry is configured")]
    #[diagnostic(
        code(crx_registry::no_registry),
        help("Add a `registries` entry to the config file, or pass `--registry <dir>`.")
    )]
    NoRegistry,

    #[display("Unsupported registry type: {_0:?}")]
    #[diagnostic(
        code(crx_registry::unsupported_registry_type),
        help("The only supported registry type is `github`.")
    )]
    UnsupportedType(#[error(not(source))] String),
}
