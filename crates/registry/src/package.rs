use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Path of the index artifact, relative to the registry root.
pub const INDEX_PATH: &str = "registry.yaml";

/// A browser extension as described by `pkgs/<name>.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Package {
    /// Key of the package inside its registry.
    pub name: String,
    /// Identifier of the extension in the browser's web store.
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Free-form keywords used by search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Package {
    /// Case-insensitive substring match against the name, the display name or any tag.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&query);
        contains(&self.name)
            || contains(&self.display_name)
            || self.tags.iter().any(|tag| contains(tag))
    }
}

/// Content of `registry.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryIndex {
    /// Format version. Informational only.
    #[serde(default)]
    pub version: u32,
    /// Every package that can be listed, in display order.
    #[serde(default)]
    pub packages: Vec<String>,
}

/// A file a package source can be asked for.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Artifact {
    #[display("registry index")]
    Index,
    #[display("package {_0:?}")]
    Package(String),
}

impl Artifact {
    /// Location of the artifact relative to the registry root.
    pub fn path(&self) -> String {
        match self {
            Artifact::Index => INDEX_PATH.to_string(),
            Artifact::Package(name) => format!("pkgs/{name}.yaml"),
        }
    }
}
