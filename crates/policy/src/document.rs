use serde::{ser::SerializeMap, Serialize, Serializer};

/// Update endpoint of the Chrome Web Store.
pub const CHROME_WEB_STORE_UPDATE_URL: &str = "https://clients2.google.com/service/update2/crx";

pub const FORCELIST_KEY: &str = "ExtensionInstallForcelist";
pub const ALLOWLIST_KEY: &str = "ExtensionInstallAllowlist";
pub const BLOCKLIST_KEY: &str = "ExtensionInstallBlocklist";
pub const SETTINGS_KEY: &str = "ExtensionSettings";

/// Value of `installation_mode` inside [`ExtensionSetting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationMode {
    NormalInstalled,
}

/// Per-extension entry of the `ExtensionSettings` policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionSetting {
    pub installation_mode: InstallationMode,
    pub update_url: String,
}

/// Extension id to [`ExtensionSetting`], kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSettings(Vec<(String, ExtensionSetting)>);

impl ExtensionSettings {
    /// Insert or replace the entry of `id`. A replaced entry keeps its position.
    pub fn insert(&mut self, id: impl Into<String>, setting: ExtensionSetting) {
        let id = id.into();
        match self.0.iter_mut().find(|(key, _)| *key == id) {
            Some((_, existing)) => *existing = setting,
            None => self.0.push((id, setting)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ExtensionSetting> {
        self.0.iter().find(|(key, _)| key == id).map(|(_, setting)| setting)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ExtensionSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(id, setting)| (id, setting)))
    }
}

/// Which installation policy a document carries. Exactly one shape is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InstallPolicy {
    #[default]
    Empty,
    /// `<id>;<update_url>` entries.
    Forcelist(Vec<String>),
    /// Bare extension ids.
    Allowlist(Vec<String>),
    Settings(ExtensionSettings),
}

/// Browser extension policy ready to be encoded.
///
/// Serializes to a sparse object: empty collections are omitted and the
/// present keys always appear in the order forcelist, allowlist, blocklist,
/// settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyDocument {
    pub install: InstallPolicy,
    /// Never produced by the generator. Encoders still honor it.
    pub blocklist: Vec<String>,
}

impl PolicyDocument {
    pub fn forcelist(&self) -> &[String] {
        match &self.install {
            InstallPolicy::Forcelist(entries) => entries,
            _ => &[],
        }
    }

    pub fn allowlist(&self) -> &[String] {
        match &self.install {
            InstallPolicy::Allowlist(ids) => ids,
            _ => &[],
        }
    }

    pub fn blocklist(&self) -> &[String] {
        &self.blocklist
    }

    pub fn settings(&self) -> Option<&ExtensionSettings> {
        match &self.install {
            InstallPolicy::Settings(settings) => Some(settings),
            _ => None,
        }
    }

    /// Non-empty list policies as `(key, entries)`, in encoding order.
    ///
    /// `ExtensionSettings` is not a list and is never part of the result.
    pub fn lists(&self) -> Vec<(&'static str, &[String])> {
        [
            (FORCELIST_KEY, self.forcelist()),
            (ALLOWLIST_KEY, self.allowlist()),
            (BLOCKLIST_KEY, self.blocklist()),
        ]
        .into_iter()
        .filter(|(_, entries)| !entries.is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lists().is_empty() && self.settings().is_none_or(ExtensionSettings::is_empty)
    }
}

impl Serialize for PolicyDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, entries) in self.lists() {
            map.serialize_entry(key, entries)?;
        }
        if let Some(settings) = self.settings().filter(|settings| !settings.is_empty()) {
            map.serialize_entry(SETTINGS_KEY, settings)?;
        }
        map.end()
    }
}
