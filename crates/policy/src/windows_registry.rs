use crate::{ApplyError, PolicyDocument, PolicyTarget, ALLOWLIST_KEY, BLOCKLIST_KEY, FORCELIST_KEY};
use std::{env, io};

/// Chrome policy key under `HKEY_LOCAL_MACHINE`.
pub const CHROME_POLICY_KEY: &str = r"SOFTWARE\Policies\Google\Chrome";

/// Value of [`PolicyTarget::location`] for [`RegistryTarget`].
pub const REGISTRY_LOCATION: &str = r"HKLM\SOFTWARE\Policies\Google\Chrome";

/// Subkeys owned by crx under [`CHROME_POLICY_KEY`].
pub const POLICY_SUBKEYS: [&str; 3] = [FORCELIST_KEY, ALLOWLIST_KEY, BLOCKLIST_KEY];

/// Values to store under one subkey, as `(value name, data)`.
pub type SubkeyValues = Vec<(String, String)>;

/// Registry operations relative to [`CHROME_POLICY_KEY`].
pub trait RegistryBackend {
    /// Open the policy key, creating it when absent.
    fn create_policy_key(&self) -> io::Result<()>;

    /// Open the policy key, failing when absent.
    fn open_policy_key(&self) -> io::Result<()>;

    /// Delete `subkey` and everything below it.
    fn delete_subkey(&self, subkey: &str) -> io::Result<()>;

    /// Create `subkey` and set each string value on it.
    fn write_subkey(&self, subkey: &str, values: &[(String, String)]) -> io::Result<()>;
}

/// Lay the list policies of `document` out as registry subkeys.
///
/// Each non-empty list becomes one subkey whose values are named `"1"`, `"2"`, …
/// in list order. `ExtensionSettings` is not written to the registry.
pub fn registry_layout(document: &PolicyDocument) -> Vec<(&'static str, SubkeyValues)> {
    document
        .lists()
        .into_iter()
        .map(|(subkey, entries)| {
            let values = entries
                .iter()
                .enumerate()
                .map(|(index, entry)| ((index + 1).to_string(), entry.clone()))
                .collect();
            (subkey, values)
        })
        .collect()
}

/// Installs the policy into the Windows registry.
#[derive(Debug)]
pub struct RegistryTarget<Backend = SystemRegistry> {
    backend: Backend,
}

impl RegistryTarget {
    /// Target operating on the registry of this machine.
    pub fn system() -> Self {
        RegistryTarget::with_backend(SystemRegistry)
    }
}

impl<Backend: RegistryBackend> RegistryTarget<Backend> {
    pub fn with_backend(backend: Backend) -> Self {
        RegistryTarget { backend }
    }

    fn map_error(location: &str, error: io::Error) -> ApplyError {
        if error.kind() == io::ErrorKind::Unsupported {
            return ApplyError::UnsupportedPlatform { target: "registry", os: env::consts::OS };
        }
        ApplyError::from_io(location, error)
    }
}

impl<Backend: RegistryBackend> PolicyTarget for RegistryTarget<Backend> {
    fn apply(&self, document: &PolicyDocument) -> Result<(), ApplyError> {
        self.backend
            .create_policy_key()
            .map_err(|error| Self::map_error(REGISTRY_LOCATION, error))?;

        for (subkey, values) in registry_layout(document) {
            // Stale values must not survive a shorter list.
            if let Err(error) = self.backend.delete_subkey(subkey) {
                tracing::debug!(target: "crx::policy", ?subkey, ?error, "Nothing to delete");
            }
            let location = format!(r"{REGISTRY_LOCATION}\{subkey}");
            self.backend
                .write_subkey(subkey, &values)
                .map_err(|error| Self::map_error(&location, error))?;
            tracing::info!(target: "crx::policy", ?location, count = values.len(), "Wrote registry policy");
        }

        Ok(())
    }

    fn remove(&self) -> Result<(), ApplyError> {
        self.backend
            .open_policy_key()
            .map_err(|error| Self::map_error(REGISTRY_LOCATION, error))?;

        for subkey in POLICY_SUBKEYS {
            if let Err(error) = self.backend.delete_subkey(subkey) {
                tracing::debug!(target: "crx::policy", ?subkey, ?error, "Nothing to delete");
            }
        }
        Ok(())
    }

    fn location(&self) -> String {
        REGISTRY_LOCATION.to_string()
    }
}

/// [`RegistryBackend`] of the local machine.
///
/// Every operation fails with [`io::ErrorKind::Unsupported`] outside Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRegistry;

#[cfg(windows)]
impl RegistryBackend for SystemRegistry {
    fn create_policy_key(&self) -> io::Result<()> {
        winreg::RegKey::predef(winreg::enums::HKEY_LOCAL_MACHINE)
            .create_subkey_with_flags(CHROME_POLICY_KEY, winreg::enums::KEY_ALL_ACCESS)
            .map(drop)
    }

    fn open_policy_key(&self) -> io::Result<()> {
        winreg::RegKey::predef(winreg::enums::HKEY_LOCAL_MACHINE)
            .open_subkey_with_flags(CHROME_POLICY_KEY, winreg::enums::KEY_ALL_ACCESS)
            .map(drop)
    }

    fn delete_subkey(&self, subkey: &str) -> io::Result<()> {
        winreg::RegKey::predef(winreg::enums::HKEY_LOCAL_MACHINE)
            .open_subkey_with_flags(CHROME_POLICY_KEY, winreg::enums::KEY_ALL_ACCESS)?
            .delete_subkey_all(subkey)
    }

    fn write_subkey(&self, subkey: &str, values: &[(String, String)]) -> io::Result<()> {
        let path = format!(r"{CHROME_POLICY_KEY}\{subkey}");
        let (key, _) = winreg::RegKey::predef(winreg::enums::HKEY_LOCAL_MACHINE)
            .create_subkey_with_flags(path, winreg::enums::KEY_ALL_ACCESS)?;
        for (name, data) in values {
            key.set_value(name, data)?;
        }
        Ok(())
    }
}

#[cfg(not(windows))]
impl RegistryBackend for SystemRegistry {
    fn create_policy_key(&self) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn open_policy_key(&self) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn delete_subkey(&self, _: &str) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn write_subkey(&self, _: &str, _: &[(String, String)]) -> io::Result<()> {
        Err(io::ErrorKind::Unsupported.into())
    }
}
