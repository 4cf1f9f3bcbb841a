mod command;
mod document;
mod error;
mod generate;
mod json;
mod managed_file;
mod profile;
mod target;
mod windows_registry;

pub use command::{CommandOutcome, CommandRunner, SystemCommandRunner};
pub use document::{
    ExtensionSetting, ExtensionSettings, InstallPolicy, InstallationMode, PolicyDocument,
    ALLOWLIST_KEY, BLOCKLIST_KEY, CHROME_WEB_STORE_UPDATE_URL, FORCELIST_KEY, SETTINGS_KEY,
};
pub use error::ApplyError;
pub use generate::generate;
pub use json::{diff, to_json, write_json_to, PolicyDiff, POLICY_FILE_NAME};
pub use managed_file::{ManagedFileTarget, MANAGED_POLICY_DIR};
pub use profile::{
    render_profile, ProfileTarget, PROFILE_FILE_NAME, PROFILE_IDENTIFIER, PROFILE_LOCATION,
};
pub use target::{current_target, policy_location, PolicyTarget};
pub use windows_registry::{
    registry_layout, RegistryBackend, RegistryTarget, SubkeyValues, SystemRegistry,
    CHROME_POLICY_KEY, POLICY_SUBKEYS, REGISTRY_LOCATION,
};
