use crate::{
    ExtensionSetting, ExtensionSettings, InstallPolicy, InstallationMode, PolicyDocument,
    CHROME_WEB_STORE_UPDATE_URL,
};
use crx_config::InstallMode;
use crx_registry::Package;
use pipe_trait::Pipe;

/// Build the policy document installing `packages` with `mode`.
///
/// Entries follow the order of `packages`. An empty package list yields an
/// empty document whatever the mode.
pub fn generate(mode: InstallMode, packages: &[Package]) -> PolicyDocument {
    let ids = packages.iter().map(|package| package.id.as_str());
    let install = match mode {
        _ if packages.is_empty() => InstallPolicy::Empty,
        InstallMode::ForceInstall => ids
            .map(|id| format!("{id};{CHROME_WEB_STORE_UPDATE_URL}"))
            .collect::<Vec<_>>()
            .pipe(InstallPolicy::Forcelist),
        InstallMode::Allowed => {
            ids.map(str::to_string).collect::<Vec<_>>().pipe(InstallPolicy::Allowlist)
        }
        InstallMode::NormalInstall => {
            let mut settings = ExtensionSettings::default();
            for id in ids {
                let setting = ExtensionSetting {
                    installation_mode: InstallationMode::NormalInstalled,
                    update_url: CHROME_WEB_STORE_UPDATE_URL.to_string(),
                };
                settings.insert(id, setting);
            }
            InstallPolicy::Settings(settings)
        }
    };

    tracing::debug!(target: "crx::policy", mode = mode.as_str(), count = packages.len(), "Generated policy");
    PolicyDocument { install, blocklist: Vec::new() }
}
