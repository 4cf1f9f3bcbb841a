use crate::{
    ApplyError, ManagedFileTarget, PolicyDocument, ProfileTarget, RegistryTarget, PROFILE_LOCATION,
    REGISTRY_LOCATION,
};
use std::env;

/// Where and how a policy document is installed on a platform.
pub trait PolicyTarget {
    /// Encode `document` and install it.
    fn apply(&self, document: &PolicyDocument) -> Result<(), ApplyError>;

    /// Uninstall whatever [`PolicyTarget::apply`] installed.
    fn remove(&self) -> Result<(), ApplyError>;

    /// Human readable description of where the policy ends up.
    fn location(&self) -> String;
}

/// The policy target of the running platform.
pub fn current_target() -> Result<Box<dyn PolicyTarget>, ApplyError> {
    match env::consts::OS {
        "macos" => Ok(Box::new(ProfileTarget::on_desktop()?)),
        "linux" => Ok(Box::new(ManagedFileTarget::default())),
        "windows" => Ok(Box::new(RegistryTarget::system())),
        os => Err(ApplyError::UnsupportedPlatform { target: "browser policy", os }),
    }
}

/// Where the running platform's target writes, or an empty string on other platforms.
pub fn policy_location() -> String {
    match env::consts::OS {
        "macos" => PROFILE_LOCATION.to_string(),
        "linux" => ManagedFileTarget::default().location(),
        "windows" => REGISTRY_LOCATION.to_string(),
        _ => String::new(),
    }
}
