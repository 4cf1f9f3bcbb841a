use crate::{
    command::display_command, ApplyError, CommandRunner, PolicyDocument, PolicyTarget,
    SystemCommandRunner,
};
use std::{
    ffi::OsStr,
    fmt::Write,
    fs,
    path::{Path, PathBuf},
};

/// `PayloadIdentifier` of the configuration profile.
pub const PROFILE_IDENTIFIER: &str = "com.crx.chrome.extensions";

/// File name of the generated profile.
pub const PROFILE_FILE_NAME: &str = "crx-chrome-policy.mobileconfig";

/// Value of [`PolicyTarget::location`] for [`ProfileTarget`].
pub const PROFILE_LOCATION: &str = "Configuration Profile (com.crx.chrome.extensions)";

/// Installs the policy as a macOS configuration profile.
///
/// Profiles can't be installed silently, so the profile is written to a file
/// and handed to `open`, leaving the final approval to the user.
#[derive(Debug)]
pub struct ProfileTarget<Runner = SystemCommandRunner> {
    profile_file: PathBuf,
    runner: Runner,
}

impl ProfileTarget {
    /// Target writing `~/Desktop/crx-chrome-policy.mobileconfig`.
    pub fn on_desktop() -> Result<Self, ApplyError> {
        let home = home::home_dir().ok_or(ApplyError::HomeDirNotFound)?;
        let profile_file = home.join("Desktop").join(PROFILE_FILE_NAME);
        Ok(ProfileTarget::with_runner(profile_file, SystemCommandRunner))
    }
}

impl<Runner: CommandRunner> ProfileTarget<Runner> {
    pub fn with_runner(profile_file: PathBuf, runner: Runner) -> Self {
        ProfileTarget { profile_file, runner }
    }

    pub fn profile_file(&self) -> &Path {
        &self.profile_file
    }

    fn run(&self, program: &str, args: &[&OsStr]) -> Result<(), ApplyError> {
        let command = display_command(program, args);
        let outcome = self
            .runner
            .run(program, args)
            .map_err(|error| ApplyError::Launch { command: command.clone(), error })?;
        if !outcome.success {
            return Err(ApplyError::CommandFailed { command, output: outcome.output });
        }
        Ok(())
    }
}

impl<Runner: CommandRunner> PolicyTarget for ProfileTarget<Runner> {
    fn apply(&self, document: &PolicyDocument) -> Result<(), ApplyError> {
        let profile = render_profile(document);
        let path = &self.profile_file;
        fs::write(path, profile)
            .map_err(|error| ApplyError::from_io(path.display().to_string(), error))?;
        tracing::info!(target: "crx::policy", ?path, "Wrote configuration profile");

        self.run("open", &[path.as_os_str()])
    }

    fn remove(&self) -> Result<(), ApplyError> {
        let args = ["-R", "-p", PROFILE_IDENTIFIER].map(OsStr::new);
        self.run("profiles", &args)?;
        tracing::info!(target: "crx::policy", identifier = PROFILE_IDENTIFIER, "Removed configuration profile");
        Ok(())
    }

    fn location(&self) -> String {
        PROFILE_LOCATION.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for char in text.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(char),
        }
    }
    escaped
}

/// Render the configuration profile carrying the list policies of `document`.
///
/// `ExtensionSettings` has no representation in the profile.
pub fn render_profile(document: &PolicyDocument) -> String {
    const INDENT: &str = "\t\t\t\t\t\t\t\t";
    let mut preferences = String::new();
    for (key, entries) in document.lists() {
        // Writing into a String cannot fail.
        let _ = writeln!(preferences, "{INDENT}<key>{key}</key>\n{INDENT}<array>");
        for entry in entries {
            let _ = writeln!(preferences, "{INDENT}\t<string>{}</string>", escape_xml(entry));
        }
        let _ = writeln!(preferences, "{INDENT}</array>");
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>PayloadContent</key>
	<array>
		<dict>
			<key>PayloadContent</key>
			<dict>
				<key>com.google.Chrome</key>
				<dict>
					<key>Forced</key>
					<array>
						<dict>
							<key>mcx_preference_settings</key>
							<dict>
{preferences}							</dict>
						</dict>
					</array>
				</dict>
			</dict>
			<key>PayloadEnabled</key>
			<true/>
			<key>PayloadIdentifier</key>
			<string>{PROFILE_IDENTIFIER}.inner</string>
			<key>PayloadType</key>
			<string>com.apple.ManagedClient.preferences</string>
			<key>PayloadUUID</key>
			<string>A8B8E6D0-1234-5678-9ABC-DEF012345678</string>
			<key>PayloadVersion</key>
			<integer>1</integer>
		</dict>
	</array>
	<key>PayloadDescription</key>
	<string>Chrome Extension Policy managed by crx</string>
	<key>PayloadDisplayName</key>
	<string>crx Chrome Extensions</string>
	<key>PayloadIdentifier</key>
	<string>{PROFILE_IDENTIFIER}</string>
	<key>PayloadOrganization</key>
	<string>crx</string>
	<key>PayloadRemovalDisallowed</key>
	<false/>
	<key>PayloadScope</key>
	<string>System</string>
	<key>PayloadType</key>
	<string>Configuration</string>
	<key>PayloadUUID</key>
	<string>B9C9F7E1-2345-6789-ABCD-EF0123456789</string>
	<key>PayloadVersion</key>
	<integer>1</integer>
</dict>
</plist>
"#
    )
}
