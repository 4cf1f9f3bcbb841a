pub mod _utils;
pub use _utils::*;

use crx_testing_utils::fs::read_file;
use pretty_assertions::assert_eq;
use text_block_macros::text_block_fnl;

#[test]
fn should_add_extension_to_config() {
    let (root, config_file, stdout) = exec_crx_success("extensions: []\n", ["add", "bitwarden"]);

    eprintln!("Stdout");
    assert_eq!(stdout, "Added extension: Bitwarden Password Manager (bitwarden)\n");

    eprintln!("Config lists the extension");
    let content = read_file(&config_file);
    assert!(content.contains("- bitwarden"), "{content}");

    drop(root); // cleanup
}

#[test]
fn should_not_duplicate_extension() {
    let config = text_block_fnl! {
        "extensions:"
        "- bitwarden"
    };
    let (root, config_file, stdout) = exec_crx_success(config, ["add", "bitwarden"]);

    assert_eq!(stdout, "Extension already exists: bitwarden\n");
    assert_eq!(read_file(&config_file), config);

    drop(root); // cleanup
}

#[test]
fn should_reject_unknown_extension() {
    let (root, config_file, output) =
        exec_crx_with_config("extensions: []\n", ["add", "does-not-exist"]);

    eprintln!("Exit status code");
    assert!(!output.status.success());

    eprintln!("Stderr");
    let stderr = stderr_of(&output);
    assert!(stderr.contains("does-not-exist"), "{stderr}");

    eprintln!("Config is untouched");
    assert_eq!(read_file(&config_file), "extensions: []\n");

    drop(root); // cleanup
}
