use crate::fs::write_file;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use text_block_macros::text_block_fnl;

pub const SAMPLE_INDEX_YAML: &str = text_block_fnl! {
    "version: 1"
    "packages:"
    "  - ublock-origin"
    "  - bitwarden"
    "  - dark-reader"
};

pub const UBLOCK_ORIGIN_YAML: &str = text_block_fnl! {
    "name: ublock-origin"
    "id: cjpalhdlnbpafiamejdnhcphjbkeiagm"
    "display_name: uBlock Origin"
    "description: An efficient wide-spectrum content blocker."
    "homepage: https://ublockorigin.com"
    "repository: https://github.com/gorhill/uBlock"
    "tags:"
    "  - adblock"
    "  - privacy"
};

pub const BITWARDEN_YAML: &str = text_block_fnl! {
    "name: bitwarden"
    "id: nngceckbapebfimnlniiiahkandclblb"
    "display_name: Bitwarden Password Manager"
    "homepage: https://bitwarden.com"
    "tags:"
    "  - security"
};

pub const DARK_READER_YAML: &str = text_block_fnl! {
    "name: dark-reader"
    "id: eimadpbcbfnmbkopoojfekhnkhdbieeh"
    "display_name: Dark Reader"
    "tags:"
    "  - theme"
    "  - accessibility"
};

/// Lay out the sample registry (ublock-origin, bitwarden, dark-reader) under `dir`.
pub fn write_sample_registry(dir: &Path) {
    write_file(&dir.join("registry.yaml"), SAMPLE_INDEX_YAML);
    let packages = [
        ("ublock-origin", UBLOCK_ORIGIN_YAML),
        ("bitwarden", BITWARDEN_YAML),
        ("dark-reader", DARK_READER_YAML),
    ];
    for (name, content) in packages {
        write_file(&dir.join("pkgs").join(format!("{name}.yaml")), content);
    }
}

/// A registry directory living in a temporary directory.
pub struct RegistryFixture {
    root: TempDir,
}

impl RegistryFixture {
    /// A registry without an index or any package.
    pub fn empty() -> Self {
        RegistryFixture { root: tempdir().expect("create temporary directory") }
    }

    /// A registry listing ublock-origin, bitwarden and dark-reader.
    pub fn sample() -> Self {
        let fixture = RegistryFixture::empty();
        write_sample_registry(fixture.path());
        fixture
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn write_index(&self, names: &[&str]) {
        let mut content = String::from("version: 1\npackages:\n");
        for name in names {
            content.push_str(&format!("  - {name}\n"));
        }
        write_file(&self.path().join("registry.yaml"), content);
    }

    pub fn write_package(&self, name: &str, content: &str) {
        write_file(&self.path().join("pkgs").join(format!("{name}.yaml")), content);
    }
}
