use crate::{
    LocalSource, Package, RegistryError, RegistryIndex, RemoteSource, ResolveAllError,
    SelectSourceError,
};
use crx_config::RegistryConfig;
use futures_util::future;
use std::path::Path;

/// The only registry `type` a config entry may name.
pub const SUPPORTED_REGISTRY_TYPE: &str = "github";

/// Where packages are resolved from.
#[derive(Debug)]
pub enum PackageSource {
    Local(LocalSource),
    Remote(RemoteSource),
}

impl PackageSource {
    /// Pick a source: an explicit local directory wins, otherwise the first
    /// configured registry is used.
    pub fn select(
        local_path: Option<&Path>,
        registries: &[RegistryConfig],
    ) -> Result<Self, SelectSourceError> {
        if let Some(base_dir) = local_path {
            tracing::debug!(target: "crx::registry", ?base_dir, "Use local registry");
            return Ok(PackageSource::Local(LocalSource::new(base_dir)));
        }

        let registry = registries.first().ok_or(SelectSourceError::NoRegistry)?;
        if registry.kind != SUPPORTED_REGISTRY_TYPE {
            return Err(SelectSourceError::UnsupportedType(registry.kind.clone()));
        }

        tracing::debug!(target: "crx::registry", repo = ?registry.repo, reference = ?registry.reference(), "Use remote registry");
        Ok(PackageSource::Remote(RemoteSource::from_config(registry)))
    }

    /// Human readable description of the source.
    pub fn location(&self) -> String {
        match self {
            PackageSource::Local(source) => source.base_dir().display().to_string(),
            PackageSource::Remote(source) => {
                format!("{}@{}", source.repo(), source.reference())
            }
        }
    }

    pub async fn resolve(&self, name: &str) -> Result<Package, RegistryError> {
        match self {
            PackageSource::Local(source) => source.resolve(name),
            PackageSource::Remote(source) => source.resolve(name).await,
        }
    }

    pub async fn resolve_index(&self) -> Result<RegistryIndex, RegistryError> {
        match self {
            PackageSource::Local(source) => source.resolve_index(),
            PackageSource::Remote(source) => source.resolve_index().await,
        }
    }

    /// Resolve every name concurrently.
    ///
    /// The result follows the order of `names`. If any lookup fails, no package
    /// is returned and the error is the failure that comes first in `names`.
    pub async fn resolve_many<Name: AsRef<str>>(
        &self,
        names: &[Name],
    ) -> Result<Vec<Package>, ResolveAllError> {
        let lookups = names.iter().map(|name| async move {
            let name = name.as_ref();
            self.resolve(name)
                .await
                .map_err(|error| ResolveAllError::Package { name: name.to_string(), error })
        });
        future::join_all(lookups).await.into_iter().collect()
    }

    /// Resolve the index, then every package it lists.
    pub async fn resolve_all(&self) -> Result<Vec<Package>, ResolveAllError> {
        let index = self.resolve_index().await.map_err(ResolveAllError::Index)?;
        tracing::info!(target: "crx::registry", count = index.packages.len(), "Resolve all packages");
        self.resolve_many(&index.packages).await
    }

    /// Packages matching `query`, in index order.
    pub async fn search(&self, query: &str) -> Result<Vec<Package>, ResolveAllError> {
        let mut packages = self.resolve_all().await?;
        packages.retain(|package| package.matches_query(query));
        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crx_testing_utils::{
        logs::LogCapture,
        registry::{RegistryFixture, UBLOCK_ORIGIN_YAML},
    };
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn github(repo: &str) -> RegistryConfig {
        RegistryConfig { kind: "github".to_string(), repo: repo.to_string(), reference: None }
    }

    fn names(packages: &[Package]) -> Vec<&str> {
        packages.iter().map(|package| package.name.as_str()).collect()
    }

    #[test]
    fn local_path_wins_over_registries() {
        let path = PathBuf::from("/tmp/registry");
        let source = PackageSource::select(Some(path.as_path()), &[github("acme/extensions")]).unwrap();
        assert!(matches!(source, PackageSource::Local(_)));
        assert_eq!(source.location(), "/tmp/registry");
    }

    #[test]
    fn first_registry_is_used() {
        let registries = [github("acme/extensions"), github("sivchari/crx-registry")];
        let source = PackageSource::select(None, &registries).unwrap();
        assert_eq!(source.location(), "acme/extensions@main");
    }

    #[test]
    fn no_source_is_configuration_error() {
        let error = PackageSource::select(None, &[]).unwrap_err();
        assert!(matches!(error, SelectSourceError::NoRegistry));
    }

    #[test]
    fn unsupported_registry_type() {
        let registry = RegistryConfig { kind: "gitlab".to_string(), ..github("acme/extensions") };
        let error = PackageSource::select(None, &[registry]).unwrap_err();
        assert_eq!(error.to_string(), r#"Unsupported registry type: "gitlab""#);
    }

    #[tokio::test]
    async fn resolve_all_follows_index_order() {
        let fixture = RegistryFixture::sample();
        let source = PackageSource::Local(LocalSource::new(fixture.path()));
        let packages = source.resolve_all().await.unwrap();
        assert_eq!(names(&packages), ["ublock-origin", "bitwarden", "dark-reader"]);
    }

    #[tokio::test]
    async fn resolve_all_names_the_failing_package() {
        let fixture = RegistryFixture::empty();
        fixture.write_index(&["a", "b", "c"]);
        fixture.write_package("a", "name: a\nid: aaaa\ndisplay_name: A\n");
        fixture.write_package("c", "name: c\nid: cccc\ndisplay_name: C\n");

        let source = PackageSource::Local(LocalSource::new(fixture.path()));
        let error = source.resolve_all().await.unwrap_err();
        dbg!(&error);
        assert_eq!(error.package_name(), Some("b"));
        assert!(matches!(error, ResolveAllError::Package { ref error, .. } if error.is_not_found()));
    }

    #[tokio::test]
    async fn earliest_failure_in_order_is_reported() {
        let fixture = RegistryFixture::empty();
        fixture.write_package("c", "name: c\nid: [\n");
        let source = PackageSource::Local(LocalSource::new(fixture.path()));
        let error = source.resolve_many(&["a", "b", "c"]).await.unwrap_err();
        assert_eq!(error.package_name(), Some("a"));
    }

    #[tokio::test]
    async fn resolve_many_keeps_requested_order() {
        let fixture = RegistryFixture::sample();
        let source = PackageSource::Local(LocalSource::new(fixture.path()));
        let packages = source.resolve_many(&["dark-reader", "ublock-origin"]).await.unwrap();
        assert_eq!(names(&packages), ["dark-reader", "ublock-origin"]);
    }

    #[tokio::test]
    async fn missing_index_fails_resolve_all() {
        let fixture = RegistryFixture::empty();
        let source = PackageSource::Local(LocalSource::new(fixture.path()));
        let error = source.resolve_all().await.unwrap_err();
        assert!(matches!(error, ResolveAllError::Index(ref error) if error.is_not_found()));
        assert_eq!(error.package_name(), None);
    }

    #[tokio::test]
    async fn search_matches_tags_case_insensitively() {
        let fixture = RegistryFixture::sample();
        let source = PackageSource::Local(LocalSource::new(fixture.path()));
        assert_eq!(names(&source.search("PRIVACY").await.unwrap()), ["ublock-origin"]);
        assert_eq!(names(&source.search("password").await.unwrap()), ["bitwarden"]);
        assert_eq!(names(&source.search("").await.unwrap()).len(), 3);
        assert!(source.search("no such thing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remote_resolve_all_fetches_index_and_packages() {
        let mut server = mockito::Server::new_async().await;
        let index = server
            .mock("GET", "/acme/extensions/main/registry.yaml")
            .with_body("version: 1\npackages:\n- ublock-origin\n")
            .create_async()
            .await;
        let package = server
            .mock("GET", "/acme/extensions/main/pkgs/ublock-origin.yaml")
            .with_body(UBLOCK_ORIGIN_YAML)
            .create_async()
            .await;

        let remote = RemoteSource::new("acme/extensions", "main").with_host(server.url());
        let source = PackageSource::Remote(remote);
        let packages = source.resolve_all().await.unwrap();

        index.assert_async().await;
        package.assert_async().await;
        assert_eq!(names(&packages), ["ublock-origin"]);
    }

    #[tokio::test]
    async fn fetches_are_logged() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/acme/extensions/main/pkgs/ublock-origin.yaml")
            .with_body(UBLOCK_ORIGIN_YAML)
            .create_async()
            .await;

        let logs = LogCapture::default();
        let _guard = logs.set_default();

        let remote = RemoteSource::new("acme/extensions", "main").with_host(server.url());
        let source = PackageSource::Remote(remote);
        source.resolve("ublock-origin").await.unwrap();
        source.resolve("ublock-origin").await.unwrap();

        let messages = logs.messages_of("crx::registry");
        assert_eq!(messages, ["Fetch", "Cache hit"]);
    }
}
