use crate::{parse_artifact, Artifact, Package, RegistryError, RegistryIndex};
use crx_cache::{Cache, Payload};
use crx_config::RegistryConfig;
use crx_network::ThrottledClient;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Host serving raw repository files.
pub const DEFAULT_HOST: &str = "https://raw.githubusercontent.com";

/// Package source backed by a registry repository served over HTTP.
///
/// Artifacts live at `<host>/<repo>/<ref>/<path>`. Raw response bodies are kept
/// in the [`Cache`] keyed by that URL, so a repeated lookup within the
/// freshness window never touches the network.
#[derive(Debug)]
pub struct RemoteSource {
    host: String,
    repo: String,
    reference: String,
    http_client: ThrottledClient,
    cache: Cache,
}

impl RemoteSource {
    pub fn new(repo: impl Into<String>, reference: impl Into<String>) -> Self {
        RemoteSource {
            host: DEFAULT_HOST.to_string(),
            repo: repo.into(),
            reference: reference.into(),
            http_client: ThrottledClient::default(),
            cache: Cache::new(),
        }
    }

    pub fn from_config(registry: &RegistryConfig) -> Self {
        RemoteSource::new(&registry.repo, registry.reference())
    }

    /// Serve artifacts from another host, such as a mirror.
    pub fn with_host(self, host: impl Into<String>) -> Self {
        let host = host.into().trim_end_matches('/').to_string();
        RemoteSource { host, ..self }
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn url(&self, artifact: &Artifact) -> String {
        let RemoteSource { host, repo, reference, .. } = self;
        format!("{host}/{repo}/{reference}/{path}", path = artifact.path())
    }

    async fn fetch(&self, artifact: &Artifact) -> Result<Payload, RegistryError> {
        let url = self.url(artifact);
        if let Some(payload) = self.cache.get(&url) {
            tracing::debug!(target: "crx::registry", ?url, "Cache hit");
            return Ok(payload);
        }

        tracing::info!(target: "crx::registry", ?url, "Fetch");
        let (status, body) = self
            .http_client
            .run_with_permit(|client| {
                let request = self.http_client.get(client, &url);
                async move {
                    let response = request.send().await?;
                    let status = response.status();
                    let body = response.bytes().await?;
                    Ok::<_, reqwest::Error>((status, body))
                }
            })
            .await
            .map_err(|error| RegistryError::Network { url: url.clone(), error })?;

        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound { artifact: artifact.clone(), location: url });
        }
        if status != StatusCode::OK {
            return Err(RegistryError::HttpStatus { url, status });
        }

        let payload = Payload::from(body.as_ref());
        self.cache.set(url, Payload::clone(&payload));
        Ok(payload)
    }

    async fn load<Value: DeserializeOwned>(
        &self,
        artifact: Artifact,
    ) -> Result<Value, RegistryError> {
        let payload = self.fetch(&artifact).await?;
        let location = self.url(&artifact);
        parse_artifact(artifact, location, &payload)
    }

    /// Fetch and parse `pkgs/<name>.yaml`.
    pub async fn resolve(&self, name: &str) -> Result<Package, RegistryError> {
        self.load(Artifact::Package(name.to_string())).await
    }

    /// Fetch and parse `registry.yaml`.
    pub async fn resolve_index(&self) -> Result<RegistryIndex, RegistryError> {
        self.load(Artifact::Index).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crx_testing_utils::registry::{BITWARDEN_YAML, SAMPLE_INDEX_YAML, UBLOCK_ORIGIN_YAML};
    use pretty_assertions::assert_eq;

    fn source_for(server: &mockito::Server) -> RemoteSource {
        RemoteSource::new("sivchari/crx-registry", "main").with_host(server.url())
    }

    #[test]
    fn url_layout() {
        let source = RemoteSource::new("sivchari/crx-registry", "v1");
        assert_eq!(
            source.url(&Artifact::Index),
            "https://raw.githubusercontent.com/sivchari/crx-registry/v1/registry.yaml",
        );
        assert_eq!(
            source.url(&Artifact::Package("bitwarden".to_string())),
            "https://raw.githubusercontent.com/sivchari/crx-registry/v1/pkgs/bitwarden.yaml",
        );

        let source = source.with_host("https://mirror.example.com/raw/");
        assert_eq!(
            source.url(&Artifact::Index),
            "https://mirror.example.com/raw/sivchari/crx-registry/v1/registry.yaml",
        );
    }

    #[test]
    fn built_from_config_defaults_to_main() {
        let config = RegistryConfig {
            kind: "github".to_string(),
            repo: "acme/extensions".to_string(),
            reference: None,
        };
        let source = RemoteSource::from_config(&config);
        assert_eq!(source.repo(), "acme/extensions");
        assert_eq!(source.reference(), "main");
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sivchari/crx-registry/main/pkgs/ublock-origin.yaml")
            .with_status(200)
            .with_body(UBLOCK_ORIGIN_YAML)
            .expect(1)
            .create_async()
            .await;

        let source = source_for(&server);
        let first = source.resolve("ublock-origin").await.unwrap();
        let second = source.resolve("ublock-origin").await.unwrap();

        mock.assert_async().await;
        assert_eq!(first, second);
        assert_eq!(first.id, "cjpalhdlnbpafiamejdnhcphjbkeiagm");
        assert_eq!(source.cache().len(), 1);
    }

    #[tokio::test]
    async fn index_goes_through_the_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sivchari/crx-registry/main/registry.yaml")
            .with_body(SAMPLE_INDEX_YAML)
            .expect(1)
            .create_async()
            .await;

        let source = source_for(&server);
        source.resolve_index().await.unwrap();
        let index = source.resolve_index().await.unwrap();

        mock.assert_async().await;
        assert_eq!(index.packages, ["ublock-origin", "bitwarden", "dark-reader"]);
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sivchari/crx-registry/main/pkgs/nonexistent.yaml")
            .with_status(404)
            .with_body("404: Not Found")
            .create_async()
            .await;

        let source = source_for(&server);
        let error = source.resolve("nonexistent").await.unwrap_err();
        dbg!(&error);
        assert!(error.is_not_found());
        assert!(source.cache().is_empty());
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sivchari/crx-registry/main/pkgs/bitwarden.yaml")
            .with_status(500)
            .create_async()
            .await;

        let error = source_for(&server).resolve("bitwarden").await.unwrap_err();
        dbg!(&error);
        assert!(matches!(
            error,
            RegistryError::HttpStatus { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn only_ok_status_is_accepted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sivchari/crx-registry/main/pkgs/bitwarden.yaml")
            .with_status(203)
            .with_body(BITWARDEN_YAML)
            .create_async()
            .await;

        let source = source_for(&server);
        let error = source.resolve("bitwarden").await.unwrap_err();
        dbg!(&error);
        assert!(matches!(
            error,
            RegistryError::HttpStatus { status, .. } if status == StatusCode::NON_AUTHORITATIVE_INFORMATION
        ));
        assert!(source.cache().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sivchari/crx-registry/main/pkgs/bitwarden.yaml")
            .with_body(&BITWARDEN_YAML[..20])
            .create_async()
            .await;

        let error = source_for(&server).resolve("bitwarden").await.unwrap_err();
        dbg!(&error);
        assert!(matches!(error, RegistryError::Parse { .. }));
    }
}
