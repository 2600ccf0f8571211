use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client, ResourceExt};

use crate::errors::AppResult;

pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Where the rest-config secret comes from. `Ok(None)` means the secret does not exist.
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn get_secret_data(&self, namespace: &str, name: &str) -> AppResult<Option<SecretData>>;
}

#[async_trait]
impl SecretSource for Client {
    async fn get_secret_data(&self, namespace: &str, name: &str) -> AppResult<Option<SecretData>> {
        let api: Api<Secret> = Api::namespaced(self.clone(), namespace);

        let secret = api.get_opt(name).await?;

        Ok(secret.map(secret_data))
    }
}

/// Dev-mode source: a Secret manifest (JSON) on disk.
pub struct ManifestSecretSource {
    path: PathBuf,
}

impl ManifestSecretSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SecretSource for ManifestSecretSource {
    async fn get_secret_data(&self, namespace: &str, name: &str) -> AppResult<Option<SecretData>> {
        let raw = tokio::fs::read(&self.path).await?;
        let secret: Secret = serde_json::from_slice(&raw)?;

        let name_matches = secret.metadata.name.as_deref().is_none_or(|n| n == name);
        let ns_matches = secret.namespace().is_none_or(|ns| ns == namespace);
        if !name_matches || !ns_matches {
            tracing::debug!(
                path = %self.path.display(),
                manifest = %secret.name_any(),
                "manifest does not match requested secret"
            );
            return Ok(None);
        }

        Ok(Some(secret_data(secret)))
    }
}

/// `stringData` wins over `data` for the same key, as the API server applies it.
fn secret_data(secret: Secret) -> SecretData {
    let mut out: SecretData = secret
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.0))
        .collect();

    for (k, v) in secret.string_data.unwrap_or_default() {
        out.insert(k, v.into_bytes());
    }

    out
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn manifest(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_base64_data_and_string_data() {
        // "e30=" is base64 for "{}"
        let file = manifest(
            r#"{
                "apiVersion": "v1",
                "kind": "Secret",
                "metadata": {"name": "rest-config", "namespace": "argo"},
                "data": {"east": "e30=", "west": "e30="},
                "stringData": {"west": "{\"host\":\"https://west\"}"}
            }"#,
        );
        let source = ManifestSecretSource::new(file.path());

        let data = source
            .get_secret_data("argo", "rest-config")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data["east"], b"{}");
        assert_eq!(data["west"], br#"{"host":"https://west"}"#);
    }

    #[tokio::test]
    async fn mismatched_name_or_namespace_is_not_found() {
        let file = manifest(
            r#"{"apiVersion": "v1", "kind": "Secret",
                "metadata": {"name": "rest-config", "namespace": "argo"}}"#,
        );
        let source = ManifestSecretSource::new(file.path());

        assert!(source.get_secret_data("argo", "other").await.unwrap().is_none());
        assert!(source.get_secret_data("default", "rest-config").await.unwrap().is_none());
        let empty = source.get_secret_data("argo", "rest-config").await.unwrap();
        assert_eq!(empty, Some(SecretData::new()));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = ManifestSecretSource::new("/nonexistent/rest-config.json");
        let err = source.get_secret_data("argo", "rest-config").await.unwrap_err();
        assert!(matches!(err, crate::errors::AppError::Io(_)));
    }
}
