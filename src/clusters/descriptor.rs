//! Connection descriptor stored per cluster in the rest-config secret.

use std::time::Duration;

use kube::config::{KubeConfigOptions, Kubeconfig};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::errors::{AppError, AppResult};
use crate::types::RestConfigKey;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDescriptor {
    pub host: String,
    pub api_path: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,
    pub bearer_token: Option<String>,
    pub bearer_token_file: Option<String>,

    #[serde(default)]
    pub tls_client_config: TlsClientConfig,

    pub impersonate: Option<Impersonate>,

    #[serde(rename = "proxyURL")]
    pub proxy_url: Option<String>,

    pub timeout_seconds: Option<u64>,
}

/// PEM material is carried base64 encoded, as kubeconfig does.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsClientConfig {
    #[serde(default)]
    pub insecure: bool,
    pub server_name: Option<String>,
    pub ca_data: Option<String>,
    pub cert_data: Option<String>,
    pub key_data: Option<String>,
    pub ca_file: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impersonate {
    pub user_name: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl ClusterDescriptor {
    pub fn from_slice(key: &RestConfigKey, data: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(data).map_err(|source| AppError::Descriptor {
            key: key.to_string(),
            source,
        })
    }

    pub fn validate(&self, key: &RestConfigKey) -> AppResult<()> {
        let invalid = |reason: &str| AppError::InvalidDescriptor {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if self.host.trim().is_empty() {
            return Err(invalid("host must not be empty"));
        }

        let tls = &self.tls_client_config;
        let has_cert = tls.cert_data.is_some() || tls.cert_file.is_some();
        let has_key = tls.key_data.is_some() || tls.key_file.is_some();
        if has_cert != has_key {
            return Err(invalid(
                "client certificate and client key must be set together",
            ));
        }

        if self.username.is_some() && self.password.is_none() {
            return Err(invalid("username requires a password"));
        }

        if let Some(imp) = &self.impersonate {
            if imp.user_name.is_empty() {
                return Err(invalid("impersonate.userName must not be empty"));
            }
        }

        Ok(())
    }

    pub fn server_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        match self.api_path.as_deref().map(|p| p.trim_matches('/')) {
            Some(path) if !path.is_empty() => format!("{host}/{path}"),
            _ => host.to_string(),
        }
    }

    /// Single-context kubeconfig whose cluster, user and context are all named `name`.
    pub fn to_kubeconfig(&self, name: &str) -> AppResult<Kubeconfig> {
        let tls = &self.tls_client_config;

        let mut cluster = Map::new();
        cluster.insert("server".into(), json!(self.server_url()));
        if tls.insecure {
            cluster.insert("insecure-skip-tls-verify".into(), json!(true));
        }
        insert_opt(&mut cluster, "certificate-authority-data", &tls.ca_data);
        insert_opt(&mut cluster, "certificate-authority", &tls.ca_file);
        insert_opt(&mut cluster, "tls-server-name", &tls.server_name);
        insert_opt(&mut cluster, "proxy-url", &self.proxy_url);

        let mut user = Map::new();
        insert_opt(&mut user, "token", &self.bearer_token);
        insert_opt(&mut user, "tokenFile", &self.bearer_token_file);
        insert_opt(&mut user, "username", &self.username);
        insert_opt(&mut user, "password", &self.password);
        insert_opt(&mut user, "client-certificate-data", &tls.cert_data);
        insert_opt(&mut user, "client-certificate", &tls.cert_file);
        insert_opt(&mut user, "client-key-data", &tls.key_data);
        insert_opt(&mut user, "client-key", &tls.key_file);
        if let Some(imp) = &self.impersonate {
            user.insert("as".into(), json!(imp.user_name));
            if !imp.groups.is_empty() {
                user.insert("as-groups".into(), json!(imp.groups));
            }
        }

        let doc = json!({
            "apiVersion": "v1",
            "kind": "Config",
            "clusters": [{ "name": name, "cluster": Value::Object(cluster) }],
            "users": [{ "name": name, "user": Value::Object(user) }],
            "contexts": [{ "name": name, "context": { "cluster": name, "user": name } }],
            "current-context": name,
        });

        Ok(serde_json::from_value(doc)?)
    }

    pub async fn to_kube_config(&self, key: &RestConfigKey) -> AppResult<kube::Config> {
        let name = key.to_string();
        let kubeconfig = self.to_kubeconfig(&name)?;

        let options = KubeConfigOptions {
            context: Some(name.clone()),
            ..Default::default()
        };

        let mut config = kube::Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .map_err(|e| AppError::Client {
                key: name,
                reason: e.to_string(),
            })?;

        if let Some(secs) = self.timeout_seconds {
            config.read_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn insert_opt(map: &mut Map<String, Value>, field: &str, value: &Option<String>) {
    if let Some(v) = value {
        map.insert(field.to_string(), json!(v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> RestConfigKey {
        RestConfigKey::parse("east.argo").unwrap()
    }

    fn decode(raw: &str) -> ClusterDescriptor {
        ClusterDescriptor::from_slice(&key(), raw.as_bytes()).unwrap()
    }

    #[test]
    fn decodes_camel_case_fields() {
        let d = decode(
            r#"{
                "host": "https://east.example:6443",
                "bearerToken": "abc",
                "tlsClientConfig": {"insecure": true, "serverName": "east"},
                "impersonate": {"userName": "argo", "groups": ["ops"]},
                "proxyURL": "http://proxy:3128",
                "timeoutSeconds": 30,
                "qps": 50
            }"#,
        );
        assert_eq!(d.host, "https://east.example:6443");
        assert_eq!(d.bearer_token.as_deref(), Some("abc"));
        assert!(d.tls_client_config.insecure);
        assert_eq!(d.tls_client_config.server_name.as_deref(), Some("east"));
        assert_eq!(d.impersonate.as_ref().unwrap().groups, ["ops"]);
        assert_eq!(d.proxy_url.as_deref(), Some("http://proxy:3128"));
        assert_eq!(d.timeout_seconds, Some(30));
        d.validate(&key()).unwrap();
    }

    #[test]
    fn bad_json_names_the_cluster() {
        let err = ClusterDescriptor::from_slice(&key(), b"{not json").unwrap_err();
        assert!(err
            .to_string()
            .starts_with("failed to unmarshal JSON for cluster east.argo"));
    }

    #[test]
    fn missing_host_fails_to_decode() {
        assert!(ClusterDescriptor::from_slice(&key(), b"{}").is_err());
    }

    #[test]
    fn validate_rejects_incomplete_credentials() {
        let blank = decode(r#"{"host": "  "}"#);
        assert!(blank.validate(&key()).is_err());

        let cert_only = decode(r#"{"host": "https://h", "tlsClientConfig": {"certData": "Y2VydA=="}}"#);
        assert!(cert_only.validate(&key()).is_err());

        let user_only = decode(r#"{"host": "https://h", "username": "admin"}"#);
        assert!(user_only.validate(&key()).is_err());

        let full = decode(
            r#"{"host": "https://h", "tlsClientConfig": {"certData": "Y2VydA==", "keyData": "a2V5"}}"#,
        );
        full.validate(&key()).unwrap();
    }

    #[test]
    fn server_url_joins_api_path() {
        let mut d = decode(r#"{"host": "https://h:6443/"}"#);
        assert_eq!(d.server_url(), "https://h:6443");

        d.api_path = Some("/k8s/clusters/c-1/".to_string());
        assert_eq!(d.server_url(), "https://h:6443/k8s/clusters/c-1");

        d.api_path = Some(String::new());
        assert_eq!(d.server_url(), "https://h:6443");
    }

    #[test]
    fn kubeconfig_carries_cluster_and_user() {
        let d = decode(
            r#"{
                "host": "https://h",
                "username": "admin",
                "password": "pw",
                "tlsClientConfig": {"insecure": true},
                "impersonate": {"userName": "argo"}
            }"#,
        );
        let kc = d.to_kubeconfig("east.argo").unwrap();

        assert_eq!(kc.current_context.as_deref(), Some("east.argo"));
        assert_eq!(kc.clusters.len(), 1);
        assert_eq!(kc.auth_infos.len(), 1);
        assert_eq!(kc.contexts.len(), 1);

        let cluster = kc.clusters[0].cluster.as_ref().unwrap();
        assert_eq!(cluster.server.as_deref(), Some("https://h"));
        assert_eq!(cluster.insecure_skip_tls_verify, Some(true));

        let user = kc.auth_infos[0].auth_info.as_ref().unwrap();
        assert_eq!(user.username.as_deref(), Some("admin"));
        assert_eq!(user.impersonate.as_deref(), Some("argo"));
    }

    #[tokio::test]
    async fn kube_config_applies_timeout() {
        let d = decode(r#"{"host": "http://127.0.0.1:8001", "bearerToken": "t", "timeoutSeconds": 7}"#);
        let config = d.to_kube_config(&key()).await.unwrap();

        assert_eq!(config.cluster_url.host(), Some("127.0.0.1"));
        assert_eq!(config.cluster_url.port_u16(), Some(8001));
        assert_eq!(config.read_timeout, Some(Duration::from_secs(7)));
        assert!(config.auth_info.token.is_some());
    }
}
