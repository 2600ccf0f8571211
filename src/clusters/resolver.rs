use std::collections::BTreeMap;

use kube::api::{ApiResource, DynamicObject};
use kube::config::AuthInfo;
use kube::{Api, Client, Config, Resource};

use crate::clusters::descriptor::ClusterDescriptor;
use crate::errors::{AppError, AppResult};
use crate::kube::secret::SecretSource;
use crate::types::{AuthKind, ClusterName, ClusterRow, RestConfigKey};

pub const DEFAULT_SECRET_NAME: &str = "rest-config";

/// Everything needed to talk to one cluster: the resolved config and a client
/// built from it. The client serves both typed and dynamic APIs.
#[derive(Clone)]
pub struct ClusterClients {
    pub config: Config,
    pub client: Client,
}

impl ClusterClients {
    pub fn new(config: Config) -> AppResult<Self> {
        let client = Client::try_from(config.clone())?;
        Ok(Self { config, client })
    }

    /// Typed handle, namespaced when `namespace` is given.
    pub fn api<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    pub fn dynamic(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, resource),
            None => Api::all_with(self.client.clone(), resource),
        }
    }

    pub fn auth_kind(&self) -> AuthKind {
        auth_kind(&self.config.auth_info)
    }
}

fn auth_kind(auth: &AuthInfo) -> AuthKind {
    if auth.token.is_some() || auth.token_file.is_some() {
        AuthKind::Token
    } else if auth.client_certificate.is_some() || auth.client_certificate_data.is_some() {
        AuthKind::ClientCert
    } else if auth.username.is_some() {
        AuthKind::Basic
    } else if auth.exec.is_some() || auth.auth_provider.is_some() {
        AuthKind::Ambient
    } else {
        AuthKind::None
    }
}

pub struct PrimaryCluster {
    pub name: ClusterName,
    pub config: Config,
    pub client: Client,
}

#[derive(Clone, Debug)]
pub struct ResolveRequest {
    /// Namespace holding the rest-config secret.
    pub namespace: String,
    /// Namespace the primary cluster is restricted to; `None` for all.
    pub managed_namespace: Option<String>,
    pub secret_name: String,
}

impl ResolveRequest {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            managed_namespace: None,
            secret_name: DEFAULT_SECRET_NAME.to_string(),
        }
    }
}

/// Resolved clients keyed by cluster and namespace.
#[derive(Clone)]
pub struct ClusterClientSet {
    primary: RestConfigKey,
    clusters: BTreeMap<RestConfigKey, ClusterClients>,
}

impl ClusterClientSet {
    pub fn primary_key(&self) -> &RestConfigKey {
        &self.primary
    }

    pub fn primary(&self) -> &ClusterClients {
        // The primary key is inserted first and entries only ever replace values.
        &self.clusters[&self.primary]
    }

    pub fn get(&self, key: &RestConfigKey) -> Option<&ClusterClients> {
        self.clusters.get(key)
    }

    /// Exact namespace entry first, then the cluster-wide one.
    pub fn lookup(&self, cluster: &ClusterName, namespace: &str) -> Option<&ClusterClients> {
        let exact = RestConfigKey::new(cluster.clone(), Some(namespace));
        self.clusters
            .get(&exact)
            .or_else(|| self.clusters.get(&RestConfigKey::cluster_wide(cluster.clone())))
    }

    pub fn keys(&self) -> impl Iterator<Item = &RestConfigKey> {
        self.clusters.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RestConfigKey, &ClusterClients)> {
        self.clusters.iter()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn rows(&self) -> Vec<ClusterRow> {
        self.clusters
            .iter()
            .map(|(key, clients)| ClusterRow {
                key: key.to_string(),
                cluster: key.cluster.to_string(),
                namespace: key.namespace.clone(),
                server: clients.config.cluster_url.to_string(),
                auth: clients.auth_kind(),
                insecure: clients.config.accept_invalid_certs,
                primary: *key == self.primary,
            })
            .collect()
    }
}

/// Build clients for the primary cluster plus every cluster listed in the
/// rest-config secret. Any bad entry fails the whole resolution.
pub async fn resolve_clusters<S>(
    source: &S,
    primary: PrimaryCluster,
    request: &ResolveRequest,
) -> AppResult<ClusterClientSet>
where
    S: SecretSource + ?Sized,
{
    let primary_key = RestConfigKey::new(primary.name, request.managed_namespace.as_deref());

    let mut clusters = BTreeMap::new();
    clusters.insert(
        primary_key.clone(),
        ClusterClients {
            config: primary.config,
            client: primary.client,
        },
    );

    let data = source
        .get_secret_data(&request.namespace, &request.secret_name)
        .await
        .map_err(|e| AppError::Secret {
            name: request.secret_name.clone(),
            source: Box::new(e),
        })?;

    let Some(data) = data else {
        tracing::debug!(
            namespace = %request.namespace,
            secret = %request.secret_name,
            "no rest-config secret; using primary cluster only"
        );
        return Ok(ClusterClientSet {
            primary: primary_key,
            clusters,
        });
    };

    for (raw_key, bytes) in &data {
        let key = RestConfigKey::parse(raw_key)?;

        let descriptor = ClusterDescriptor::from_slice(&key, bytes)?;
        descriptor.validate(&key)?;

        let config = descriptor.to_kube_config(&key).await?;
        let clients = ClusterClients::new(config).map_err(|e| AppError::Client {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        if key == primary_key {
            tracing::warn!(cluster = %key, "secret entry replaces primary cluster config");
        }

        tracing::info!(
            cluster = %key,
            server = %clients.config.cluster_url,
            "resolved cluster"
        );

        clusters.insert(key, clients);
    }

    Ok(ClusterClientSet {
        primary: primary_key,
        clusters,
    })
}
