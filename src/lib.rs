pub mod cli;
pub mod clusters;
pub mod config;
pub mod errors;
pub mod kube;
pub mod logging;
pub mod report;
pub mod types;

use crate::clusters::{resolve_clusters, ClusterClientSet, PrimaryCluster};
use crate::config::{Config, Source};
use crate::errors::AppResult;
use crate::kube::secret::{ManifestSecretSource, SecretData, SecretSource};

pub async fn run(config: Config) -> AppResult<()> {
    let set = resolve(&config).await?;

    tracing::info!(
        primary = %set.primary_key(),
        clusters = set.len(),
        "resolved cluster clients"
    );

    crate::report::output::write_rows(&set.rows(), &config.output)?;
    Ok(())
}

/// Resolve clients for the configured source without printing anything.
pub async fn resolve(config: &Config) -> AppResult<ClusterClientSet> {
    match &config.source {
        Source::Cluster { context } => {
            let (kube_config, client) = crate::kube::client::make_client(context.as_deref()).await?;
            let primary = PrimaryCluster {
                name: config.cluster_name.clone(),
                config: kube_config,
                client: client.clone(),
            };
            resolve_clusters(&client, primary, &config.request).await
        }
        Source::Dev { secret } => {
            tracing::info!("dev mode: stub primary at {}", crate::kube::client::DEV_SERVER);
            let (kube_config, client) = crate::kube::client::dev_primary()?;
            let primary = PrimaryCluster {
                name: config.cluster_name.clone(),
                config: kube_config,
                client,
            };
            match secret {
                Some(path) => {
                    resolve_clusters(&ManifestSecretSource::new(path), primary, &config.request)
                        .await
                }
                None => resolve_clusters(&NoSecret, primary, &config.request).await,
            }
        }
    }
}

struct NoSecret;

#[async_trait::async_trait]
impl SecretSource for NoSecret {
    async fn get_secret_data(&self, _: &str, _: &str) -> AppResult<Option<SecretData>> {
        Ok(None)
    }
}
