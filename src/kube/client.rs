use kube::config::KubeConfigOptions;
use kube::{Client, Config};

use crate::errors::{AppError, AppResult};

pub const DEV_SERVER: &str = "http://127.0.0.1:6443";

/// Config and client for the cluster we run in (or the kubeconfig context we were given).
pub async fn make_client(context: Option<&str>) -> AppResult<(Config, Client)> {
    let config = match context {
        Some(ctx) => {
            tracing::debug!(context = %ctx, "using kubeconfig context");
            let options = KubeConfigOptions {
                context: Some(ctx.to_string()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .map_err(|e| AppError::PrimaryConfig(format!("kubeconfig context '{ctx}': {e}")))?
        }
        None => Config::infer()
            .await
            .map_err(|e| AppError::PrimaryConfig(format!("infer: {e}")))?,
    };

    let client = Client::try_from(config.clone())?;
    Ok((config, client))
}

/// Primary stub for dev mode. Building the client does not connect.
pub fn dev_primary() -> AppResult<(Config, Client)> {
    let url = DEV_SERVER
        .parse()
        .map_err(|e| AppError::PrimaryConfig(format!("invalid dev server url: {e}")))?;
    let config = Config::new(url);
    let client = Client::try_from(config.clone())?;
    Ok((config, client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_context_is_a_primary_config_error() {
        let err = make_client(Some("kube-clusters-no-such-context"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::PrimaryConfig(_)));
        assert!(err
            .to_string()
            .starts_with("failed to load primary cluster config: kubeconfig context"));
    }

    #[tokio::test]
    async fn dev_primary_points_at_local_stub() {
        let (config, _client) = dev_primary().unwrap();
        assert_eq!(config.cluster_url.host(), Some("127.0.0.1"));
        assert_eq!(config.cluster_url.port_u16(), Some(6443));
    }
}
