use std::path::PathBuf;

use crate::cli::Cli;
use crate::clusters::ResolveRequest;
use crate::errors::{AppError, AppResult};
use crate::types::{ClusterName, ColorMode, OutputConfig, OutputMode};

#[derive(Clone, Debug)]
pub enum Source {
    /// Kubeconfig / in-cluster primary, secret read from the API server.
    Cluster { context: Option<String> },
    /// Stub primary, secret read from a manifest file (or absent).
    Dev { secret: Option<PathBuf> },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub cluster_name: ClusterName,
    pub request: ResolveRequest,
    pub source: Source,
    pub output: OutputConfig,
}

impl TryFrom<Cli> for Config {
    type Error = AppError;

    fn try_from(cli: Cli) -> AppResult<Self> {
        let cluster_name = ClusterName::new(cli.cluster_name)
            .map_err(|e| AppError::Cli(format!("--cluster-name: {e}")))?;

        if cli.namespace.is_empty() {
            return Err(AppError::Cli("--namespace must not be empty".to_string()));
        }
        if cli.secret_name.is_empty() {
            return Err(AppError::Cli("--secret-name must not be empty".to_string()));
        }

        let source = match (cli.dev, cli.dev_secret) {
            (true, _) if cli.context.is_some() => {
                return Err(AppError::Cli("--context cannot be used with --dev".to_string()));
            }
            (true, secret) => Source::Dev { secret },
            (false, Some(_)) => {
                return Err(AppError::Cli("--dev-secret requires --dev".to_string()));
            }
            (false, None) => Source::Cluster {
                context: cli.context,
            },
        };

        let mode = if cli.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let color = if cli.no_color {
            ColorMode::Never
        } else {
            cli.color.into()
        };

        let request = ResolveRequest {
            namespace: cli.namespace,
            managed_namespace: cli.managed_namespace.filter(|ns| !ns.is_empty()),
            secret_name: cli.secret_name,
        };

        Ok(Self {
            cluster_name,
            request,
            source,
            output: OutputConfig { mode, color },
        })
    }
}
