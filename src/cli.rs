use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::ColorMode;

#[derive(Debug, Parser)]
#[command(
    name = "kube-clusters",
    version,
    about = "Resolve Kubernetes clients for the primary cluster and every cluster in a rest-config secret"
)]
pub struct Cli {
    /// Name of the cluster this process runs against
    #[arg(long = "cluster-name", default_value = "primary")]
    pub cluster_name: String,

    /// Namespace holding the rest-config secret
    #[arg(short = 'n', long = "namespace", default_value = "default")]
    pub namespace: String,

    /// Namespace the primary cluster is restricted to (all namespaces if unset)
    #[arg(long = "managed-namespace")]
    pub managed_namespace: Option<String>,

    /// Name of the secret listing additional clusters
    #[arg(long = "secret-name", default_value = crate::clusters::DEFAULT_SECRET_NAME)]
    pub secret_name: String,

    /// Kubeconfig context for the primary cluster
    #[arg(long = "context")]
    pub context: Option<String>,

    /// Emit NDJSON rows
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// Color mode: auto (tty only), always, never
    #[arg(long = "color", value_enum, default_value_t = ColorModeArg::Auto)]
    pub color: ColorModeArg,

    /// Disable colors (overrides --color)
    #[arg(long = "no-color", default_value_t = false)]
    pub no_color: bool,

    /// Dev mode: stub primary cluster, secret read from --dev-secret
    #[arg(long = "dev", default_value_t = false)]
    pub dev: bool,

    /// Dev: path to a Secret manifest (JSON)
    #[arg(long = "dev-secret")]
    pub dev_secret: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ColorModeArg {
    Auto,
    Always,
    Never,
}

impl From<ColorModeArg> for ColorMode {
    fn from(v: ColorModeArg) -> Self {
        match v {
            ColorModeArg::Auto => ColorMode::Auto,
            ColorModeArg::Always => ColorMode::Always,
            ColorModeArg::Never => ColorMode::Never,
        }
    }
}
