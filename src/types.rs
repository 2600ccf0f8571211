use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::AppError;

const MAX_LABEL_LEN: usize = 63;

/// Cluster identity. Always a valid DNS-1123 label.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ClusterName(String);

impl ClusterName {
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        check_label(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map key for resolved clients: cluster plus namespace.
///
/// `namespace: None` covers every namespace of the cluster. The text form is
/// `<cluster>` or `<cluster>.<namespace>`, which stays inside the character
/// set Kubernetes allows for secret data keys.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RestConfigKey {
    pub cluster: ClusterName,
    pub namespace: Option<String>,
}

impl RestConfigKey {
    pub fn new(cluster: ClusterName, namespace: Option<&str>) -> Self {
        let namespace = namespace.filter(|ns| !ns.is_empty()).map(str::to_string);
        Self { cluster, namespace }
    }

    pub fn cluster_wide(cluster: ClusterName) -> Self {
        Self {
            cluster,
            namespace: None,
        }
    }

    pub fn parse(text: &str) -> Result<Self, AppError> {
        let key_err = |reason: String| AppError::Key {
            key: text.to_string(),
            reason,
        };

        let mut parts = text.split('.');
        let cluster = parts.next().unwrap_or_default();
        let namespace = parts.next();
        if parts.next().is_some() {
            return Err(key_err(
                "expected <cluster> or <cluster>.<namespace>".to_string(),
            ));
        }

        let cluster = ClusterName::new(cluster).map_err(|e| key_err(format!("cluster: {e}")))?;

        if let Some(ns) = namespace {
            check_label(ns).map_err(|e| key_err(format!("namespace: {e}")))?;
        }

        Ok(Self::new(cluster, namespace))
    }

    pub fn is_cluster_wide(&self) -> bool {
        self.namespace.is_none()
    }
}

impl FromStr for RestConfigKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RestConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", self.cluster, ns),
            None => write!(f, "{}", self.cluster),
        }
    }
}

fn check_label(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("must not be empty".to_string());
    }
    if s.len() > MAX_LABEL_LEN {
        return Err(format!("longer than {MAX_LABEL_LEN} characters"));
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(format!("invalid character {c:?}"));
    }
    if s.starts_with('-') || s.ends_with('-') {
        return Err("must start and end with an alphanumeric character".to_string());
    }
    Ok(())
}

/// How a cluster authenticates, for reporting.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthKind {
    Token,
    Basic,
    ClientCert,
    Ambient,
    None,
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthKind::Token => "token",
            AuthKind::Basic => "basic",
            AuthKind::ClientCert => "client-cert",
            AuthKind::Ambient => "ambient",
            AuthKind::None => "none",
        };
        f.write_str(s)
    }
}

/// One line of the cluster report.
#[derive(Clone, Debug, Serialize)]
pub struct ClusterRow {
    pub key: String,
    pub cluster: String,
    pub namespace: Option<String>,
    pub server: String,
    pub auth: AuthKind,
    pub insecure: bool,
    pub primary: bool,
}

#[derive(Clone, Copy, Debug)]
pub enum OutputMode {
    Human,
    Json,
}

#[derive(Clone, Copy, Debug)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, Debug)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub color: ColorMode,
}
