pub mod descriptor;
pub mod resolver;

pub use resolver::{
    resolve_clusters, ClusterClientSet, ClusterClients, PrimaryCluster, ResolveRequest,
    DEFAULT_SECRET_NAME,
};
