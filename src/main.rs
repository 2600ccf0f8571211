use kube_clusters::{cli::Cli, config::Config, errors::AppResult};

#[tokio::main]
async fn main() -> AppResult<()> {
    kube_clusters::logging::init();

    let cli = <Cli as clap::Parser>::parse();
    let config = Config::try_from(cli)?;

    kube_clusters::run(config).await
}
