use std::sync::Arc;

use imagesift::config::Configuration;
use imagesift::error::AppError;
use imagesift::pipeline::AnalysisPipeline;
use imagesift::providers::{LabelProvider, SearchProvider, UnsplashClient, VisionClient};
use imagesift::server::{AppState, Server};
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let configuration = Configuration::from_env()?;

    let search: Arc<dyn SearchProvider> = Arc::new(UnsplashClient::new(
        configuration.unsplash_access_key.clone(),
    ));
    let labels: Arc<dyn LabelProvider> =
        Arc::new(VisionClient::new(configuration.vision_api_key.clone()));

    let pipeline = AnalysisPipeline::builder()
        .search_provider(search.clone())
        .label_provider(labels.clone())
        .search_limit(configuration.search_limit)
        .lookup_timeout(configuration.lookup_timeout)
        .build()?;

    let state = AppState {
        pipeline: Arc::new(pipeline),
        search,
        labels,
    };

    let mut server = Server::new(configuration.bind_addr.clone(), state);
    server.start().await
}
