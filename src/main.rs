use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use warp::Filter;

use home_finder::config::Config;
use home_finder::extractor::AnthropicExtractor;
use home_finder::property::PropertySubmission;
use home_finder::property_store::PropertyStore;
use home_finder::search::SearchEngine;
use home_finder::warp_helpers::{cors, handle_rejection, with_search_engine, with_store};
use home_finder::{handlers_health, handlers_property, handlers_search};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::from_env()?;
    let port = config.port;

    info!("Starting HomeFinder server on port {}", port);
    info!("Property data file: {}", config.data_path);
    info!("Extraction model: {}", config.extraction.model);
    if config.extraction.api_key.is_empty() {
        warn!("ANTHROPIC_API_KEY is not set; search requests will fail until it is configured");
    }

    // Check if port is available BEFORE initializing services
    if !is_port_available(port) {
        error!(
            "Port {} is already in use. Please stop any existing HomeFinder instances or use a different port.",
            port
        );
        return Err(format!("Port {} is already in use", port).into());
    }

    let store = Arc::new(PropertyStore::load(&config.data_path));
    let extractor = Arc::new(AnthropicExtractor::new(
        config.extraction.api_key.clone(),
        config.extraction.model.clone(),
        Duration::from_secs(config.extraction.timeout_secs),
    )?);
    let search_engine = Arc::new(SearchEngine::new(store.clone(), extractor));
    info!("Property store and search engine initialized");

    let property_routes = build_property_routes(store);
    let search_routes = build_search_routes(search_engine);
    let health_routes = build_health_routes();

    let routes = property_routes
        .or(search_routes)
        .or(health_routes)
        .with(cors())
        .with(warp::log("home_finder"))
        .recover(handle_rejection);

    info!(
        "Server started successfully, listening on http://localhost:{}",
        port
    );

    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}

fn is_port_available(port: u16) -> bool {
    TcpListener::bind(("0.0.0.0", port)).is_ok()
}

fn build_property_routes(
    store: Arc<PropertyStore>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let api_properties_list = warp::path("api")
        .and(warp::path("properties"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers_property::list_properties);

    let api_properties_create = warp::path("api")
        .and(warp::path("properties"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json::<PropertySubmission>())
        .and(with_store(store))
        .and_then(handlers_property::create_property);

    api_properties_list.or(api_properties_create)
}

fn build_search_routes(
    search_engine: Arc<SearchEngine>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(warp::path("search"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json::<handlers_search::SearchRequest>())
        .and(with_search_engine(search_engine))
        .and_then(handlers_search::search_properties)
}

fn build_health_routes() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
{
    warp::path("health")
        .and(warp::get())
        .and_then(handlers_health::health_check)
}
