use std::{net::SocketAddr, sync::Arc};

use backend::{create_router, incidents::IncidentStore, upstream::DirectionsClient, AppState};
use shared::Coordinate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SAMPLE_INCIDENTS_PATH: &str = "backend/data/incidents.json";
const SAMPLE_COUNT: usize = 50;
const MAP_CENTER: Coordinate = Coordinate {
    lat: 36.0995,
    lon: -80.2442,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let incidents_path =
        std::env::var("INCIDENTS_JSON").unwrap_or_else(|_| SAMPLE_INCIDENTS_PATH.to_string());
    let incidents = match IncidentStore::from_file(&incidents_path) {
        Ok(store) => {
            tracing::info!("loaded incident data from {incidents_path}");
            store
        }
        Err(err) => {
            tracing::warn!("could not load {incidents_path} ({err}), generating sample data");
            IncidentStore::sample(MAP_CENTER, SAMPLE_COUNT)
        }
    };

    let state = AppState {
        incidents: Arc::new(incidents),
        directions: Arc::new(DirectionsClient::from_env()),
    };
    let app = create_router(state);

    let addr: SocketAddr = "0.0.0.0:8080".parse().expect("valid socket address");
    tracing::info!("starting backend on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}
