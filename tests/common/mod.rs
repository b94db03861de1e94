#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use link_shortcut::application::options::LinkManagerOptions;
use link_shortcut::application::services::LinkManager;
use link_shortcut::domain::repositories::LinkRepository;
use link_shortcut::infrastructure::persistence::MemoryLinkRepository;
use link_shortcut::routes::app_router;
use link_shortcut::state::AppState;

pub const BASE_URL: &str = "http://s.example.com";

pub fn test_options() -> LinkManagerOptions {
    LinkManagerOptions {
        concurrent_db_timeout: Duration::from_millis(1),
        ..LinkManagerOptions::default()
    }
}

/// Builds application state over a fresh in-memory store.
pub fn create_test_state() -> AppState {
    create_test_state_with(Arc::new(MemoryLinkRepository::new()))
}

pub fn create_test_state_with(repository: Arc<dyn LinkRepository>) -> AppState {
    let link_manager = Arc::new(LinkManager::new(repository, test_options()));
    AppState::new(link_manager, BASE_URL)
}

/// Full router over a fresh in-memory store.
pub fn create_test_server() -> (TestServer, AppState) {
    let state = create_test_state();
    (create_test_server_for(state.clone()), state)
}

/// Full router over the given state.
pub fn create_test_server_for(state: AppState) -> TestServer {
    let app = ServiceExt::<Request>::into_make_service(app_router(state));
    TestServer::new(app).unwrap()
}

/// Stores a link through the manager and returns its short hash.
pub async fn add_link(state: &AppState, url: &str) -> String {
    state.link_manager.add(url, None, None).await.unwrap()
}
