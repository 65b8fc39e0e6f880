use std::sync::Arc;

use cinedash_db::store::MovieStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Server settings
/// are consumed while building the router and are not carried here.
#[derive(Clone)]
pub struct AppState {
    /// Movie storage, constructed and connected before serving.
    pub store: Arc<dyn MovieStore>,
}
