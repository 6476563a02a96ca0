use crate::graph::GraphClient;

/// Shared server state: one stateless client for every request.
pub struct AppState {
    pub client: GraphClient,
}
