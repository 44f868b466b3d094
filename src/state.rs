//! Shared application state for all routes.

use crate::auth::Authenticator;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Injected by the binary (`PgStore`) or by tests.
    pub store: Arc<dyn Store>,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, auth: Authenticator) -> Self {
        AppState {
            store,
            auth: Arc::new(auth),
        }
    }
}
