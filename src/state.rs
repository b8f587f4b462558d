use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenService;
use crate::store::{MemoryStore, PgStore, TodoStore, UserDirectory};

/// Shared application state handed to every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserDirectory>,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        todos: Arc<dyn TodoStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            todos,
            tokens,
        }
    }

    pub fn postgres(pool: PgPool, tokens: TokenService) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::new(store.clone(), store, tokens)
    }

    /// State backed by a fresh `MemoryStore`.
    pub fn in_memory(secret: &str) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, TokenService::new(secret))
    }
}
