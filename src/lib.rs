//! # segreto_backend
//!
//! HTTP backend for a social-posting app: posts, polls, votes, comments,
//! follows, reposts, notifications and badges. The poll closer and the badge
//! evaluator in [`service`] carry the stateful rules; everything else is
//! request handling around the [`store::Store`] contract.

use std::sync::Arc;

pub mod builtins;
pub use builtins as BuiltIns;

pub mod config;
pub mod error;

pub mod handler;
pub use handler as Handler;

pub mod middleware;
pub use middleware as Middleware;

pub mod model;
pub use model as Model;

pub mod routes;

pub mod service;

pub mod store;
pub mod utils;

use builtins::media::MediaStorage;
use store::Store;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub media: Arc<dyn MediaStorage>,
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, media: Arc<dyn MediaStorage>, jwt_secret: &str) -> Self {
        Self { store, media, jwt_secret: jwt_secret.to_string() }
    }
}
