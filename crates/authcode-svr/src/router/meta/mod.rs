use axum::{routing::get, Router};
use axum_health::Health;
use authcode_core::Config;

use super::AppState;

pub fn router<E>(config: &Config) -> Router<AppState<E>>
where
    E: Clone + Send + Sync + 'static,
{
    let mut router = Router::new();
    if config.application.health_check {
        let health = Health::builder().build();
        router = router
            .route("/health", get(axum_health::health))
            .layer(health);
    }
    router
}
