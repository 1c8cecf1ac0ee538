use authcode_core::{Config, Error, GeneralExchanger};
use axum::{
    routing::{any, get},
    Router,
};

use crate::middlewares::trace_layer;

pub mod meta;

pub mod authorize;
pub mod callback;
mod state;

pub use state::AppState;

pub fn router<E>(config: &Config, state: AppState<E>) -> Router
where
    E: GeneralExchanger + Clone + Send + Sync + 'static,
{
    let callback_path = normalize_path(config.callback_path());
    let authorize_path = normalize_path(config.authorize_path());

    // any method reaches the handler so it can answer "unsupported method"
    let mut router = Router::new().route(&callback_path, any(callback::handler::<E>));

    if config.provider.auth_url.is_some() {
        if authorize_path == callback_path {
            tracing::warn!(
                path = %authorize_path,
                "authorize entry point shares the callback path, not mounting it"
            );
        } else {
            router = router.route(
                &authorize_path,
                get(authorize::handler::<E>).fallback(not_implemented),
            );
        }
    }

    tracing::info!(callback = %callback_path, "callback route mounted");
    router
        .nest("/.meta", meta::router(config))
        .fallback(not_implemented)
        .layer(trace_layer())
        .with_state(state)
}

async fn not_implemented() -> Error {
    Error::NotImplemented
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}
