#[cfg(feature = "ssr")]
#[derive(Clone, axum::extract::FromRef)]
struct AppState {
    leptos_options: leptos::prelude::LeptosOptions,
    routes_state: boonda::routes::RouteState,
}

#[cfg(feature = "ssr")]
async fn server_fn_handler(
    state: axum::extract::State<AppState>,
    request: axum::extract::Request,
) -> impl axum::response::IntoResponse {
    use leptos::prelude::provide_context;

    let routes_state = state.routes_state.clone();
    leptos_axum::handle_server_fns_with_context(
        move || provide_context(routes_state.clone()),
        request,
    )
    .await
}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::{
        routing::{get, post},
        Router,
    };
    use boonda::app::{shell, App};
    use boonda::routes::RouteState;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let conf = get_configuration(None).expect("leptos configuration to load");
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let routes = generate_route_list(App);

    let state = AppState {
        leptos_options,
        routes_state: RouteState::from_env(),
    };

    let app = Router::new()
        .route(
            "/api/{*fn_name}",
            post(server_fn_handler).get(server_fn_handler),
        )
        .route("/f/{id}", get(boonda::routes::upload::serve_file))
        .leptos_routes_with_context(
            &state,
            routes,
            {
                let routes_state = state.routes_state.clone();
                move || provide_context(routes_state.clone())
            },
            {
                let leptos_options = state.leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler::<AppState, _>(shell))
        .with_state(state);

    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("listen address to be free");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server to run");
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // Hydration builds ship as a cdylib; see `hydrate()` in lib.rs.
}
