mod handlers;
mod state;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use state::AppState;

/// Serve the projection API until the server is stopped.
///
/// The climate grids held by `state` are released once the server exits.
pub async fn start_server(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let data = web::Data::new(state.clone());

    println!("Starting afforestation impact server on http://{host}:{port}");
    info!(host, port, "binding http server");

    let result = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .app_data(data.clone())
            .route("/api/species", web::get().to(handlers::species))
            .route("/api/simulate", web::post().to(handlers::simulate))
            .route("/api/compare", web::post().to(handlers::compare))
    })
    .bind((host, port))?
    .run()
    .await;

    state.shutdown();
    info!("server stopped; climate grids released");
    result
}
