// Route exports
pub mod sessions;

use actix_web::web;

pub use sessions::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(sessions::configure),
    );
}
