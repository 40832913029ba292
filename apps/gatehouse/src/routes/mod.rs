use actix_web::web;

use crate::middleware::{AssignGuard, IsActive, ResolveGuards};

pub mod auth;
pub mod health;

/// Register every route.
///
/// Guard resolution and the active-status gate wrap the whole `/api/v1`
/// tree, so the gate sees every request in both realms, login included.
/// Within it the admin scope binds its guard before anything else runs.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes);

    cfg.service(
        web::scope("/api/v1")
            .wrap(IsActive)
            .wrap(ResolveGuards)
            .service(web::scope("/user").configure(auth::configure_user_routes))
            .service(
                web::scope("/admin")
                    .wrap(AssignGuard::new("admin"))
                    .configure(auth::configure_admin_routes),
            ),
    );
}
