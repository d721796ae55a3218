//! HTTP handlers and route configuration.

mod auth;
mod health;
mod my_posts;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/tags", web::get().to(posts::list_tags))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_published))
                    .route("/search", web::get().to(posts::search))
                    .route("/{handle}", web::get().to(posts::get_by_handle)),
            )
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me)),
            )
            // Protected routes
            .service(
                web::scope("/my-posts")
                    .route("", web::get().to(my_posts::list))
                    .route("", web::post().to(my_posts::create))
                    .route("/{id}", web::get().to(my_posts::get))
                    .route("/{id}", web::put().to(my_posts::update))
                    .route("/{id}", web::delete().to(my_posts::delete)),
            ),
    );
}
