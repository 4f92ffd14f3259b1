// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{auth_handlers, cart_handlers, catalog_handlers, favorite_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      .route("/health/", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register/", web::post().to(auth_handlers::register_handler))
          .route("/login/", web::post().to(auth_handlers::login_handler))
          .route("/logout/", web::post().to(auth_handlers::logout_handler)),
      )
      .service(web::scope("/users").route("/me/", web::get().to(auth_handlers::me_handler)))
      .service(
        web::scope("/catalog")
          .route("/categories/", web::get().to(catalog_handlers::list_categories_handler))
          .route(
            "/subcategories/",
            web::get().to(catalog_handlers::list_subcategories_handler),
          )
          .route("/products/", web::get().to(catalog_handlers::list_products_handler))
          .route(
            "/products/{product_id}/",
            web::get().to(catalog_handlers::product_detail_handler),
          ),
      )
      .service(
        web::scope("/cart")
          .route("/", web::get().to(cart_handlers::get_cart_handler))
          .route("/add/", web::post().to(cart_handlers::add_to_cart_handler))
          .route(
            "/item/{item_id}/",
            web::patch().to(cart_handlers::update_cart_item_handler),
          )
          .route(
            "/item/{item_id}/",
            web::delete().to(cart_handlers::delete_cart_item_handler),
          ),
      )
      .service(
        web::scope("/favorites")
          .route("/", web::get().to(favorite_handlers::list_favorites_handler))
          .route("/toggle/", web::post().to(favorite_handlers::toggle_favorite_handler))
          .route(
            "/{product_id}/",
            web::delete().to(favorite_handlers::delete_favorite_handler),
          ),
      ),
  );
}
