// Route registration seam between the API controllers and the HTTP server.

use axum::Router;

/// A group of REST routes. Each controller builds its own sub-router with
/// the state it needs and merges it into the server router.
pub trait Controller: Send + Sync {
    /// Mounts this controller's routes:
    /// ```rust
    /// # use axum::{Router, routing::get};
    /// # async fn info() -> &'static str { "IMC Manager" }
    /// let routes: Router<()> = Router::new().route("/api/info", get(info));
    /// let router = Router::new().merge(routes);
    /// # let _ = router;
    /// ```
    fn add_route(&self, router: Router) -> Router;
}
