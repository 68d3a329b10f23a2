//! Local HTTP stand-ins for the translation and vocabulary services

use axum::Router;
use tokio::net::TcpListener;

/// Serve the router built by `app` on an ephemeral local port.
///
/// `app` receives the server's base URL (`http://127.0.0.1:PORT`) so handlers
/// can hand out absolute links such as pagination cursors.
pub(crate) async fn serve(app: impl FnOnce(String) -> Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind TCP listener");
    let addr = listener.local_addr().expect("Failed to get local address");
    let base = format!("http://{}", addr);
    let router = app(base.clone());

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("stand-in server failed");
    });

    base
}
