//! In-process HTTP fixtures for the network tests

use axum::http::{header, StatusCode};
use axum::response::Html;
use axum::routing::{get, MethodRouter};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind a listener on an ephemeral local port. Bind first so that fixture
/// bodies can embed the final address.
pub async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

pub fn spawn(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

pub fn html(body: String) -> MethodRouter {
    get(move || {
        let body = body.clone();
        async move { Html(body) }
    })
}

pub fn css(body: &'static str) -> MethodRouter {
    get(move || async move { ([(header::CONTENT_TYPE, "text/css")], body) })
}

pub fn status(code: StatusCode) -> MethodRouter {
    get(move || async move { code })
}
