use axum::{routing::post, Router, Json};
use crate::data::{AllocationOutput, AllocationRequest};
use crate::{allocator, records};

async fn allocate_handler(Json(request): Json<AllocationRequest>) -> Result<Json<AllocationOutput>, (axum::http::StatusCode, String)> {
    match records::build_input(&request) {
        Ok(input) => Ok(Json(allocator::allocate(&input))),
        Err(e) => Err((axum::http::StatusCode::BAD_REQUEST, e)),
    }
}

pub async fn run_server() {
    let app = Router::new()
        .route("/v1/rooms/allocate", post(allocate_handler));

    let addr = std::env::var("ALLOCATOR_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap();

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
