use axum::Json;

use crate::dto::{IndexLinksResponse, IndexResponse, LinkResponse};

pub async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        links: IndexLinksResponse {
            people: LinkResponse::new("/people"),
        },
    })
}
