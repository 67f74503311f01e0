use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/link-response.ts"
)]
pub struct LinkResponse {
    pub href: String,
}

impl LinkResponse {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Links advertised by the API root.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/index-links-response.ts"
)]
pub struct IndexLinksResponse {
    pub people: LinkResponse,
}

/// API root payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/index-response.ts"
)]
pub struct IndexResponse {
    #[serde(rename = "_links")]
    pub links: IndexLinksResponse,
}
