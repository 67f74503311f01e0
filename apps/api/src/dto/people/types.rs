use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dto::LinkResponse;

/// Incoming person create or full update payload.
///
/// Audit fields sent by clients are ignored.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/person-request.ts"
)]
pub struct PersonRequest {
    pub first_name: String,
    pub last_name: String,
}

/// Incoming person partial update payload.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/person-patch-request.ts"
)]
pub struct PersonPatchRequest {
    #[ts(optional)]
    pub first_name: Option<String>,
    #[ts(optional)]
    pub last_name: Option<String>,
}

/// Query string of the last-name search.
#[derive(Debug, Deserialize)]
pub struct FindByLastNameQuery {
    pub name: String,
}

/// Links of a person resource.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/person-links-response.ts"
)]
pub struct PersonLinksResponse {
    #[serde(rename = "self")]
    pub self_link: LinkResponse,
}

/// API representation of a person.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/person-response.ts"
)]
pub struct PersonResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub owner: String,
    pub modifier: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub modified_at: DateTime<Utc>,
    #[serde(rename = "_links")]
    pub links: PersonLinksResponse,
}

/// Embedded people of a collection response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/people-embedded-response.ts"
)]
pub struct PeopleEmbeddedResponse {
    pub people: Vec<PersonResponse>,
}

/// HAL collection of people.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/people-collection-response.ts"
)]
pub struct PeopleCollectionResponse {
    #[serde(rename = "_embedded")]
    pub embedded: PeopleEmbeddedResponse,
    #[serde(rename = "_links")]
    pub links: PersonLinksResponse,
}
