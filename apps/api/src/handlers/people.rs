use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query, State};
use axum::http::{StatusCode, header};
use custodia_core::Principal;
use custodia_domain::{PersonDraft, PersonPatch, RecordId};

use crate::dto::{
    FindByLastNameQuery, PeopleCollectionResponse, PersonPatchRequest, PersonRequest,
    PersonResponse, person_href,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_people_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<PeopleCollectionResponse>> {
    let people = state.person_service.list_people().await?;
    Ok(Json(PeopleCollectionResponse::new(people, "/people")))
}

pub async fn create_person_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PersonRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<PersonResponse>)> {
    let Json(payload) = payload?;
    let person = state
        .person_service
        .create_person(&principal, PersonDraft::try_from(payload)?)
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, person_href(person.id()))],
        Json(PersonResponse::from(person)),
    ))
}

pub async fn get_person_handler(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
) -> ApiResult<Json<PersonResponse>> {
    let person = state
        .person_service
        .get_person(person_id.parse::<RecordId>()?)
        .await?;

    Ok(Json(PersonResponse::from(person)))
}

pub async fn update_person_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(person_id): Path<String>,
    payload: Result<Json<PersonRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = person_id.parse::<RecordId>()?;
    let Json(payload) = payload?;
    state
        .person_service
        .update_person(&principal, id, PersonDraft::try_from(payload)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn patch_person_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(person_id): Path<String>,
    payload: Result<Json<PersonPatchRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = person_id.parse::<RecordId>()?;
    let Json(payload) = payload?;
    state
        .person_service
        .patch_person(&principal, id, PersonPatch::try_from(payload)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_person_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(person_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = person_id.parse::<RecordId>()?;
    state
        .person_service
        .delete_person(Some(&principal), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_by_last_name_handler(
    State(state): State<AppState>,
    query: Result<Query<FindByLastNameQuery>, QueryRejection>,
) -> ApiResult<Json<PeopleCollectionResponse>> {
    let Query(query) = query?;
    let people = state
        .person_service
        .find_by_last_name(query.name.as_str())
        .await?;

    Ok(Json(PeopleCollectionResponse::new(
        people,
        "/people/search/findByLastName",
    )))
}
