use custodia_core::{AppError, AppResult};
use custodia_domain::{Auditable, Person, PersonDraft, PersonPatch, RecordId};

use crate::dto::LinkResponse;

use super::types::{
    PeopleCollectionResponse, PeopleEmbeddedResponse, PersonLinksResponse, PersonPatchRequest,
    PersonRequest, PersonResponse,
};

/// Returns the canonical path of a person.
pub fn person_href(id: RecordId) -> String {
    format!("/people/{id}")
}

impl From<Person> for PersonResponse {
    fn from(value: Person) -> Self {
        let audit = value.audit();
        Self {
            id: value.id().to_string(),
            first_name: value.first_name().to_owned(),
            last_name: value.last_name().to_owned(),
            owner: audit.owner().to_owned(),
            modifier: audit.modifier().to_owned(),
            created_at: audit.created_at(),
            modified_at: audit.modified_at(),
            links: PersonLinksResponse {
                self_link: LinkResponse::new(person_href(value.id())),
            },
        }
    }
}

impl PeopleCollectionResponse {
    pub fn new(people: Vec<Person>, self_href: impl Into<String>) -> Self {
        Self {
            embedded: PeopleEmbeddedResponse {
                people: people.into_iter().map(PersonResponse::from).collect(),
            },
            links: PersonLinksResponse {
                self_link: LinkResponse::new(self_href),
            },
        }
    }
}

impl TryFrom<PersonRequest> for PersonDraft {
    type Error = AppError;

    fn try_from(value: PersonRequest) -> AppResult<Self> {
        PersonDraft::new(value.first_name, value.last_name)
    }
}

impl TryFrom<PersonPatchRequest> for PersonPatch {
    type Error = AppError;

    fn try_from(value: PersonPatchRequest) -> AppResult<Self> {
        PersonPatch::new(value.first_name, value.last_name)
    }
}
