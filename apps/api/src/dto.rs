mod common;
mod people;

pub use common::{HealthResponse, IndexLinksResponse, IndexResponse, LinkResponse};
pub use people::{
    FindByLastNameQuery, PeopleCollectionResponse, PersonPatchRequest, PersonRequest,
    PersonResponse, person_href,
};
