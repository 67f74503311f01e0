mod conversions;
mod types;

pub use conversions::person_href;
pub use types::{
    FindByLastNameQuery, PeopleCollectionResponse, PersonPatchRequest, PersonRequest,
    PersonResponse,
};
