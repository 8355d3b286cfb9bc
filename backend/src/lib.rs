pub mod config;
pub mod documents;
pub mod store;
pub mod queries;
pub mod processor;
pub mod routes;
pub mod cors;
pub mod error;
pub mod utils;
pub mod catchers;
pub use shared::{models::*, error::*};
pub use documents::{DocumentStore, StoreResult};
pub use error::{ApiError, StoreError};
pub use processor::VoterProcessor;

use std::sync::Arc;
use rocket::{catchers, figment::Figment, routes, Build, Rocket};
use crate::{
    catchers::{bad_request, internal_error, not_found, unprocessable},
    cors::CORS,
    routes::*,
};

pub fn build_rocket(figment: Figment, store: Arc<dyn DocumentStore>) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(CORS)
        .manage(AppState::new(store))
        .mount(
            "/",
            routes![
                list_voters,
                create_voter,
                delete_all_voters,
                get_voter,
                update_voter,
                delete_voter,
                add_vote,
                get_vote_history,
                get_vote,
                health,
                all_options
            ],
        )
        .register("/", catchers![bad_request, not_found, unprocessable, internal_error])
}
