//! sea-orm entities for the Docket database.

pub mod document_items;
pub mod documents;
pub mod roles;
pub mod user_data;
pub mod user_roles;
pub mod users;
