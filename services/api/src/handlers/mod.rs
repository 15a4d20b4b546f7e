pub mod account;
pub mod document;
pub mod document_item;
pub mod user_data;
