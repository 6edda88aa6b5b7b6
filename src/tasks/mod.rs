//! Study tasks: paged CRUD plus file attachments

pub mod attachments;
pub mod commands;
pub mod types;
