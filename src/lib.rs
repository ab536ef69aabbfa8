//! Terminal admin console for a music catalog REST API.
//!
//! The library holds everything except the terminal lifecycle: the query
//! model and sort toggle, pagination, the stateless table projection, page
//! controllers and their collaborators, and the ratatui drawing code.

pub mod api;
pub mod config;
pub mod controller;
pub mod deferred;
pub mod form;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod query;
pub mod render;
pub mod resource;
pub mod session;
pub mod state;
pub mod table;
pub mod upload;
pub mod workspace;
