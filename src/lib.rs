pub mod api;
pub mod cache;
pub mod error;
pub mod fields;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
