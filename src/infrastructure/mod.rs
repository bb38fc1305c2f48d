pub mod auth;
pub mod axum_http;
pub mod postgres;
pub mod process;
pub mod storages;
