pub mod access_tokens;
pub mod object_storage;
pub mod process_runner;
pub mod videos;
