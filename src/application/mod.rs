pub mod media;
pub mod usecases;
