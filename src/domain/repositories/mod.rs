// Repository contracts implemented by the infrastructure layer

pub mod user_repository;

pub use user_repository::{PageRequest, UserFilter, UserPage, UserRepository};
