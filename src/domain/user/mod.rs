// User domain module
// Contains the user record, its value objects, and the failure taxonomy

#![allow(clippy::module_inception)]

pub mod errors;
pub mod user;
pub mod value_objects;

// Re-export main types for convenience
pub use errors::{UserError, UserResult};
pub use user::{NewUser, User, UserChanges, UserId};
