// Domain layer module exports
// Domain is independent of transport concerns

pub mod repositories;
pub mod user;
