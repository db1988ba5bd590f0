// Infrastructure layer module
// Record store adapters (PostgreSQL and in-process)

pub mod repositories;
