//! Index entities and the services that maintain them.

pub mod model;
pub mod service;
