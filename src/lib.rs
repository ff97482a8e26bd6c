//! Server URL override for the Happy client: resolution, validation,
//! compatibility probing and persistence.

pub mod happy;
