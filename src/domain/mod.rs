pub mod error;
pub mod event;
pub mod identity;
pub mod model;
pub mod repository;
