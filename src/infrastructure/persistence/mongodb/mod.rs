//! MongoDB persistence implementation

mod connection;
mod group_repo;

pub use connection::{init_mongodb, MongoConnection};
pub use group_repo::MongoGroupRepository;
