pub mod eventbus;
pub mod service;
pub mod state;
pub mod view_state;
