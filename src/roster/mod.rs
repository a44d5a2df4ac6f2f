mod errors;
pub mod repository;
pub mod service;

pub use errors::RosterError;
pub use repository::RosterFileStore;
pub use service::{add_player, remove_player, Roster};
