//! Administrative commands: roster edits, on-demand weekly report, test post.

mod errors;
pub mod handlers;
pub mod models;
pub mod service;
pub mod token;

pub use errors::CommandError;
pub use handlers::{health, post_command};
pub use models::{Command, CommandKind, CommandReply, CommandRequest};
pub use service::CommandService;
pub use token::{AdminClaims, TokenConfig};
