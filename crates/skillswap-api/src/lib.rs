pub mod chat;
pub mod error;
pub mod extract;
pub mod notifications;
pub mod router;
pub mod state;
pub mod stats;
pub mod swaps;
pub mod users;
