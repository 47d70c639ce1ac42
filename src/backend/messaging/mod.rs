//! Messaging Module
//!
//! Sidebar user listing and direct messages pushed over the realtime
//! connection. Messages are delivered live only and are not stored.

pub mod handlers;

pub use handlers::{get_users_for_sidebar, send_message, SendMessageResponse};
