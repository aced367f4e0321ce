/// WebSocket delivery for notifications
///
/// - `manager`: topic hub implementing [`crate::channel::NotificationChannel`]
/// - `messages`: frames sent to clients
/// - `session`: per-connection actor
pub mod manager;
pub mod messages;
pub mod session;

pub use manager::{ConnectionManager, Subscription};
pub use messages::ServerMessage;
pub use session::NotificationSession;
