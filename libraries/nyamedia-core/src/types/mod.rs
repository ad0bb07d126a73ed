//! Domain types for the portal client

mod de;
mod media;
mod registration;
mod user;

pub use media::{MediaItem, MediaList, RequestStatus};
pub use registration::RegistrationStatus;
pub use user::TelegramUser;
