//! Repository implementations for database operations.

pub mod device;
pub mod notification;
pub mod push_token;
pub mod reading;

pub use device::DeviceRepository;
pub use notification::NotificationRepository;
pub use push_token::PushTokenRepository;
pub use reading::ReadingRepository;
