//! Entity definitions (database row mappings).

pub mod device;
pub mod notification;
pub mod push_token;
pub mod reading;

pub use device::DeviceEntity;
pub use notification::NotificationEntity;
pub use push_token::PushTokenEntity;
pub use reading::ReadingEntity;
