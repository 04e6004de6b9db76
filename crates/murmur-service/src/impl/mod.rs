//! Service implementations.

mod auth_service_impl;
mod follow_service_impl;
mod notification_service_impl;
mod post_service_impl;
mod profile_service_impl;

pub use auth_service_impl::AuthServiceImpl;
pub use follow_service_impl::FollowServiceImpl;
pub use notification_service_impl::NotificationServiceImpl;
pub use post_service_impl::PostServiceImpl;
pub use profile_service_impl::ProfileServiceImpl;
