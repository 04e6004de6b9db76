//! PostgreSQL implementations of the repository traits.

mod account_repository;
mod follow_repository;
mod notification_repository;
mod post_repository;
mod profile_repository;

pub use account_repository::PgAccountRepository;
pub use follow_repository::PgFollowRepository;
pub use notification_repository::PgNotificationRepository;
pub use post_repository::PgPostRepository;
pub use profile_repository::PgProfileRepository;
