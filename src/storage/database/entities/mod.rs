/// Audit log entity module
pub mod audit_log;
/// Rating entity module
pub mod rating;
/// Store entity module
pub mod store;
/// User entity module
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use rating::Entity as Rating;
pub use store::Entity as Store;
pub use user::Entity as User;
