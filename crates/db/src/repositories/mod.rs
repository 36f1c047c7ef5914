//! Data access layer. One repository per table (or tight table cluster),
//! each a stateless struct of async functions taking the pool as the first
//! argument.

pub mod assignment_repo;
pub mod borrow_request_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

pub use assignment_repo::AssignmentRepo;
pub use borrow_request_repo::BorrowRequestRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
