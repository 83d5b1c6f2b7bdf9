pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::student::Student;
pub use repository::{StudentRepository, StudentStore};
