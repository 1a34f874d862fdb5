//! Database entities.

pub mod application;
pub mod school;
pub mod school_class;
pub mod student;
pub mod user;

pub use application::Entity as Application;
pub use school::Entity as School;
pub use school_class::Entity as SchoolClass;
pub use student::Entity as Student;
pub use user::Entity as User;
