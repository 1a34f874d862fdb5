//! Database repositories.

mod application;
mod school;
mod school_class;
mod user;

pub use application::ApplicationRepository;
pub use school::SchoolRepository;
pub use school_class::SchoolClassRepository;
pub use user::UserRepository;
