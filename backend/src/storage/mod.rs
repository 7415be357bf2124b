pub mod connection;
pub mod errors;
pub mod repositories;
pub mod traits;
pub mod unit_of_work;

pub use connection::DbConnection;
pub use errors::UniqueViolation;
pub use traits::*;
pub use unit_of_work::UnitOfWork;
