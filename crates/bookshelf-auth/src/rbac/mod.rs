//! Role-based access control backed by the access table.

pub mod controller;
pub mod privilege;

pub use controller::AccessController;
pub use privilege::Privilege;
