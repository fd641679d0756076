//! Role-based access control.

pub mod enforcer;
pub mod policies;

pub use enforcer::{BookingAction, RbacEnforcer};
pub use policies::SystemPermission;
