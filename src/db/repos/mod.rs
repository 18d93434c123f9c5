mod cas_users;
mod login_data;
mod pgt;
mod removed_roles;

pub use cas_users::*;
pub use login_data::*;
pub use pgt::*;
pub use removed_roles::*;
