mod cas_user;
mod ids;
mod login_data;
mod pgt;

pub use cas_user::*;
pub use ids::*;
pub use login_data::*;
pub use pgt::*;
