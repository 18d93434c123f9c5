mod cas_users;
mod common;
mod login_data;
mod pgt;
mod removed_roles;

pub use cas_users::SqliteCasUserRepo;
pub use login_data::SqliteLoginDataRepo;
pub use pgt::SqlitePgtRepo;
pub use removed_roles::SqliteRemovedRoleRepo;
