mod accounts;
mod cas_users;
mod settings;

pub use accounts::{AccountDirectory, MemoryAccountDirectory};
pub use cas_users::CasUserManager;
pub use settings::SettingsHandle;
