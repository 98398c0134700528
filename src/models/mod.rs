pub mod ledger;
pub mod quote;
pub mod user;

pub use ledger::{Holding, LedgerEntry};
pub use quote::Quote;
pub use user::{CurrentUser, User};
