pub mod common;
pub mod organization;
pub mod payer;
pub mod transaction;

pub use common::{humanize_tag, Displayable};
pub use organization::Organization;
pub use payer::Payer;
pub use transaction::{PaymentMethod, Transaction, TransactionCategory};
