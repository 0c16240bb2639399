pub mod error;
pub mod money;

pub use error::{AppError, Result};
pub use money::{checked_product, checked_sum, ensure_non_negative, round_money, Currency};
