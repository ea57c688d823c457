pub mod initialize;
pub mod add_pool;
pub mod deposit;
pub mod withdraw;
pub mod flash_loan;

pub use initialize::*;
pub use add_pool::*;
pub use deposit::*;
pub use withdraw::*;
pub use flash_loan::*;
