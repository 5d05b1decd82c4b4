//! Set-theory engine
//!
//! Prime-form reduction and the set classification table.

pub mod prime_form;
pub mod table;

pub use prime_form::{normal_orders, prime_form};
pub use table::{PcSetTable, TableError};
