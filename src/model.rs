pub mod logical;
pub mod storage;
pub mod validate;

pub use logical::{Column, EditTarget};
pub use storage::{Paid, Period, Program};
