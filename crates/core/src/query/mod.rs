pub mod ast;
pub mod eval;

pub use ast::{Direction, Filter, FilterOp, Order, Query};
