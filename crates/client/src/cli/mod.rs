pub mod args;
pub mod op;
pub mod ops;

pub use args::Cli;
pub use op::{Op, OpContext};
