mod compile;
mod resolve;

pub use compile::cmd_compile;
pub use resolve::cmd_resolve;
