mod cli;
mod parsers;
mod types;


pub use cli::HammerArgs;
pub use types::{DispatchMode, HttpMethod, PositiveUsize};
