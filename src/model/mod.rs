pub mod tournament;
pub mod types;

pub use tournament::*;
pub use types::*;
