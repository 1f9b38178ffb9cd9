pub mod editor;
pub mod reconcile;
pub mod scorecard;

pub use editor::*;
pub use reconcile::*;
pub use scorecard::*;
