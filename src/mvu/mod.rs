pub mod hole;
pub mod runtime;
pub mod scorecard;
