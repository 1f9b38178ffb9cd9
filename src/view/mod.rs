pub mod hole;
pub mod home;
pub mod layout;
pub mod login;
pub mod scorecard;
