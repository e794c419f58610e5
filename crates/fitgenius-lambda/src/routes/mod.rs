pub mod assistant;
pub mod health;
pub mod plans;
pub mod profile;
pub mod session;
