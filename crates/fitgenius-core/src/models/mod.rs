pub mod chat;
pub mod outcome;
pub mod plan;
pub mod profile;
pub mod user;
