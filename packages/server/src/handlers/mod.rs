pub mod admin;
pub mod catalog;
pub mod collection;
pub mod missing;
pub mod prices;
