pub mod images;
pub mod session;
