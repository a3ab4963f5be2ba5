pub mod images;
pub mod pull;
