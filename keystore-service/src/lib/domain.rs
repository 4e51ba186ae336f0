pub mod credential;
pub mod sensitive;
