pub mod codec;
pub mod constants;
pub mod image;
