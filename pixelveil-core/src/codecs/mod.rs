pub mod codec;
pub mod lsb;
pub mod payload;
