#![crate_name = "pixelveil_core"]

pub mod codecs;
pub mod error;
pub mod image_wrapper;
mod logger;
mod macros;
mod utilities;
