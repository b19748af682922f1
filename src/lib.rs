pub mod batch;
pub mod decode;
pub mod error;
pub mod utils;

pub use decode::{decode, decode_from, decode_lossy, try_decode, DecodeOptions, Decoder, Policy};
pub use error::DecodeError;
