//! # Core Wire Components
//!
//! Primitive encoding, value classification and the transport codec.
//!
//! ## Components
//! - **Writer / Reader**: fixed-width little-endian integers, single-byte booleans,
//!   LEB128 length-prefixed UTF-8 strings
//! - **Primitive**: the dispatch table from primitive kind to writer call
//! - **Value**: the closed set of value shapes the encoder understands
//! - **Codec**: `tokio_util` encoder handing serialized packets to a transport
//!
//! ## Wire Format
//! ```text
//! [Identifier(2)] [Field 1] [Field 2] ... [Field N]
//! ```

pub mod codec;
pub mod primitive;
pub mod reader;
pub mod value;
pub mod writer;
