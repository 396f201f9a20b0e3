//! # Packet Encoding
//!
//! Packet declarations, the identifier registry, field rules and the recursive
//! encoder that ties them together.
//!
//! ## Components
//! - **Object**: declarative field registration and visibility
//! - **Rules**: before / instead / after / conversion overrides and their resolution
//! - **Packet**: configuration and full-bypass hooks
//! - **Registry**: packet identifiers and the custom-encoding flag
//! - **Encoder**: the `serialize` entry point

pub mod encoder;
pub mod object;
pub mod packet;
pub mod registry;
pub mod rules;

#[cfg(test)]
mod tests;
