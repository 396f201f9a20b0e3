//! # Packet Codec
//!
//! `tokio_util` encoder that hands serialized packets to a framed transport.
//! No length prefix or other framing is added.

use crate::error::ProtocolError;
use crate::protocol::encoder::PacketEncoder;
use crate::protocol::packet::Packet;
use bytes::BytesMut;
use tokio_util::codec::Encoder;

/// Outbound codec for framed transports.
///
/// Appends exactly the bytes produced by [`PacketEncoder::serialize`]; any framing
/// beyond identifier and body belongs to the transport.
#[derive(Clone)]
pub struct PacketCodec {
    encoder: PacketEncoder,
}

impl PacketCodec {
    pub fn new(encoder: PacketEncoder) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &PacketEncoder {
        &self.encoder
    }
}

impl<'a, P: Packet> Encoder<&'a P> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: &'a P, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = self.encoder.serialize(item)?;
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}
