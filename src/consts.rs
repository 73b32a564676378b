//! Wire-format constants used across the framing protocol.
//!
//! This module defines the handful of byte values and sizes that pin down the
//! HDLC-style byte-stuffed frame format implemented by [`crate::codec`]: the start/end
//! delimiter, the escape byte, and the XOR mask applied to an escaped byte.
//!
//! ## Key Concepts
//!
//! - **Delimiter**: the sentinel byte bounding every frame on the wire.
//! - **Escape**: the byte-stuffing prefix; the following byte is XORed with the mask.
//! - **CAN chunking**: the maximum payload a single CAN frame can carry.
//! - **Reserved error codes**: the base of the stable numeric namespace adapters built
//!   on this crate may extend without colliding with core error codes.
//!
//! These values should be used wherever framing logic needs to recognize or emit
//! delimiter/escape bytes, to keep the wire format consistent across the encoder,
//! decoder, and any external tooling that inspects raw frames.

/// Frame delimiter. Marks the start and end of every frame on the wire.
pub const DELIM: u8 = 0x7E;

/// Escape byte. Prefixes a stuffed occurrence of [`DELIM`] or [`ESC`] in the frame body.
pub const ESC: u8 = 0x7D;

/// XOR mask applied to a byte when it is escaped on encode, and undone on decode.
pub const ESC_XOR: u8 = 0x20;

/// Number of trailing CRC bytes appended to every payload before stuffing.
pub const CRC_LEN: usize = 2;

/// Maximum number of bytes carried by a single CAN frame.
pub const CAN_MAX_LEN: usize = 8;

/// Base value of the reserved, stable error-code namespace (see [`crate::error::Error`]).
pub const ERROR_CODE_BASE: u16 = 1024;
