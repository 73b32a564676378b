//! The driver's error taxonomy.
//!
//! Only [`Error::TxOverflow`] is ever produced by this crate's core (see
//! [`crate::instance::Instance::submit`]); the other variants are a reserved, stable
//! numeric namespace so hardware adapters built on top of this crate (UART/CAN drivers
//! that do surface hardware faults) have a ready-made, interoperable error type instead
//! of inventing their own. The core never fabricates `TxHardwareError`,
//! `RxHardwareError`, `NoConnection`, `CrcError`, or `FrameError` — wire-side corruption
//! and CRC mismatches are handled by silently dropping the frame in progress (§7 of the
//! design notes), not by returning one of these.

use crate::consts::ERROR_CODE_BASE;

/// Stable, sequential error codes, starting at [`ERROR_CODE_BASE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u16)]
pub enum Error {
    /// The payload exceeded `payload_max`, or a prior submission is still in flight.
    #[error("tx overflow")]
    TxOverflow = ERROR_CODE_BASE,
    /// Reserved for adapters: the receive buffer could not hold an inbound frame.
    #[error("rx overflow")]
    RxOverflow,
    /// Reserved for adapters: a transmit-side hardware fault occurred.
    #[error("tx hardware error")]
    TxHardwareError,
    /// Reserved for adapters: a receive-side hardware fault occurred.
    #[error("rx hardware error")]
    RxHardwareError,
    /// Reserved for adapters: the underlying link is not connected.
    #[error("no connection")]
    NoConnection,
    /// Reserved for adapters: a CRC mismatch was surfaced instead of silently dropped.
    #[error("crc error")]
    CrcError,
    /// Reserved for adapters: a malformed frame was surfaced instead of silently dropped.
    #[error("frame error")]
    FrameError,
}

impl Error {
    /// The stable numeric code for this error, for wire/logging compatibility with
    /// non-Rust callers of the same protocol.
    pub const fn code(self) -> u16 {
        self as u16
    }
}
