//! Hardware and application capability traits, and the transport variant selector.
//!
//! This crate never talks to hardware directly; instead it drives a small capability
//! set per direction, each carrying an opaque handle owned by the implementer. This
//! mirrors the teacher crate's pattern of driving `embedded_hal::digital::{InputPin,
//! OutputPin}` through generics rather than trait objects or global function pointers —
//! generalized here from GPIO pins to predicate-gated byte/frame batches, since that is
//! the granularity a UART or CAN peripheral actually exposes.

use crate::consts::CAN_MAX_LEN;

/// A byte-oriented UART transport.
///
/// One [`tx`](UartHardware::tx) call pushes exactly one byte; one
/// [`rx`](UartHardware::rx) call pulls exactly one byte. [`tx_is_avail`] and
/// [`rx_is_ready`] gate those calls so the task driver never blocks.
pub trait UartHardware {
    /// Hardware-reported failure (out of scope for the core; see [`crate::error::Error`]).
    type Error;

    /// Whether the hardware can accept at least one more byte right now.
    fn tx_is_avail(&mut self) -> bool;

    /// Whether the hardware has at least one byte available to read right now.
    fn rx_is_ready(&mut self) -> bool;

    /// Pushes a single byte to the hardware. Only called when [`tx_is_avail`] is true.
    ///
    /// [`tx_is_avail`]: UartHardware::tx_is_avail
    fn tx(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Pulls a single byte from the hardware. Only called when [`rx_is_ready`] is true.
    ///
    /// [`rx_is_ready`]: UartHardware::rx_is_ready
    fn rx(&mut self) -> Result<u8, Self::Error>;
}

/// A packetized CAN transport.
///
/// Up to [`CAN_MAX_LEN`] bytes move per [`tx`](CanHardware::tx)/[`rx`](CanHardware::rx)
/// call, each tagged with a 29-bit identifier selected per direction.
pub trait CanHardware {
    /// Hardware-reported failure (out of scope for the core; see [`crate::error::Error`]).
    type Error;

    /// Whether the hardware can accept one more CAN frame right now.
    fn tx_is_avail(&mut self) -> bool;

    /// Whether the hardware has a CAN frame available to read right now.
    fn rx_is_ready(&mut self) -> bool;

    /// Sends up to [`CAN_MAX_LEN`] bytes as a single CAN frame with identifier `can_id`.
    fn tx(&mut self, buf: &[u8], can_id: u32) -> Result<(), Self::Error>;

    /// Reads the next CAN frame whose identifier matches `can_id_filter` into `out`,
    /// returning the number of bytes it carried (at most [`CAN_MAX_LEN`]).
    fn rx(&mut self, out: &mut [u8; CAN_MAX_LEN], can_id_filter: u32) -> Result<usize, Self::Error>;
}

/// Delivery of one fully decoded, CRC-valid payload to the application.
pub trait AppCallback {
    /// Called synchronously, on the task's thread, the moment a frame's closing
    /// delimiter is consumed and its CRC checks out. Must not call back into the
    /// [`crate::instance::Instance`] that invoked it.
    fn on_packet(&mut self, payload: &[u8]);
}

/// Which physical transport an [`Instance`](crate::instance::Instance) is wired to.
///
/// Purely descriptive (used for logging and [`crate::instance::State`]); the actual
/// hardware handle lives in [`Hardware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TransportKind {
    /// One byte per hardware call.
    Uart,
    /// Up to [`CAN_MAX_LEN`] bytes per hardware call, tagged with per-direction identifiers.
    Can {
        /// Identifier stamped on every outbound CAN frame.
        id_tx: u32,
        /// Identifier filtered for on inbound CAN frames.
        id_rx: u32,
    },
}

/// The hardware handle an [`Instance`](crate::instance::Instance) owns.
///
/// A sum type rather than two mutually exclusive compile-time driver types (per the
/// framing adapter design note), so a build may host a UART-backed instance and a
/// CAN-backed instance side by side, each a distinct monomorphization of the same
/// generic [`Instance`](crate::instance::Instance) type. [`NoUart`] and [`NoCan`] are
/// uninhabited placeholders used to pin a given instance to exactly one variant at the
/// type level — see [`crate::instance::Instance::new_uart`] and
/// [`crate::instance::Instance::new_can`].
pub(crate) enum Hardware<U, C> {
    Uart(U),
    Can(C),
}

/// Uninhabited placeholder for the UART type parameter of a CAN-only [`Instance`](crate::instance::Instance).
#[derive(Debug)]
pub enum NoUart {}

impl UartHardware for NoUart {
    type Error = core::convert::Infallible;

    fn tx_is_avail(&mut self) -> bool {
        match *self {}
    }

    fn rx_is_ready(&mut self) -> bool {
        match *self {}
    }

    fn tx(&mut self, _byte: u8) -> Result<(), Self::Error> {
        match *self {}
    }

    fn rx(&mut self) -> Result<u8, Self::Error> {
        match *self {}
    }
}

/// Uninhabited placeholder for the CAN type parameter of a UART-only [`Instance`](crate::instance::Instance).
#[derive(Debug)]
pub enum NoCan {}

impl CanHardware for NoCan {
    type Error = core::convert::Infallible;

    fn tx_is_avail(&mut self) -> bool {
        match *self {}
    }

    fn rx_is_ready(&mut self) -> bool {
        match *self {}
    }

    fn tx(&mut self, _buf: &[u8], _can_id: u32) -> Result<(), Self::Error> {
        match *self {}
    }

    fn rx(&mut self, _out: &mut [u8; CAN_MAX_LEN], _can_id_filter: u32) -> Result<usize, Self::Error> {
        match *self {}
    }
}
