//! # hdlc-link
//!
//! A portable, `no_std` Rust driver for framing application payloads as HDLC-style
//! byte-stuffed frames across either a byte-oriented UART or a packetized CAN bus.
//!
//! This driver implements:
//! - a byte-stuffing codec (delimiter `0x7E`, escape `0x7D`) shared by both transports
//! - CRC-16/X-25 validation of every frame
//! - a transport layer that unifies a one-byte-per-call UART path with an up-to-eight-
//!   bytes-per-call CAN path behind one generic [`instance::Instance`] type
//! - a caller-owned, allocation-free, reentrant instance model: no heap, no static
//!   mutable state, no internal time base
//!
//! ## Crate features
//! | Feature      | Description |
//! |--------------|-------------|
//! | `std`        | Disables `#![no_std]` and enables `thiserror/std`, `log/std` |
//! | `defmt-0-3`  | Derives [`defmt::Format`] on public types and logs via `defmt` |
//! | `log`        | Logs via the `log` crate (ignored if `defmt-0-3` is also enabled) |
//!
//! ## Usage
//!
//! ```rust
//! use hdlc_link::instance::{Config, Instance};
//! use hdlc_link::transport::{AppCallback, UartHardware};
//!
//! struct LoopbackUart { queue: Vec<u8> }
//!
//! impl UartHardware for LoopbackUart {
//!     type Error = core::convert::Infallible;
//!     fn tx_is_avail(&mut self) -> bool { true }
//!     fn rx_is_ready(&mut self) -> bool { !self.queue.is_empty() }
//!     fn tx(&mut self, byte: u8) -> Result<(), Self::Error> {
//!         self.queue.push(byte);
//!         Ok(())
//!     }
//!     fn rx(&mut self) -> Result<u8, Self::Error> {
//!         Ok(self.queue.remove(0))
//!     }
//! }
//!
//! struct Collector { last: Option<Vec<u8>> }
//! impl AppCallback for Collector {
//!     fn on_packet(&mut self, payload: &[u8]) {
//!         self.last = Some(payload.to_vec());
//!     }
//! }
//!
//! let mut buf_tx = [0u8; 18];
//! let mut buf_rx = [0u8; 18];
//! let mut instance = Instance::new_uart(
//!     LoopbackUart { queue: Vec::new() },
//!     Collector { last: None },
//!     Config { payload_max: 16 },
//!     &mut buf_tx,
//!     &mut buf_rx,
//! );
//!
//! instance.submit(b"hello").unwrap();
//! for _ in 0..64 {
//!     instance.task();
//! }
//! ```
//!
//! ## Design notes
//!
//! This crate draws a hard line between the framing core (CRC, encoder, decoder) and
//! everything it takes to run on real hardware (the [`transport`] capability traits,
//! the [`instance::Instance`] aggregate that owns buffers and counters). The core never
//! allocates, never blocks, and never touches a clock; [`instance::Instance::task`] must
//! be pumped by the caller at whatever rate its transport needs servicing.
//!
//! ## Status
//!
//! Stable wire format, `1.0`-track API.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod consts;
pub(crate) mod codec;
pub(crate) mod crc;
pub mod error;
pub mod instance;
pub mod transport;

pub use crate::codec::FrameState;
pub use crate::crc::crc16;
pub use crate::error::Error;
pub use crate::instance::{CanInstance, Config, Instance, State, UartInstance};
pub use crate::transport::{AppCallback, CanHardware, NoCan, NoUart, TransportKind, UartHardware};
