//! The caller-owned, allocation-free instance that ties hardware, application, and
//! framing together.
//!
//! An [`Instance`] holds no pointer it did not receive from its caller: the hardware
//! handle, the application handle, and both scratch buffers are supplied at
//! construction and live exactly as long as the instance does. Nothing here spawns a
//! thread, starts a timer, or touches a heap; [`Instance::task`] must be pumped by the
//! caller, and every other operation runs to completion without yielding. Driving two
//! instances from two threads is safe precisely because neither one holds anything the
//! other could see.
//!
//! [`UartInstance`] and [`CanInstance`] pin the transport at the type level using the
//! uninhabited [`NoCan`]/[`NoUart`] placeholders from [`crate::transport`], so a build
//! may freely mix both kinds without either one dragging in the other's hardware trait.

use crate::codec::decoder::{self, Event};
use crate::codec::{encoder, FrameState};
use crate::consts::{CAN_MAX_LEN, CRC_LEN};
use crate::crc::crc16;
use crate::error::Error;
use crate::transport::{AppCallback, CanHardware, Hardware, NoCan, NoUart, TransportKind, UartHardware};

#[cfg(feature = "defmt-0-3")]
use defmt::trace;
#[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
use log::trace;
#[cfg(not(any(feature = "defmt-0-3", feature = "log")))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Per-instance configuration, fixed for the instance's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Config {
    /// Largest application payload, in bytes, that [`Instance::submit`] will accept.
    /// Both scratch buffers passed to `new_uart`/`new_can` must be exactly
    /// `payload_max + 2` bytes long.
    pub payload_max: usize,
}

/// A point-in-time copy of an instance's runtime state, returned by
/// [`Instance::get_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct State {
    /// Current transmit framing state.
    pub tx_state: FrameState,
    /// Bytes (payload + CRC) staged in the TX buffer; `0` means idle.
    pub tx_size: usize,
    /// Bytes of the staged frame already handed to the transport.
    pub tx_sent: usize,
    /// Current receive framing state.
    pub rx_state: FrameState,
    /// Bytes accumulated so far in the in-flight receive frame.
    pub rx_size: usize,
    /// Count of start-of-frame delimiters observed.
    pub sof_count: u32,
    /// Count of frames delivered to the application callback.
    pub rx_packets: u32,
    /// Count of frames fully handed to the transport.
    pub tx_packets: u32,
}

/// The driver's caller-owned, reentrant instance.
///
/// `U` and `C` are the UART and CAN hardware handle types; exactly one of them is ever
/// a real hardware type; the other is [`NoUart`] or [`NoCan`], an uninhabited type that
/// makes the unused capability unreachable rather than merely unused. Most callers
/// should name [`UartInstance`] or [`CanInstance`] instead of writing out the
/// parameters.
pub struct Instance<'a, U, C, APP> {
    hw: Hardware<U, C>,
    app: APP,
    kind: TransportKind,
    cfg: Config,
    buf_tx: &'a mut [u8],
    buf_rx: &'a mut [u8],
    tx_state: FrameState,
    tx_size: usize,
    tx_sent: usize,
    rx_state: FrameState,
    rx_size: usize,
    sof_count: u32,
    rx_packets: u32,
    tx_packets: u32,
    can_id_tx: u32,
    can_id_rx: u32,
}

/// A UART-backed instance: one byte crosses the hardware boundary per call.
pub type UartInstance<'a, U, APP> = Instance<'a, U, NoCan, APP>;

/// A CAN-backed instance: up to [`CAN_MAX_LEN`] bytes cross the hardware boundary per
/// call, tagged with a per-direction identifier.
pub type CanInstance<'a, C, APP> = Instance<'a, NoUart, C, APP>;

impl<U, C, APP> core::fmt::Debug for Instance<'_, U, C, APP> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Instance")
            .field("kind", &self.kind)
            .field("payload_max", &self.cfg.payload_max)
            .field("tx_state", &self.tx_state)
            .field("tx_size", &self.tx_size)
            .field("tx_sent", &self.tx_sent)
            .field("rx_state", &self.rx_state)
            .field("rx_size", &self.rx_size)
            .field("sof_count", &self.sof_count)
            .field("rx_packets", &self.rx_packets)
            .field("tx_packets", &self.tx_packets)
            .finish()
    }
}

impl<'a, U, C, APP> Instance<'a, U, C, APP> {
    /// Whether this instance has been initialized (has a non-zero `payload_max`).
    pub fn is_init(&self) -> bool {
        self.cfg.payload_max != 0
    }

    /// Zeroes the instance's runtime state and scratch buffers. `payload_max` becomes
    /// `0`, so [`is_init`](Instance::is_init) reports `false` afterward. Idempotent:
    /// calling `deinit` on an already-deinitialized instance is legal and leaves it
    /// unchanged. The hardware and application handles are not reset — construct a new
    /// instance (`new_uart`/`new_can`) to reuse them, which this driver treats as
    /// reinitialization.
    pub fn deinit(&mut self) {
        self.cfg.payload_max = 0;
        self.tx_state = FrameState::Delimiter;
        self.tx_size = 0;
        self.tx_sent = 0;
        self.rx_state = FrameState::Delimiter;
        self.rx_size = 0;
        self.sof_count = 0;
        self.rx_packets = 0;
        self.tx_packets = 0;
        self.can_id_tx = 0;
        self.can_id_rx = 0;
        self.kind = match self.kind {
            TransportKind::Uart => TransportKind::Uart,
            TransportKind::Can { .. } => TransportKind::Can { id_tx: 0, id_rx: 0 },
        };
        self.buf_tx.fill(0);
        self.buf_rx.fill(0);
        trace!("hdlc-link: instance deinitialized");
    }

    /// Copies the current runtime state out of the instance.
    pub fn get_state(&self) -> State {
        State {
            tx_state: self.tx_state,
            tx_size: self.tx_size,
            tx_sent: self.tx_sent,
            rx_state: self.rx_state,
            rx_size: self.rx_size,
            sof_count: self.sof_count,
            rx_packets: self.rx_packets,
            tx_packets: self.tx_packets,
        }
    }

    /// Which transport this instance is wired to.
    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    fn submit_inner(&mut self, payload: &[u8]) -> Result<(), Error> {
        if self.tx_size != 0 {
            return Err(Error::TxOverflow);
        }
        let len = payload.len();
        if len == 0 || len > self.cfg.payload_max {
            return Err(Error::TxOverflow);
        }
        self.buf_tx[..len].copy_from_slice(payload);
        let crc = crc16(payload);
        self.buf_tx[len] = (crc & 0xFF) as u8;
        self.buf_tx[len + 1] = (crc >> 8) as u8;
        self.tx_size = len + CRC_LEN;
        self.tx_sent = 0;
        self.tx_state = FrameState::Delimiter;
        trace!("hdlc-link: submit accepted, len={}", len);
        Ok(())
    }

    /// Feeds one already-received wire byte through the decoder, delivering a payload
    /// to [`AppCallback::on_packet`] when a frame closes with a valid CRC.
    fn rx_step(&mut self, byte: u8)
    where
        APP: AppCallback,
    {
        let capacity = self.cfg.payload_max + CRC_LEN;
        let step = decoder::step(self.rx_state, byte, &mut self.buf_rx[..], self.rx_size, capacity);
        self.rx_state = step.state;
        self.rx_size = step.size;
        match step.event {
            Event::Sof => self.sof_count = self.sof_count.wrapping_add(1),
            Event::Closed => {
                if let Some(payload_len) = decoder::close(&self.buf_rx[..], self.rx_size) {
                    self.app.on_packet(&self.buf_rx[..payload_len]);
                    self.rx_packets = self.rx_packets.wrapping_add(1);
                    trace!("hdlc-link: frame delivered, len={}", payload_len);
                } else {
                    trace!(
                        "hdlc-link: crc mismatch, sof_count={}, rx_packets={}",
                        self.sof_count,
                        self.rx_packets
                    );
                }
                self.rx_size = 0;
            }
            Event::Dropped => trace!(
                "hdlc-link: frame dropped, sof_count={}, rx_packets={}",
                self.sof_count,
                self.rx_packets
            ),
            Event::None | Event::Appended => {}
        }
    }
}

impl<'a, U, APP> Instance<'a, U, NoCan, APP>
where
    U: UartHardware,
    APP: AppCallback,
{
    /// Builds a UART-backed instance. `buf_tx` and `buf_rx` must each be exactly
    /// `cfg.payload_max + 2` bytes.
    pub fn new_uart(hw: U, app: APP, cfg: Config, buf_tx: &'a mut [u8], buf_rx: &'a mut [u8]) -> Self {
        debug_assert!(cfg.payload_max > 0, "payload_max must be non-zero");
        debug_assert_eq!(buf_tx.len(), cfg.payload_max + CRC_LEN, "buf_tx sized wrong");
        debug_assert_eq!(buf_rx.len(), cfg.payload_max + CRC_LEN, "buf_rx sized wrong");
        trace!("hdlc-link: uart instance initialized, payload_max={}", cfg.payload_max);
        Self {
            hw: Hardware::Uart(hw),
            app,
            kind: TransportKind::Uart,
            cfg,
            buf_tx,
            buf_rx,
            tx_state: FrameState::Delimiter,
            tx_size: 0,
            tx_sent: 0,
            rx_state: FrameState::Delimiter,
            rx_size: 0,
            sof_count: 0,
            rx_packets: 0,
            tx_packets: 0,
            can_id_tx: 0,
            can_id_rx: 0,
        }
    }

    /// Stages `payload` for transmission. Fails with [`Error::TxOverflow`] if `payload`
    /// is empty, exceeds `payload_max`, or a prior submission hasn't finished draining.
    pub fn submit(&mut self, payload: &[u8]) -> Result<(), Error> {
        self.submit_inner(payload)
    }

    /// One transmit step and one receive step, each performed only if the hardware
    /// reports it is ready. Never blocks.
    pub fn task(&mut self) {
        self.tx_tick();
        self.rx_tick();
    }

    fn tx_tick(&mut self) {
        let Hardware::Uart(hw) = &mut self.hw else {
            unreachable!("UartInstance always holds Hardware::Uart")
        };
        if self.tx_size == 0 || !hw.tx_is_avail() {
            return;
        }
        let step = encoder::step(self.tx_state, &self.buf_tx[..], self.tx_size, self.tx_sent);
        if hw.tx(step.byte).is_ok() {
            self.tx_state = step.state;
            self.tx_sent = step.sent;
            self.tx_size = step.size;
            if step.completed {
                self.tx_packets = self.tx_packets.wrapping_add(1);
            }
        }
    }

    fn rx_tick(&mut self) {
        let Hardware::Uart(hw) = &mut self.hw else {
            unreachable!("UartInstance always holds Hardware::Uart")
        };
        if !hw.rx_is_ready() {
            return;
        }
        if let Ok(byte) = hw.rx() {
            self.rx_step(byte);
        }
    }
}

impl<'a, C, APP> Instance<'a, NoUart, C, APP>
where
    C: CanHardware,
    APP: AppCallback,
{
    /// Builds a CAN-backed instance. `buf_tx` and `buf_rx` must each be exactly
    /// `cfg.payload_max + 2` bytes. Both CAN identifiers start at `0`; set the inbound
    /// one with [`set_can_id_rx`](Instance::set_can_id_rx) and the outbound one by
    /// passing it to every [`submit`](Instance::submit) call.
    pub fn new_can(hw: C, app: APP, cfg: Config, buf_tx: &'a mut [u8], buf_rx: &'a mut [u8]) -> Self {
        debug_assert!(cfg.payload_max > 0, "payload_max must be non-zero");
        debug_assert_eq!(buf_tx.len(), cfg.payload_max + CRC_LEN, "buf_tx sized wrong");
        debug_assert_eq!(buf_rx.len(), cfg.payload_max + CRC_LEN, "buf_rx sized wrong");
        trace!("hdlc-link: can instance initialized, payload_max={}", cfg.payload_max);
        Self {
            hw: Hardware::Can(hw),
            app,
            kind: TransportKind::Can { id_tx: 0, id_rx: 0 },
            cfg,
            buf_tx,
            buf_rx,
            tx_state: FrameState::Delimiter,
            tx_size: 0,
            tx_sent: 0,
            rx_state: FrameState::Delimiter,
            rx_size: 0,
            sof_count: 0,
            rx_packets: 0,
            tx_packets: 0,
            can_id_tx: 0,
            can_id_rx: 0,
        }
    }

    /// Stages `payload` for transmission under CAN identifier `can_id_tx`, recording it
    /// as this call's outbound identifier. Fails with [`Error::TxOverflow`] if `payload`
    /// is empty, exceeds `payload_max`, or a prior submission hasn't finished draining —
    /// in which case `can_id_tx` is left unrecorded.
    pub fn submit(&mut self, payload: &[u8], can_id_tx: u32) -> Result<(), Error> {
        self.submit_inner(payload)?;
        self.can_id_tx = can_id_tx;
        self.kind = TransportKind::Can { id_tx: can_id_tx, id_rx: self.can_id_rx };
        Ok(())
    }

    /// Changes the CAN identifier this instance filters inbound frames on.
    pub fn set_can_id_rx(&mut self, can_id_rx: u32) {
        self.can_id_rx = can_id_rx;
        self.kind = TransportKind::Can { id_tx: self.can_id_tx, id_rx: can_id_rx };
    }

    /// One transmit step and one receive step, each performed only if the hardware
    /// reports it is ready. A transmit step drains the encoder into a single CAN frame
    /// of up to [`CAN_MAX_LEN`] bytes; a receive step reads one CAN frame and feeds
    /// every byte it carried through the decoder in order. Never blocks.
    pub fn task(&mut self) {
        self.tx_tick();
        self.rx_tick();
    }

    fn tx_tick(&mut self) {
        let Hardware::Can(hw) = &mut self.hw else {
            unreachable!("CanInstance always holds Hardware::Can")
        };
        if self.tx_size == 0 || !hw.tx_is_avail() {
            return;
        }
        let mut stage = [0u8; CAN_MAX_LEN];
        let mut n = 0;
        let mut state = self.tx_state;
        let mut sent = self.tx_sent;
        let mut size = self.tx_size;
        let mut completed = false;
        while n < CAN_MAX_LEN && size != 0 {
            let step = encoder::step(state, &self.buf_tx[..], size, sent);
            stage[n] = step.byte;
            n += 1;
            state = step.state;
            sent = step.sent;
            size = step.size;
            if step.completed {
                completed = true;
            }
        }
        // Only commit the drained state once the chunk has actually reached the
        // hardware; a rejected frame must leave `tx_state`/`tx_sent`/`tx_size` (and
        // `tx_packets`) exactly as they were so nothing is silently lost or
        // double-counted.
        if hw.tx(&stage[..n], self.can_id_tx).is_ok() {
            self.tx_state = state;
            self.tx_sent = sent;
            self.tx_size = size;
            if completed {
                self.tx_packets = self.tx_packets.wrapping_add(1);
            }
        }
    }

    fn rx_tick(&mut self) {
        let Hardware::Can(hw) = &mut self.hw else {
            unreachable!("CanInstance always holds Hardware::Can")
        };
        if !hw.rx_is_ready() {
            return;
        }
        let mut frame = [0u8; CAN_MAX_LEN];
        if let Ok(len) = hw.rx(&mut frame, self.can_id_rx) {
            for &b in &frame[..len] {
                self.rx_step(b);
            }
        }
    }
}
