//! Pure RX-side state transition: "consume one wire byte".
//!
//! The destination buffer is caller-owned (sized `payload_max + 2` so it can hold a
//! maximal payload plus its trailing CRC while buffering). [`step`] never looks past
//! `capacity`; a frame that would overflow it is dropped and the state machine resyncs
//! at the next delimiter. Frame validation (CRC check, payload handoff) is a separate
//! pure function, [`close`], so the caller decides what "deliver to the application"
//! means.

use super::FrameState;
use crate::consts::{CRC_LEN, DELIM, ESC};
use crate::crc::crc16;

/// What happened on this decoder step, besides the state transition itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    /// Nothing of note (byte dropped outside a frame, or consumed as an escape marker).
    None,
    /// A delimiter was observed as the start of a new frame.
    Sof,
    /// A byte was appended to the buffer; `rx_size` grew by one.
    Appended,
    /// The body in `buf[..size]` is complete; caller should run [`close`] on it.
    Closed,
    /// The frame in progress was malformed (bad escape, or buffer exhaustion) and was
    /// dropped before it could close.
    Dropped,
}

/// Result of one decoder step.
pub(crate) struct Step {
    pub state: FrameState,
    pub size: usize,
    pub event: Event,
}

/// Advances the RX state machine by exactly one wire byte.
///
/// `size` is the caller's current `rx_size`; `capacity` is `payload_max + 2`. The
/// returned [`Step::size`] already reflects the append/drop/close; on [`Event::Closed`]
/// it is still the pre-reset size (the body length to hand to [`close`]) — the caller
/// resets `rx_size` to `0` itself once it has read the body out.
pub(crate) fn step(state: FrameState, byte: u8, buf: &mut [u8], size: usize, capacity: usize) -> Step {
    match state {
        FrameState::Delimiter => {
            if byte == DELIM {
                Step {
                    state: FrameState::Byte,
                    size,
                    event: Event::Sof,
                }
            } else {
                Step {
                    state: FrameState::Delimiter,
                    size,
                    event: Event::None,
                }
            }
        }
        FrameState::Byte => {
            if byte == ESC {
                Step {
                    state: FrameState::EncodedByte,
                    size,
                    event: Event::None,
                }
            } else if byte == DELIM {
                Step {
                    state: FrameState::Delimiter,
                    size,
                    event: Event::Closed,
                }
            } else if size == capacity {
                Step {
                    state: FrameState::Delimiter,
                    size: 0,
                    event: Event::Dropped,
                }
            } else {
                buf[size] = byte;
                Step {
                    state: FrameState::Byte,
                    size: size + 1,
                    event: Event::Appended,
                }
            }
        }
        FrameState::EncodedByte => {
            let unescaped = match byte {
                0x5E => Some(DELIM),
                0x5D => Some(ESC),
                _ => None,
            };
            match unescaped {
                Some(b) if size < capacity => {
                    buf[size] = b;
                    Step {
                        state: FrameState::Byte,
                        size: size + 1,
                        event: Event::Appended,
                    }
                }
                _ => Step {
                    state: FrameState::Delimiter,
                    size: 0,
                    event: Event::Dropped,
                },
            }
        }
    }
}

/// Validates a just-closed frame body `buf[..size]` and returns the payload length if
/// the trailing little-endian CRC matches.
///
/// Bodies of length `0` or `1` (no room for a CRC) and `2` (CRC with no payload) are
/// rejected without a CRC computation — both are "nothing to deliver".
pub(crate) fn close(buf: &[u8], size: usize) -> Option<usize> {
    if size <= CRC_LEN {
        return None;
    }
    let payload_len = size - CRC_LEN;
    let expected = u16::from_le_bytes([buf[payload_len], buf[payload_len + 1]]);
    let computed = crc16(&buf[..payload_len]);
    (computed == expected).then_some(payload_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(frame: &[u8], buf: &mut [u8], capacity: usize) -> (usize, usize) {
        let mut state = FrameState::Delimiter;
        let mut size = 0;
        let mut sof = 0;
        let mut delivered = 0;
        for &b in frame {
            let s = step(state, b, buf, size, capacity);
            state = s.state;
            size = s.size;
            match s.event {
                Event::Sof => sof += 1,
                Event::Closed => {
                    if close(buf, size).is_some() {
                        delivered += 1;
                    }
                    size = 0;
                }
                _ => {}
            }
        }
        (sof, delivered)
    }

    #[test]
    fn decodes_plain_frame() {
        let frame = [0x7E, 0x00, 0x78, 0xF0, 0x7E];
        let mut buf = [0u8; 16];
        let mut state = FrameState::Delimiter;
        let mut size = 0;
        let mut payload_len = None;
        for &b in &frame {
            let s = step(state, b, &mut buf, size, 16);
            state = s.state;
            size = s.size;
            if s.event == Event::Closed {
                payload_len = close(&buf, size);
                size = 0;
            }
        }
        assert_eq!(payload_len, Some(1));
        assert_eq!(&buf[..1], &[0x00]);
    }

    #[test]
    fn delimiter_stream_counts_sof_without_delivery() {
        let frame = [0x7E, 0x7E, 0x7E, 0x7E];
        let mut buf = [0u8; 16];
        let (sof, delivered) = feed(&frame, &mut buf, 16);
        assert_eq!(sof, 4);
        assert_eq!(delivered, 0);
    }

    #[test]
    fn bad_escape_drops_frame() {
        // 0x7E (sof) 0x41 0x7D 0x99 (bad escape) 0x7E (next sof)
        let frame = [0x7E, 0x41, 0x7D, 0x99, 0x7E];
        let mut buf = [0u8; 16];
        let mut state = FrameState::Delimiter;
        let mut size = 0;
        let mut dropped = false;
        for &b in &frame {
            let s = step(state, b, &mut buf, size, 16);
            state = s.state;
            size = s.size;
            if s.event == Event::Dropped {
                dropped = true;
            }
        }
        assert!(dropped);
    }

    #[test]
    fn overflow_drops_frame() {
        let mut buf = [0u8; 2];
        let mut state = FrameState::Delimiter;
        let mut size = 0;
        let s = step(state, DELIM, &mut buf, size, 2);
        state = s.state;
        size = s.size;
        for b in [1u8, 2, 3] {
            let s = step(state, b, &mut buf, size, 2);
            state = s.state;
            size = s.size;
            if s.event == Event::Dropped {
                assert_eq!(size, 0);
                return;
            }
        }
        panic!("expected overflow to drop the frame");
    }
}
