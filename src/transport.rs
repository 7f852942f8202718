//!
//! Display link: mailbox buffers between the byte-at-a-time UART interrupt
//! handlers and the control loop.
//!
//! The receive side hands the loop one complete frame at a time behind a
//! ready flag; the interrupt never overwrites a frame the loop has not taken
//! yet.  The transmit side is filled whole by the loop and drained by the
//! interrupt, with the byte count doubling as the busy indicator.
//!

use common::crc::frame_crc_valid;
use common::display::{
    DISPLAY_COMMAND_SIZE, DISPLAY_COMMAND_START_BYTE, DisplayCommand, STATUS_REPORT_SIZE,
    StatusReport,
};
use defmt::Format;
use ncomm_utils::packing::Packable;

/// Consecutive exchange windows without a valid inbound frame before the
/// link counts as lost.
pub const LINK_LOSS_EXCHANGE_LIMIT: u8 = 5;

#[derive(Format, Debug, Clone, PartialEq, Eq)]
/// Inbound frame mailbox, filled byte by byte from the receive interrupt
pub struct ReceiveMailbox {
    buffer: [u8; DISPLAY_COMMAND_SIZE],
    count: usize,
    in_frame: bool,
    frame_ready: bool,
}

impl ReceiveMailbox {
    pub fn new() -> Self {
        Self {
            buffer: [0u8; DISPLAY_COMMAND_SIZE],
            count: 0,
            in_frame: false,
            frame_ready: false,
        }
    }

    /// Feed one received byte.  Bytes are dropped until a start byte is
    /// seen, and while a completed frame is waiting to be taken.
    pub fn push_byte(&mut self, byte: u8) {
        if self.frame_ready {
            return;
        }
        if !self.in_frame {
            if byte != DISPLAY_COMMAND_START_BYTE {
                return;
            }
            self.in_frame = true;
            self.count = 0;
        }
        self.buffer[self.count] = byte;
        self.count += 1;
        if self.count == DISPLAY_COMMAND_SIZE {
            self.in_frame = false;
            self.frame_ready = true;
        }
    }

    pub fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    /// Take the pending frame, clearing the ready flag so reception can
    /// re-arm.
    pub fn take(&mut self) -> Option<[u8; DISPLAY_COMMAND_SIZE]> {
        if self.frame_ready {
            self.frame_ready = false;
            Some(self.buffer)
        } else {
            None
        }
    }
}

impl Default for ReceiveMailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Format, Debug, Clone, PartialEq, Eq)]
/// Outbound frame buffer, drained byte by byte by the transmit interrupt
pub struct TransmitBuffer {
    buffer: [u8; STATUS_REPORT_SIZE],
    count: usize,
}

impl TransmitBuffer {
    pub fn new() -> Self {
        Self {
            buffer: [0u8; STATUS_REPORT_SIZE],
            // past the end marks the buffer idle
            count: STATUS_REPORT_SIZE + 1,
        }
    }

    pub fn idle(&self) -> bool {
        self.count > STATUS_REPORT_SIZE
    }

    /// Hand a sealed frame to the transmitter.  Refused while a previous
    /// frame is still draining.
    pub fn load(&mut self, frame: [u8; STATUS_REPORT_SIZE]) -> bool {
        if !self.idle() {
            return false;
        }
        self.buffer = frame;
        self.count = 0;
        true
    }

    /// Next byte for the transmit interrupt, or `None` once drained.
    pub fn next_byte(&mut self) -> Option<u8> {
        if self.count < STATUS_REPORT_SIZE {
            let byte = self.buffer[self.count];
            self.count += 1;
            Some(byte)
        } else {
            self.count = STATUS_REPORT_SIZE + 1;
            None
        }
    }
}

impl Default for TransmitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Format, Debug, Clone, PartialEq, Eq)]
/// Both mailbox halves plus the link loss watchdog
pub struct Communications {
    pub rx: ReceiveMailbox,
    pub tx: TransmitBuffer,
    no_rx_counter: u8,
}

impl Communications {
    pub fn new() -> Self {
        Self {
            rx: ReceiveMailbox::new(),
            tx: TransmitBuffer::new(),
            no_rx_counter: 0,
        }
    }

    /// One exchange window's receive attempt.  A corrupt frame is dropped
    /// silently; only a CRC-valid frame resets the link loss watchdog.
    pub fn receive(&mut self) -> Option<DisplayCommand> {
        self.no_rx_counter = self.no_rx_counter.saturating_add(1);

        let frame = self.rx.take()?;
        if !frame_crc_valid(&frame) {
            return None;
        }
        let command = DisplayCommand::unpack(&frame).ok()?;
        self.no_rx_counter = 0;
        Some(command)
    }

    /// Queue a status report for transmission.  Refused while the previous
    /// report is still draining.
    pub fn send(&mut self, report: StatusReport) -> bool {
        if !self.tx.idle() {
            return false;
        }
        let mut frame = [0u8; STATUS_REPORT_SIZE];
        if report.pack(&mut frame).is_err() {
            return false;
        }
        self.tx.load(frame)
    }

    /// True once too many exchange windows have passed without a valid
    /// inbound frame.
    pub fn link_lost(&self) -> bool {
        self.no_rx_counter > LINK_LOSS_EXCHANGE_LIMIT
    }
}

impl Default for Communications {
    fn default() -> Self {
        Self::new()
    }
}
