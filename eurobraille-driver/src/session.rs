//! Link session: identify handshake, framed I/O and message dispatch
//!
//! One session owns one byte channel and the framing state of that
//! connection. It is driven from a single thread; nothing here locks.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use eurobraille_core::config::DriverConfig;
use eurobraille_core::LinkState;
use eurobraille_hal::{SerialRx, SerialTx};
use eurobraille_protocol::{
    messages, DecodeEvent, DecoderStats, ErrorCode, Frame, FrameCodec, HostMessage,
    IdentifyResponse, KeyEvent, ModeCheck, TerminalMessage, MAX_FRAME_SIZE,
};
use log::{debug, info, trace, warn};

use crate::error::LinkError;

/// A dispatched terminal message, or a link-level notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Key pressed on the terminal
    Key(KeyEvent),
    /// Terminal changed operating mode
    Mode(ModeCheck),
    /// Terminal identified itself again (power cycle or reset)
    Identified { columns: u16 },
    /// Terminal rejected our last frame; `None` for an unknown error code
    Rejected(Option<ErrorCode>),
}

/// One open connection to a terminal
pub struct LinkSession<C> {
    channel: C,
    codec: FrameCodec,
    link: LinkState,
    config: DriverConfig,
    queue: VecDeque<SessionEvent>,
    write_delay: Duration,
}

impl<C: SerialRx + SerialTx> LinkSession<C> {
    /// Wrap a channel; nothing is sent until [`identify`](Self::identify)
    pub fn new(channel: C, config: DriverConfig) -> Self {
        Self {
            channel,
            codec: FrameCodec::with_limit(config.max_frame_len),
            link: LinkState::new(),
            config,
            queue: VecDeque::new(),
            write_delay: Duration::ZERO,
        }
    }

    /// What is known about the terminal
    pub fn link(&self) -> &LinkState {
        &self.link
    }

    /// Transport error counters
    pub fn stats(&self) -> &DecoderStats {
        self.codec.stats()
    }

    /// Settings this session was opened with
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Line time spent by writes since the last call
    pub fn take_write_delay(&mut self) -> Duration {
        std::mem::take(&mut self.write_delay)
    }

    /// Give the channel back
    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Run the identify handshake
    ///
    /// Starts a fresh session (sequence numbers restart at the
    /// first-contact marker), sends the identify request and re-sends it
    /// whenever the retry interval passes without an answer. Fails once
    /// the configured attempts or the overall timeout are used up.
    pub fn identify(&mut self, timeout: Duration) -> Result<LinkState, LinkError> {
        self.codec.reset();
        self.link.clear();
        self.queue.clear();

        let deadline = Instant::now() + timeout;
        let mut attempts = 0;
        while attempts < self.config.identify_attempts {
            if attempts > 0 && Instant::now() >= deadline {
                break;
            }
            attempts += 1;
            if attempts > 1 {
                warn!("No identify response, retrying ({}/{})", attempts, self.config.identify_attempts);
            }
            self.request_identify()?;

            let attempt_deadline = deadline.min(Instant::now() + self.config.identify_retry());
            loop {
                let now = Instant::now();
                if now >= attempt_deadline {
                    break;
                }
                let Some(frame) = self.poll_frame(attempt_deadline - now)? else {
                    break;
                };
                self.dispatch(&frame);
                if self.link.is_identified() {
                    // Input that raced the handshake belongs to no session
                    self.queue.clear();
                    info!(
                        "Terminal identified: {:?}, {} columns, version {}",
                        self.link.model,
                        self.link.columns().unwrap_or(0),
                        self.link.version
                    );
                    return Ok(self.link.clone());
                }
            }
        }

        Err(LinkError::NotResponding { attempts })
    }

    /// Ask the terminal to identify itself again
    ///
    /// The answer arrives later as [`SessionEvent::Identified`].
    pub fn request_identify(&mut self) -> Result<(), LinkError> {
        self.link.just_identified = false;
        self.send_message(&HostMessage::Identify)
    }

    /// The expected PC-mode notice after identify arrived
    pub fn acknowledge_pc_mode(&mut self) {
        self.link.just_identified = false;
    }

    /// Next dispatched event, waiting up to the configured poll timeout
    pub fn poll_message(&mut self) -> Result<Option<SessionEvent>, LinkError> {
        if let Some(event) = self.queue.pop_front() {
            return Ok(Some(event));
        }

        let timeout = self.config.poll_timeout();
        while let Some(frame) = self.poll_frame(timeout)? {
            self.dispatch(&frame);
            if let Some(event) = self.queue.pop_front() {
                return Ok(Some(event));
            }
        }
        Ok(self.queue.pop_front())
    }

    /// Next validated frame, waiting up to `timeout`
    ///
    /// Acknowledgements owed to the terminal are sent as frames complete.
    /// Returns `None` when the channel goes quiet or the timeout passes
    /// before a frame finished; a partial frame stays buffered for the next
    /// call. Past the timeout, only a frame or NACK already under way is
    /// read on, for at most one maximum-size frame of bytes.
    pub fn poll_frame(&mut self, timeout: Duration) -> Result<Option<Frame>, LinkError> {
        let deadline = Instant::now() + timeout;
        let mut overrun = 0;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Some(byte) = self.channel.read_byte(remaining).map_err(LinkError::io)? else {
                return Ok(None);
            };

            let frame = self.codec.decode(byte);
            if let Some(reply) = self.codec.take_reply() {
                // A lost reply makes the terminal retransmit, which the codec absorbs
                if let Err(e) = self.channel.write_all(&reply.to_bytes()) {
                    warn!("Failed to send {:?}: {:?}", reply, e);
                }
            }
            if let Some(event) = self.codec.take_event() {
                self.note(event);
            }
            if let Some(frame) = frame {
                trace!("RX frame seq={} len={}", frame.sequence, frame.payload.len());
                return Ok(Some(frame));
            }

            if Instant::now() >= deadline {
                if self.codec.is_idle() || overrun >= MAX_FRAME_SIZE {
                    return Ok(None);
                }
                overrun += 1;
            }
        }
    }

    /// Frame and send a raw payload
    pub fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        let wire = self.codec.encode(payload)?;
        if let Err(e) = self.channel.write_all(&wire) {
            warn!("Failed to send frame: {:?}", e);
            return Err(LinkError::io(e));
        }
        self.write_delay += self.config.serial.transmit_time(wire.len());
        trace!("TX frame len={}", wire.len());
        Ok(())
    }

    /// Send one host message as its own frame
    pub fn send_message(&mut self, message: &HostMessage<'_>) -> Result<(), LinkError> {
        let payload = message.to_payload()?;
        self.send(&payload)
    }

    fn note(&mut self, event: DecodeEvent) {
        match event {
            DecodeEvent::PeerAck => trace!("Terminal acknowledged"),
            DecodeEvent::PeerNack { code } => {
                let code = ErrorCode::from_byte(code);
                debug!("Terminal rejected frame: {:?}", code);
                self.queue.push_back(SessionEvent::Rejected(code));
            }
            DecodeEvent::Duplicate { sequence } => {
                debug!("Dropped retransmitted frame seq={}", sequence)
            }
            DecodeEvent::Abandoned { len } => {
                debug!("Abandoned partial frame ({} bytes)", len)
            }
            other => debug!("Dropped frame: {:?}", other),
        }
    }

    fn dispatch(&mut self, frame: &Frame) {
        for raw in messages(&frame.payload) {
            match TerminalMessage::parse(&raw) {
                Ok(TerminalMessage::Identify(identify)) => self.apply_identify(&identify),
                Ok(TerminalMessage::Key(event)) => self.queue.push_back(SessionEvent::Key(event)),
                Ok(TerminalMessage::ModeCheck(mode)) => {
                    match mode {
                        ModeCheck::PcModeEntered => info!("Terminal entered PC mode"),
                        ModeCheck::PcModeLeft => info!("Terminal is leaving PC mode"),
                        ModeCheck::SpeechModeEntered => info!("Terminal entered speech mode"),
                    }
                    self.queue.push_back(SessionEvent::Mode(mode));
                }
                Err(e) => debug!("Dropped message: {:?}", e),
            }
        }
    }

    fn apply_identify(&mut self, identify: &IdentifyResponse<'_>) {
        let previous = self.link.columns();
        match self.link.apply_identify(identify) {
            Ok(columns) => {
                if previous.is_some() {
                    info!(
                        "Terminal re-identified: {:?}, {} columns",
                        self.link.model, columns
                    );
                }
                self.queue.push_back(SessionEvent::Identified { columns });
            }
            Err(e) => debug!("Dropped identify response: {:?}", e),
        }
    }
}
