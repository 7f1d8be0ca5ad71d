//! Scripted terminal for driver tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use eurobraille_core::config::DriverConfig;
use eurobraille_hal::{SerialRx, SerialTx};
use eurobraille_protocol::{
    messages, Frame, FrameDecoder, IdentifyResponse, KeyEvent, TerminalMessage, MAX_PAYLOAD_SIZE,
};

#[derive(Debug, Default)]
pub struct Script {
    /// Bytes the terminal will send
    pub rx: VecDeque<u8>,
    /// Bytes the host wrote
    pub tx: Vec<u8>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Byte sent forever once `rx` runs dry
    pub noise: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelDown;

/// Byte channel backed by a shared script; reads never block
#[derive(Debug, Clone, Default)]
pub struct ScriptedChannel {
    pub script: Rc<RefCell<Script>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, bytes: &[u8]) {
        self.script.borrow_mut().rx.extend(bytes.iter().copied());
    }

    pub fn written(&self) -> Vec<u8> {
        self.script.borrow().tx.clone()
    }

    pub fn clear_written(&self) {
        self.script.borrow_mut().tx.clear();
    }

    /// Keep the line busy with `byte` after the queued bytes
    pub fn babble(&self, byte: u8) {
        self.script.borrow_mut().noise = Some(byte);
    }

    pub fn fail_reads(&self) {
        self.script.borrow_mut().fail_reads = true;
    }
}

impl SerialRx for ScriptedChannel {
    type Error = ChannelDown;

    fn read_timeout(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize, ChannelDown> {
        let mut script = self.script.borrow_mut();
        if script.fail_reads {
            return Err(ChannelDown);
        }
        let mut count = 0;
        while count < buf.len() {
            let Some(byte) = script.rx.pop_front().or(script.noise) else {
                break;
            };
            buf[count] = byte;
            count += 1;
        }
        Ok(count)
    }
}

impl SerialTx for ScriptedChannel {
    type Error = ChannelDown;

    fn write_all(&mut self, data: &[u8]) -> Result<(), ChannelDown> {
        let mut script = self.script.borrow_mut();
        if script.fail_writes {
            return Err(ChannelDown);
        }
        script.tx.extend_from_slice(data);
        Ok(())
    }
}

/// Defaults that keep failing handshakes fast
pub fn test_config() -> DriverConfig {
    DriverConfig {
        identify_timeout_ms: 200,
        identify_retry_ms: 20,
        ..DriverConfig::default()
    }
}

/// Wire bytes of one terminal frame
pub fn terminal_frame(sequence: u8, contents: &[TerminalMessage<'_>]) -> Vec<u8> {
    let mut payload = heapless::Vec::<u8, MAX_PAYLOAD_SIZE>::new();
    for message in contents {
        message.write_to(&mut payload).unwrap();
    }
    Frame::new(&payload, sequence)
        .unwrap()
        .encode_to_vec()
        .unwrap()
        .to_vec()
}

/// Identify answer for a version string such as `b"IR3 v2.1"`
pub fn identify_frame(sequence: u8, version: &[u8]) -> Vec<u8> {
    let identify = IdentifyResponse {
        model: [version[0], version[1]],
        column_digit: version[2],
        version,
    };
    terminal_frame(sequence, &[TerminalMessage::Identify(identify)])
}

pub fn key_frame(sequence: u8, event: KeyEvent) -> Vec<u8> {
    terminal_frame(sequence, &[TerminalMessage::Key(event)])
}

/// Frames the host sent, in order
pub fn sent_frames(wire: &[u8]) -> Vec<Frame> {
    let mut decoder = FrameDecoder::new();
    wire.iter().filter_map(|&byte| decoder.feed(byte)).collect()
}

/// `(tag, sub, data)` of every message the host sent
pub fn sent_messages(wire: &[u8]) -> Vec<(u8, u8, Vec<u8>)> {
    sent_frames(wire)
        .iter()
        .flat_map(|frame| {
            messages(&frame.payload)
                .map(|raw| (raw.tag, raw.sub, raw.data.to_vec()))
                .collect::<Vec<_>>()
        })
        .collect()
}
