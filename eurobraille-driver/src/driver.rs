//! Driver facade: one terminal, one session, one input decoder

use std::time::Duration;

use eurobraille_core::config::DriverConfig;
use eurobraille_core::{Command, InputDecoder, InputMode, LinkRequest, ModelId, Outcome, Prompt};
use eurobraille_hal::{SerialRx, SerialTx};
use log::{debug, info, warn};

use crate::error::LinkError;
use crate::renderer::{DotTranslator, IdentityTranslator, OutputRenderer};
use crate::session::{LinkSession, SessionEvent};

/// A connected, identified EuroBraille terminal
pub struct BrailleDriver<C, T = IdentityTranslator> {
    session: LinkSession<C>,
    decoder: InputDecoder,
    renderer: OutputRenderer<T>,
    prompt: Option<Prompt>,
}

impl<C: SerialRx + SerialTx> BrailleDriver<C, IdentityTranslator> {
    /// Identify the terminal on `channel` with the standard cell layout
    pub fn open(channel: C, config: DriverConfig) -> Result<Self, LinkError> {
        Self::with_translator(channel, config, IdentityTranslator)
    }
}

impl<C: SerialRx + SerialTx, T: DotTranslator> BrailleDriver<C, T> {
    /// Identify the terminal on `channel`, translating cells with `translator`
    pub fn with_translator(channel: C, config: DriverConfig, translator: T) -> Result<Self, LinkError> {
        let mut session = LinkSession::new(channel, config);
        let link = session.identify(config.identify_timeout())?;

        let mut decoder = InputDecoder::new();
        decoder.on_identified(&link);
        let mut renderer = OutputRenderer::new(translator);
        if let Some(columns) = link.columns() {
            renderer.resize(columns);
        }
        info!(
            "EuroBraille display detected: {:?}, {} columns",
            link.model,
            link.columns().unwrap_or(0)
        );

        Ok(Self {
            session,
            decoder,
            renderer,
            prompt: None,
        })
    }

    /// Display width
    pub fn columns(&self) -> u16 {
        self.session.link().columns().unwrap_or(0)
    }

    /// Terminal family
    pub fn model(&self) -> ModelId {
        self.session.link().model
    }

    /// Firmware version as reported at identify
    pub fn version(&self) -> &str {
        self.session.link().version.as_str()
    }

    /// Current input mode
    pub fn mode(&self) -> InputMode {
        self.decoder.mode()
    }

    /// Underlying session, for statistics
    pub fn session(&self) -> &LinkSession<C> {
        &self.session
    }

    /// Prompt produced by the last input, to be shown with
    /// [`write_message`](Self::write_message)
    pub fn take_prompt(&mut self) -> Option<Prompt> {
        self.prompt.take()
    }

    /// Line time the terminal needs for what was written since the last call
    pub fn take_write_delay(&mut self) -> Duration {
        self.session.take_write_delay()
    }

    /// Next command from the terminal, if any input is waiting
    ///
    /// A channel failure is reported as [`Command::RestartDriver`]; the
    /// caller is expected to reopen the connection.
    pub fn read_command(&mut self) -> Option<Command> {
        loop {
            let event = match self.session.poll_message() {
                Ok(Some(event)) => event,
                Ok(None) => return None,
                Err(e) => {
                    warn!("Terminal link failed: {}", e);
                    return Some(Command::RestartDriver);
                }
            };

            if let Some(command) = self.handle_event(event) {
                return Some(command);
            }
        }
    }

    fn handle_event(&mut self, event: SessionEvent) -> Option<Command> {
        match event {
            SessionEvent::Key(key) => {
                let outcome = self.decoder.handle_key(self.session.link(), key);
                self.apply(outcome)
            }
            SessionEvent::Mode(mode) => {
                let outcome = self.decoder.handle_mode(self.session.link(), mode);
                self.apply(outcome)
            }
            SessionEvent::Identified { columns } => {
                self.decoder.on_identified(self.session.link());
                self.renderer.resize(columns);
                Some(Command::Resize(columns))
            }
            SessionEvent::Rejected(_) => {
                // The terminal may show anything now
                self.renderer.invalidate();
                None
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) -> Option<Command> {
        if outcome.refresh {
            self.renderer.invalidate_primary();
        }
        if let Some(prompt) = outcome.prompt {
            debug!("Prompt: {}", prompt.text());
            self.prompt = Some(prompt);
        }
        match outcome.link {
            Some(LinkRequest::Reidentify) => {
                if let Err(e) = self.session.request_identify() {
                    warn!("Failed to request identify: {}", e);
                }
            }
            Some(LinkRequest::AcknowledgePcMode) => self.session.acknowledge_pc_mode(),
            None => {}
        }
        outcome.command
    }

    /// Show `cells` on the braille line unless a prompt owns it
    ///
    /// Returns whether a frame was sent.
    pub fn write_window(&mut self, cells: &[u8]) -> Result<bool, LinkError> {
        if self.decoder.mode().holds_display() {
            return Ok(false);
        }
        self.renderer.render_primary(&mut self.session, cells)
    }

    /// Show a prompt (or any message) on the braille line
    pub fn write_message(&mut self, cells: &[u8]) -> Result<bool, LinkError> {
        self.renderer.render_primary(&mut self.session, cells)
    }

    /// Show `text` on the LCD line, if the visual display is enabled
    pub fn write_visual(&mut self, text: &[u8]) -> Result<bool, LinkError> {
        if !self.session.config().visual_display {
            return Ok(false);
        }
        self.renderer.render_secondary(&mut self.session, text)
    }

    /// Ask the terminal to identify again
    ///
    /// The answer arrives through [`read_command`](Self::read_command) as
    /// [`Command::Resize`].
    pub fn reset(&mut self) -> Result<(), LinkError> {
        info!("Terminal reset requested");
        self.session.request_identify()
    }

    /// Send an arbitrary payload as one frame; returns the payload length
    pub fn write_packet(&mut self, payload: &[u8]) -> Result<usize, LinkError> {
        if payload.is_empty() {
            return Ok(0);
        }
        self.session.send(payload)?;
        Ok(payload.len())
    }

    /// Next validated frame payload, bypassing message dispatch
    pub fn read_packet(&mut self) -> Result<Option<Vec<u8>>, LinkError> {
        let timeout = self.session.config().poll_timeout();
        let frame = self.session.poll_frame(timeout)?;
        Ok(frame.map(|frame| frame.payload.to_vec()))
    }

    /// Close the connection and return the channel
    pub fn close(self) -> C {
        info!("EuroBraille display closed");
        self.session.into_channel()
    }
}
