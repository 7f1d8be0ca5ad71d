//! Output rendering with minimal-diff updates
//!
//! The terminal only understands full-line writes, so the renderer keeps
//! what it last sent on each channel and skips writes whose content has
//! not changed.

use eurobraille_core::MAX_COLUMNS;
use eurobraille_hal::{SerialRx, SerialTx};
use eurobraille_protocol::HostMessage;
use log::trace;

use crate::error::LinkError;
use crate::session::LinkSession;

/// Dot pattern to device cell code
///
/// Supplied by the host from its translation tables; must be total over
/// all 256 patterns.
pub trait DotTranslator {
    fn translate(&self, dots: u8) -> u8;
}

/// EuroBraille cells use the standard dot-to-bit layout
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl DotTranslator for IdentityTranslator {
    fn translate(&self, dots: u8) -> u8 {
        dots
    }
}

impl<F: Fn(u8) -> u8> DotTranslator for F {
    fn translate(&self, dots: u8) -> u8 {
        self(dots)
    }
}

/// Last content written to one display channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBuffer {
    /// `None` forces the next write
    last_sent: Option<Vec<u8>>,
}

impl DisplayBuffer {
    /// Check if `content` differs from what the terminal shows
    pub fn needs_write(&self, content: &[u8]) -> bool {
        self.last_sent.as_deref() != Some(content)
    }

    /// Forget the content so the next render rewrites it
    pub fn invalidate(&mut self) {
        self.last_sent = None;
    }

    /// Content last written, if known
    pub fn last_sent(&self) -> Option<&[u8]> {
        self.last_sent.as_deref()
    }

    fn store(&mut self, content: Vec<u8>) {
        self.last_sent = Some(content);
    }
}

/// Which line a render targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    /// Braille cells, translated
    Primary,
    /// LCD text, raw bytes
    Secondary,
}

/// Diffing renderer for the braille line and the LCD line
#[derive(Debug, Clone)]
pub struct OutputRenderer<T = IdentityTranslator> {
    translator: T,
    columns: Option<u16>,
    primary: DisplayBuffer,
    secondary: DisplayBuffer,
}

impl Default for OutputRenderer<IdentityTranslator> {
    fn default() -> Self {
        Self::new(IdentityTranslator)
    }
}

impl<T: DotTranslator> OutputRenderer<T> {
    /// Renderer for a display whose width is not known yet
    pub fn new(translator: T) -> Self {
        Self {
            translator,
            columns: None,
            primary: DisplayBuffer::default(),
            secondary: DisplayBuffer::default(),
        }
    }

    /// Display width in use
    pub fn columns(&self) -> Option<u16> {
        self.columns
    }

    /// Adopt a new display width; both lines are rewritten on next render
    pub fn resize(&mut self, columns: u16) {
        self.columns = Some(columns.min(MAX_COLUMNS));
        self.invalidate();
    }

    /// Force a full rewrite of both lines
    pub fn invalidate(&mut self) {
        self.primary.invalidate();
        self.secondary.invalidate();
    }

    /// Force a full rewrite of the braille line
    pub fn invalidate_primary(&mut self) {
        self.primary.invalidate();
    }

    pub fn primary(&self) -> &DisplayBuffer {
        &self.primary
    }

    pub fn secondary(&self) -> &DisplayBuffer {
        &self.secondary
    }

    /// Render both lines; returns how many frames were sent (0-2)
    pub fn render<C: SerialRx + SerialTx>(
        &mut self,
        session: &mut LinkSession<C>,
        primary: &[u8],
        secondary: Option<&[u8]>,
    ) -> Result<usize, LinkError> {
        let mut sent = self.render_primary(session, primary)? as usize;
        if let Some(secondary) = secondary {
            sent += self.render_secondary(session, secondary)? as usize;
        }
        Ok(sent)
    }

    /// Render the braille line; returns whether a frame was sent
    pub fn render_primary<C: SerialRx + SerialTx>(
        &mut self,
        session: &mut LinkSession<C>,
        cells: &[u8],
    ) -> Result<bool, LinkError> {
        self.render_channel(session, Channel::Primary, cells)
    }

    /// Render the LCD line; returns whether a frame was sent
    pub fn render_secondary<C: SerialRx + SerialTx>(
        &mut self,
        session: &mut LinkSession<C>,
        text: &[u8],
    ) -> Result<bool, LinkError> {
        self.render_channel(session, Channel::Secondary, text)
    }

    fn render_channel<C: SerialRx + SerialTx>(
        &mut self,
        session: &mut LinkSession<C>,
        channel: Channel,
        content: &[u8],
    ) -> Result<bool, LinkError> {
        let columns = self.columns.ok_or(LinkError::NotIdentified)? as usize;

        // Exactly one line: truncate or pad with blank cells
        let mut line = vec![0u8; columns];
        let len = content.len().min(columns);
        line[..len].copy_from_slice(&content[..len]);

        let buffer = match channel {
            Channel::Primary => &self.primary,
            Channel::Secondary => &self.secondary,
        };
        if !buffer.needs_write(&line) {
            return Ok(false);
        }

        match channel {
            Channel::Primary => {
                let translated: Vec<u8> = line
                    .iter()
                    .map(|&dots| self.translator.translate(dots))
                    .collect();
                session.send_message(&HostMessage::BrailleLine(&translated))?;
                self.primary.store(line);
            }
            Channel::Secondary => {
                session.send_message(&HostMessage::VisualLine(&line))?;
                self.secondary.store(line);
            }
        }
        trace!("Rendered {:?} line ({} cells)", channel, columns);
        Ok(true)
    }
}
