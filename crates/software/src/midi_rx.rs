//! A byte-at-a-time decoder which turns the device's serial MIDI input into Note On and Note Off
//! callbacks.
//!
//! Serial MIDI offers a receiver no framing help. The cable may be plugged in mid-message, bytes
//! may be lost to overrun, and message kinds the device has no use for share the wire with the two
//! it cares about. The decoder therefore trusts nothing beyond the byte in hand: status bytes it
//! does not support are discarded where they arrive, and a status byte showing up where message
//! data belongs abandons the message in flight and waits for a clean start. Nothing is ever
//! reported as an error; once a well-formed Note On or Note Off arrives uninterrupted, it is
//! decoded correctly no matter what preceded it.

mod message;
pub use message::*;

mod status;
pub use status::*;

use wmidi::{Channel, Note, Velocity};

/// The signature of a [note event callback](NoteReceiver::on_note_on).
pub type NoteCallback<'a> = &'a mut dyn FnMut(Channel, Note, Velocity);

/// Where the receiver stands within the three-byte receive cycle of a note message.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum RxState {
    /// No message is in flight; bytes are discarded until a supported status byte arrives.
    AwaitingStatus,
    /// A status byte has been recorded and the first data byte is expected.
    AwaitingData1,
    /// The second data byte is expected; receiving it completes the message.
    AwaitingData2,
}

/// Callbacks to invoke when a message has been received in full.
///
/// Each event kind has a single slot. Registering a callback for a kind replaces whatever was
/// registered before, and a message completed while its slot is empty is dropped, not queued.
struct NoteHandlers<'a> {
    note_on: Option<NoteCallback<'a>>,
    note_off: Option<NoteCallback<'a>>,
}

impl NoteHandlers<'_> {
    fn new() -> Self {
        Self {
            note_on: None,
            note_off: None,
        }
    }

    /// Invokes the callback matching the message kind, if one is registered.
    fn dispatch(&mut self, message: &Message) {
        let callback = if is_note_on(message.status()) {
            #[cfg(feature = "defmt")]
            defmt::info!(
                "Received NoteOn: channel {}, note {}, velocity: {}",
                message.channel().number(),
                message.note().to_str(),
                u8::from(message.velocity())
            );
            self.note_on.as_mut()
        } else if is_note_off(message.status()) {
            #[cfg(feature = "defmt")]
            defmt::info!(
                "Received NoteOff: channel {}, note {}, velocity: {}",
                message.channel().number(),
                message.note().to_str(),
                u8::from(message.velocity())
            );
            self.note_off.as_mut()
        } else {
            // the receive cycle only ever begins on a note status byte
            None
        };

        if let Some(callback) = callback {
            callback(message.channel(), message.note(), message.velocity());
        }
    }
}

/// Reconstructs Note On and Note Off messages from an unsynchronized stream of serial MIDI bytes.
///
/// The receiver holds nothing but the message currently in flight and does constant work per byte,
/// so it can be driven directly from a receive interrupt or a tight polling loop. Feeding it
/// requires `&mut self`, which rules out reentrant delivery at compile time; a host that receives
/// bytes on more than one execution context must serialize them before they reach
/// [`receive()`](Self::receive).
///
/// ```
/// use troubadour_lib::midi_rx::NoteReceiver;
///
/// let mut heard = None;
/// let mut on_note_on = |channel, note, velocity| heard = Some((channel, note, velocity));
///
/// let mut receiver = NoteReceiver::new();
/// receiver.on_note_on(&mut on_note_on);
/// for byte in [0x90, 0x3C, 0x40] {
///     receiver.receive(byte);
/// }
/// drop(receiver);
///
/// assert_eq!(
///     Some((wmidi::Channel::Ch1, wmidi::Note::C4, wmidi::U7::from_u8_lossy(64))),
///     heard
/// );
/// ```
pub struct NoteReceiver<'a> {
    state: RxState,
    message: Message,
    handlers: NoteHandlers<'a>,
}

impl Default for NoteReceiver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> NoteReceiver<'a> {
    /// Constructs a receiver with no message in flight and no callbacks registered.
    pub fn new() -> Self {
        Self {
            state: RxState::AwaitingStatus,
            message: Message::new(),
            handlers: NoteHandlers::new(),
        }
    }

    /// Registers `callback` to be invoked for each decoded Note On message, replacing any
    /// previous registration.
    ///
    /// Messages completed while no callback is registered are dropped, not held for a later
    /// registration.
    pub fn on_note_on(&mut self, callback: NoteCallback<'a>) {
        self.handlers.note_on = Some(callback);
    }

    /// Registers `callback` to be invoked for each decoded Note Off message, replacing any
    /// previous registration.
    pub fn on_note_off(&mut self, callback: NoteCallback<'a>) {
        self.handlers.note_off = Some(callback);
    }

    /// Feeds the receiver one byte from the serial stream.
    ///
    /// Completing a message invokes the matching callback synchronously, so callbacks must be
    /// quick: any byte arriving while a callback runs is the transport's to buffer or lose.
    /// Every other outcome is silent. An unsupported status byte is discarded where it stands,
    /// and a status byte arriving where message data was expected is discarded along with the
    /// message in flight; the next supported status byte starts a clean cycle.
    pub fn receive(&mut self, byte: u8) {
        match self.state {
            RxState::AwaitingStatus => {
                // Filtering up front spares the receiver from walking unhandled messages
                // through the data cycle. Supporting more message kinds means classifying by
                // command here and tracking a per-kind data byte count, not just widening the
                // filter.
                if !is_note_on_or_off(byte) {
                    return;
                }

                self.message.status = byte;
                self.state = RxState::AwaitingData1;
            }
            RxState::AwaitingData1 => {
                if !is_data(byte) {
                    // bytes went missing somewhere; drop the message in flight and wait for a
                    // fresh status byte
                    self.state = RxState::AwaitingStatus;
                    return;
                }

                self.message.data1 = byte;
                self.state = RxState::AwaitingData2;
            }
            RxState::AwaitingData2 => {
                if !is_data(byte) {
                    self.state = RxState::AwaitingStatus;
                    return;
                }

                self.message.data2 = byte;
                self.state = RxState::AwaitingStatus;
                self.handlers.dispatch(&self.message);
            }
        }
    }
}
