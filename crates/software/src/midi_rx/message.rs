//! Provides the [`Message`] struct, one decoded channel voice message.

use super::status;
use wmidi::{Channel, Note, U7, Velocity};

/// One complete note message: a status byte and its two data bytes.
///
/// A single `Message` lives inside the receiver and is overwritten by each receive cycle, so a
/// completed message is only valid to read while its callback runs; nothing may hold onto it.
/// The raw bytes stay private; the accessors return [`wmidi`] types, which is the vocabulary the
/// rest of the device speaks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    pub(crate) status: u8,
    pub(crate) data1: u8,
    pub(crate) data2: u8,
}

impl Message {
    /// Constructs an empty message for the receiver to fill.
    pub(crate) fn new() -> Self {
        Self {
            status: 0,
            data1: 0,
            data2: 0,
        }
    }

    /// The raw status byte: message kind in the high nibble, channel in the low nibble.
    pub fn status(&self) -> u8 {
        self.status
    }

    /// The channel the message was addressed to.
    pub fn channel(&self) -> Channel {
        Channel::from_index(status::channel(self.status))
            .expect("the low nibble of a status byte should always be a valid channel index")
    }

    /// The key the message concerns, carried in the first data byte.
    pub fn note(&self) -> Note {
        // the receiver only stores bytes with the high bit clear, so the conversion never
        // actually loses anything
        Note::from(U7::from_u8_lossy(self.data1))
    }

    /// How forcefully the key was struck or released, carried in the second data byte.
    pub fn velocity(&self) -> Velocity {
        U7::from_u8_lossy(self.data2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_comes_from_the_low_nibble() {
        let message = Message {
            status: 0x93,
            data1: 60,
            data2: 64,
        };
        assert_eq!(Channel::Ch4, message.channel(), "Expected left but got right");
    }

    #[test]
    fn note_comes_from_the_first_data_byte() {
        let message = Message {
            status: 0x90,
            data1: 60,
            data2: 64,
        };
        assert_eq!(Note::C4, message.note(), "Expected left but got right");
    }

    #[test]
    fn velocity_comes_from_the_second_data_byte() {
        let message = Message {
            status: 0x90,
            data1: 60,
            data2: 127,
        };
        assert_eq!(
            U7::from_u8_lossy(127),
            message.velocity(),
            "Expected left but got right"
        );
    }
}
