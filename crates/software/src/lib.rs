//! This crate contains architecture-agnostic logic for the Troubadour, a device which lets synthesizer
//! hardware from before the digital era be played over the 5-pin serial flavor of
//! [MIDI](https://midi.org/midi-1-0) by decoding Note On and Note Off messages into
//! [gate](https://en.wikipedia.org/wiki/CV/gate)-style events.
//!
//! The heart of the crate is [`midi_rx::NoteReceiver`], a byte-at-a-time decoder built for transports
//! that hand over one byte per receive interrupt and buffer nothing behind it.

#![deny(missing_docs)]
#![no_std]

pub mod configuration;

pub mod midi_rx;
