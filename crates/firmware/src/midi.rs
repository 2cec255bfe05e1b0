//! The task which turns received UART bytes into note events.

use defmt::warn;
use embassy_stm32::usart::RingBufferedUartRx;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use troubadour_lib::midi_rx::NoteReceiver;
use wmidi::{Note, Velocity};

/// How many decoded events may wait while the gate task is busy.
///
/// A performer outpaces the gate task only in bursts (the notes of a chord landing within a
/// millisecond or two), so a shallow queue is plenty.
const NOTE_EVENT_QUEUE_DEPTH: usize = 16;

/// Queues decoded note events between the receive task and the task expressing them.
pub static NOTE_EVENTS: Channel<CriticalSectionRawMutex, NoteEvent, NOTE_EVENT_QUEUE_DEPTH> =
    Channel::new();

/// A decoded note event, ready to be expressed on the device's outputs.
#[derive(Clone, Copy)]
pub enum NoteEvent {
    /// A key was struck.
    On(wmidi::Channel, Note, Velocity),
    /// A key was released.
    Off(wmidi::Channel, Note, Velocity),
}

/// Task responsible for decoding the serial MIDI input.
///
/// Bytes come out of the DMA ring buffer in whatever clumps scheduling latency produces, but the
/// decoder is fed strictly one byte at a time, so a clump holding the tail of one message and the
/// head of the next decodes the same as bytes trickling in off the wire.
#[embassy_executor::task]
pub async fn receive_midi(mut rx: RingBufferedUartRx<'static>) -> ! {
    // The callbacks run inside the receive loop, so they only hand the event off; expressing it
    // is another task's job. A full queue drops the event rather than stall byte consumption.
    let mut queue_note_on = |channel: wmidi::Channel, note: Note, velocity: Velocity| {
        if NOTE_EVENTS.try_send(NoteEvent::On(channel, note, velocity)).is_err() {
            warn!("Note event queue is full, dropping Note On");
        }
    };
    let mut queue_note_off = |channel: wmidi::Channel, note: Note, velocity: Velocity| {
        if NOTE_EVENTS.try_send(NoteEvent::Off(channel, note, velocity)).is_err() {
            warn!("Note event queue is full, dropping Note Off");
        }
    };

    let mut receiver = NoteReceiver::new();
    receiver.on_note_on(&mut queue_note_on);
    receiver.on_note_off(&mut queue_note_off);

    let mut buf = [0_u8; 16];
    loop {
        match rx.read(&mut buf).await {
            Ok(received) => {
                for &byte in &buf[..received] {
                    receiver.receive(byte);
                }
            }
            // An overrun means bytes were lost, which the decoder recovers from on its own; all
            // that is needed here is to read again, restarting the transfer.
            Err(e) => warn!("UART receive error: {}", e),
        }
    }
}
