//! Controls the device's gate output and note activity indicator.

use crate::midi::{NOTE_EVENTS, NoteEvent};
use crate::polarity::GatePolarityReceiver;
use defmt::info;
use embassy_futures::select::{Either, select};
use embassy_stm32::gpio::{Level, Output};
use troubadour_lib::configuration::GatePolarity;

fn gate_level(polarity: GatePolarity, note_sounding: bool) -> Level {
    if polarity.output_is_high(note_sounding) {
        Level::High
    } else {
        Level::Low
    }
}

/// Task responsible for expressing note events electrically.
///
/// The gate line follows the most recent event: any Note On opens it and any Note Off closes it,
/// which matches how the monophonic synthesizers this device targets treat their own keyboards.
/// The green LED mirrors note activity directly, so a performer can see the device hearing notes
/// even when the selected polarity leaves the gate line resting high.
#[embassy_executor::task]
pub async fn drive_gate(
    mut gate: Output<'static>,
    mut led: Output<'static>,
    mut polarity: GatePolarityReceiver<'static>,
) -> ! {
    // drive the line to its resting level for the power-on selection, so a synth plugged in
    // before any MIDI arrives doesn't hear a phantom note
    let mut note_sounding = false;
    gate.set_level(gate_level(polarity.get().await, note_sounding));

    loop {
        let selected_polarity = match select(NOTE_EVENTS.receive(), polarity.changed()).await {
            Either::First(event) => {
                match event {
                    NoteEvent::On(channel, note, velocity) => {
                        info!(
                            "Gate opening for note {} on channel {} (velocity {})",
                            note.to_str(),
                            channel.number(),
                            u8::from(velocity)
                        );
                        note_sounding = true;
                    }
                    NoteEvent::Off(channel, note, _) => {
                        info!(
                            "Gate closing for note {} on channel {}",
                            note.to_str(),
                            channel.number()
                        );
                        note_sounding = false;
                    }
                }
                polarity.get().await
            }
            Either::Second(new_polarity) => new_polarity,
        };

        gate.set_level(gate_level(selected_polarity, note_sounding));
        if note_sounding {
            led.set_high();
        } else {
            led.set_low();
        }
    }
}
