//! Tasks and types related to the gate polarity selection.

use defmt::info;
use embassy_stm32::{exti::ExtiInput, gpio::Output};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    watch::{Receiver, Sender, Watch},
};
use troubadour_lib::configuration::{CycleConfig, GatePolarity};

const GATE_POLARITY_RECEIVER_CNT: usize = 1;
/// Syncs the gate polarity selection across tasks.
pub static GATE_POLARITY_SYNC: Watch<
    CriticalSectionRawMutex,
    GatePolarity,
    GATE_POLARITY_RECEIVER_CNT,
> = Watch::new_with(GatePolarity::SwitchTrigger);
pub type GatePolaritySender<'a> =
    Sender<'a, CriticalSectionRawMutex, GatePolarity, GATE_POLARITY_RECEIVER_CNT>;
pub type GatePolarityReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, GatePolarity, GATE_POLARITY_RECEIVER_CNT>;

/// Reflects a [`GatePolarity`] selection on its indicator LED.
///
/// The LED is lit while the switch trigger sense is selected, the selection most likely to
/// surprise a performer arriving with an ordinary positive-gate synth.
fn display_polarity(led: &mut Output<'static>, polarity: GatePolarity) {
    match polarity {
        GatePolarity::Gate => led.set_low(),
        GatePolarity::SwitchTrigger => led.set_high(),
    }
}

/// Handles button presses, cycling through the [`GatePolarity`] configurations.
#[embassy_executor::task]
pub async fn select_gate_polarity(
    mut button: ExtiInput<'static>,
    mut led: Output<'static>,
    polarity: GatePolaritySender<'static>,
) -> ! {
    // reflect the power-on selection before the first press
    display_polarity(
        &mut led,
        polarity
            .try_get()
            .expect("Gate polarity state should never be uninitialized"),
    );

    loop {
        button.wait_for_rising_edge().await;

        let new_state = polarity
            .try_get()
            .expect("Gate polarity state should never be uninitialized")
            .cycle();
        info!("Gate polarity changed to {}", new_state);
        polarity.send(new_state);
        display_polarity(&mut led, new_state);
    }
}
