//! Troubadour is [Embassy](https://embassy.dev)-based firmware for a serial MIDI input adapter aimed
//! at analog synthesizers that predate digital control. The firmware runs on the [Nucleo-F767ZI
//! development board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html), which is powered
//! by an F7-series STM32 microcontroller.
//!
//! A 5-pin DIN MIDI input lands on a UART at the 31,250 baud the protocol fixes. A receive task
//! feeds the incoming bytes, one at a time, to the decoder in [`troubadour_lib`], which calls back
//! with Note On and Note Off events; those are queued to a task that expresses them on a gate
//! output and the board's LEDs. The gate's electrical sense is selectable at runtime, because the
//! synthesizers this device targets split between ordinary positive gates and Moog-style switch
//! triggers.
//!
//! For details about the hardware or how to use the device, see the `README`.

#![no_std]
#![no_main]

mod gate;
mod midi;
mod polarity;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::{
    Config, bind_interrupts,
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
    peripherals,
    time::Hertz,
    usart::{self, UartRx},
};
use static_cell::StaticCell;

use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(
    #[doc(hidden)]
    struct Irqs {
        USART6 => usart::InterruptHandler<peripherals::USART6>;
    }
);

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing Troubadour");

    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        // hse: high-speed external clock
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });

        // pll: phase-locked loop, crucial for dividing clock
        config.rcc.pll_src = PllSource::HSE;
        config.rcc.pll = Some(Pll {
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL216,
            divp: Some(PllPDiv::DIV2), // 8mhz / 4 * 216 / 2 = 216Mhz
            divq: None,
            divr: None,
        });
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV4;
        config.rcc.apb2_pre = APBPrescaler::DIV2;
        config.rcc.sys = Sysclk::PLL1_P;
    }
    let p = embassy_stm32::init(config);

    // MIDI is plain 8-N-1 serial; only the baud rate is the protocol's own.
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = 31_250;

    // PG9 is exposed as D0 (RX) on the Nucleo's Arduino connector, which is where the DIN
    // socket's optocoupler lands.
    let rx = unwrap!(UartRx::new(p.USART6, Irqs, p.PG9, p.DMA2_CH1, uart_config));

    // The UART itself buffers a single byte, which at MIDI rates is roughly 320us of grace.
    // Receiving by DMA into a ring buffer decouples the wire from executor scheduling latency.
    static RX_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();
    let rx = rx.into_ring_buffered(RX_BUFFER.init([0; 64]));

    unwrap!(spawner.spawn(midi::receive_midi(rx)));

    let button = ExtiInput::new(p.PC13, p.EXTI13, Pull::None);
    let blue_led = Output::new(p.PB7, Level::Low, Speed::Low);
    let polarity_sender = polarity::GATE_POLARITY_SYNC.sender();
    unwrap!(spawner.spawn(polarity::select_gate_polarity(button, blue_led, polarity_sender)));

    let green_led = Output::new(p.PB0, Level::Low, Speed::Low);
    let gate_out = Output::new(p.PG0, Level::Low, Speed::Low);
    let polarity_receiver = polarity::GATE_POLARITY_SYNC
        .receiver()
        .expect("Gate polarity synchronizer should have a receiver available");
    unwrap!(spawner.spawn(gate::drive_gate(gate_out, green_led, polarity_receiver)));
}
