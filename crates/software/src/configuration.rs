//! This module contains both user-configurable settings (implemented as enums) and traits to make them easier to work with in code.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

/// A trait which allows infinite cycling of an enum's variants.
///
/// Useful for pushbutton user interfaces, allowing presses to advance from the current to the next variant,
/// cycling back to the beginning when all variants have been exhausted.
pub trait CycleConfig {
    /// Return the next variant, cycling back to the beginning as needed.
    fn cycle(self) -> Self
    where
        Self: FromPrimitive + ToPrimitive + Sized,
    {
        let index = self
            .to_u8()
            .expect("enum variants should be castable to u8");
        match <Self as FromPrimitive>::from_u8(index + 1) {
            Some(new_selection) => new_selection,
            None => FromPrimitive::from_u8(0).expect("enum should not be empty"),
        }
    }
}

/// Determines the electrical sense of the gate output while a note sounds.
///
/// Synthesizers disagree about what a gate looks like. Most expect a positive gate: the line
/// rests low and swings high for as long as a key is down. Moog hardware of the Micromoog era
/// instead expects a switch trigger ("S-Trig"): the line rests high and is pulled low while a
/// key is down. Driving a synth with the wrong sense leaves it droning when it should rest, so
/// the selection belongs to the performer, not the firmware.
#[derive(Debug, Default, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatePolarity {
    /// Positive gate: the output is driven high while a note sounds.
    Gate,
    /// Switch trigger: the output is driven low while a note sounds.
    #[default]
    SwitchTrigger,
}

impl GatePolarity {
    /// Returns true if the output line should be driven high, given whether a note currently
    /// sounds.
    pub fn output_is_high(&self, note_sounding: bool) -> bool {
        match self {
            Self::Gate => note_sounding,
            Self::SwitchTrigger => !note_sounding,
        }
    }
}

impl CycleConfig for GatePolarity {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, ToPrimitive, FromPrimitive, PartialEq)]
    enum Alpha {
        A,
        B,
        C,
    }
    impl CycleConfig for Alpha {}

    #[test]
    fn cycle() {
        let config = Alpha::A.cycle();
        assert_eq!(
            Alpha::B,
            config,
            "Should advance to next variant; expected left but got right"
        );

        let config = config.cycle();
        assert_eq!(
            Alpha::C,
            config,
            "Should advance to next variant; expected left but got right"
        );

        let config = config.cycle();
        assert_eq!(
            Alpha::A,
            config,
            "Should wrap around to first variant; expected left but got right"
        );
    }

    mod gate_polarity {
        use super::*;

        #[test]
        fn cycle_wraps_between_the_two_senses() {
            assert_eq!(
                GatePolarity::SwitchTrigger,
                GatePolarity::Gate.cycle(),
                "Expected left but got right"
            );
            assert_eq!(
                GatePolarity::Gate,
                GatePolarity::SwitchTrigger.cycle(),
                "Should wrap around to first variant; expected left but got right"
            );
        }

        #[test]
        fn positive_gate_follows_the_note() {
            assert!(GatePolarity::Gate.output_is_high(true), "Should drive high while sounding");
            assert!(!GatePolarity::Gate.output_is_high(false), "Should rest low");
        }

        #[test]
        fn switch_trigger_inverts_the_note() {
            assert!(
                !GatePolarity::SwitchTrigger.output_is_high(true),
                "Should pull low while sounding"
            );
            assert!(GatePolarity::SwitchTrigger.output_is_high(false), "Should rest high");
        }
    }
}
