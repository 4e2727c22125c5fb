// power.rs
use crate::types::PowerState;
use core::convert::Infallible;
use embedded_hal::digital::OutputPin;

/// Switches the GPS module's supply (a MOSFET on the ground side, active high).
///
/// The pin cannot fail and the module gives no feedback, so the recorded
/// state is exactly the level last driven.
pub struct PowerGate<P> {
    pin: P,
    state: PowerState,
}

impl<P: OutputPin<Error = Infallible>> PowerGate<P> {
    /// Takes the pin and drives it low so the recorded state matches hardware.
    pub fn new(mut pin: P) -> Self {
        pin.set_low().unwrap_or_else(|e| match e {});
        Self {
            pin,
            state: PowerState::Off,
        }
    }

    pub fn turn_on(&mut self) {
        self.pin.set_high().unwrap_or_else(|e| match e {});
        if self.state != PowerState::On {
            crate::debug!("GPS power on");
        }
        self.state = PowerState::On;
    }

    pub fn turn_off(&mut self) {
        self.pin.set_low().unwrap_or_else(|e| match e {});
        if self.state != PowerState::Off {
            crate::debug!("GPS power off");
        }
        self.state = PowerState::Off;
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn pin(&self) -> &P {
        &self.pin
    }

    /// Powers the module for the lifetime of the returned guard.
    pub fn power_up(&mut self) -> PoweredGps<'_, P> {
        self.turn_on();
        PoweredGps { gate: self }
    }
}

/// GPS power held on; dropping it (including by cancelling the owning
/// future) switches the module off.
pub struct PoweredGps<'a, P: OutputPin<Error = Infallible>> {
    gate: &'a mut PowerGate<P>,
}

impl<P: OutputPin<Error = Infallible>> PoweredGps<'_, P> {
    pub fn state(&self) -> PowerState {
        self.gate.state()
    }
}

impl<P: OutputPin<Error = Infallible>> Drop for PoweredGps<'_, P> {
    fn drop(&mut self) {
        self.gate.turn_off();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockPin;

    #[test]
    fn test_starts_off_and_drives_low() {
        let gate = PowerGate::new(MockPin::new());
        assert_eq!(gate.state(), PowerState::Off);
        assert_eq!(gate.pin.levels.as_slice(), &[false]);
    }

    #[test]
    fn test_on_then_off_leaves_off() {
        let mut gate = PowerGate::new(MockPin::new());
        gate.turn_on();
        gate.turn_off();
        assert_eq!(gate.state(), PowerState::Off);
        assert!(!gate.pin.is_high());
    }

    #[test]
    fn test_turn_on_is_idempotent() {
        let mut once = PowerGate::new(MockPin::new());
        once.turn_on();
        let mut twice = PowerGate::new(MockPin::new());
        twice.turn_on();
        twice.turn_on();
        assert_eq!(once.state(), twice.state());
        assert_eq!(twice.state(), PowerState::On);
        assert!(twice.pin.is_high());
    }

    #[test]
    fn test_guard_releases_power_on_drop() {
        let mut gate = PowerGate::new(MockPin::new());
        {
            let powered = gate.power_up();
            assert_eq!(powered.state(), PowerState::On);
        }
        assert_eq!(gate.state(), PowerState::Off);
        assert_eq!(gate.pin.levels.as_slice(), &[false, true, false]);
    }
}
