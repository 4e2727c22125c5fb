use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart;

// Re-export the resource mapping macro
pub use crate::assign_resources;

bind_interrupts!(pub struct Irqs {
    UART0_IRQ => uart::BufferedInterruptHandler<UART0>;
});

// Pico pin map: GPS TX -> GP13 (UART0 RX), GPS RX <- GP12 (UART0 TX),
// GPS power MOSFET gate on GP15.
assign_resources! {
    GpsResources {
        uart: UART0,
        tx: PIN_12,
        rx: PIN_13,
    }
    PowerResources {
        gate: PIN_15,
    }
    RtcResources {
        rtc: RTC,
    }
}
