#![no_std]
#![no_main]

#[cfg(not(feature = "rp2040"))]
compile_error!("Please use the chip alias:\n  - For Pico (RP2040):   cargo run-pico");

#[cfg(all(feature = "rp2040", not(target_arch = "arm")))]
compile_error!("Mismatched target for RP2040! Please use 'cargo run-pico'");

use core::cell::RefCell;
use cortex_m_rt::entry;
use defmt::unwrap;
use embassy_executor::{Executor, Spawner};
use embassy_rp::gpio::{Level, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use rtc_sync_core::{ClockBoard, Orchestrator, PowerGate, SharedRtc, info, run_telemetry};
use rtc_sync_drivers::hardware::{AssignedResources, GpsResources, PowerResources};
use rtc_sync_drivers::{RpRtc, run_gps_reader, setup_gps_uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod config;

type BoardRtc = SharedRtc<CriticalSectionRawMutex, RpRtc>;

static BOARD: ClockBoard = ClockBoard::new();
static RTC: StaticCell<BoardRtc> = StaticCell::new();
static EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[embassy_executor::task]
async fn gps_task(r: GpsResources) -> ! {
    let uart = setup_gps_uart(r);
    let (_tx, mut rx) = uart.split();
    run_gps_reader(&mut rx, &BOARD).await
}

/// Owns the GPS power switch. Telemetry is spawned from here once the first
/// synchronisation attempt has finished.
#[embassy_executor::task]
async fn clock_task(spawner: Spawner, power: PowerResources, rtc: &'static BoardRtc) -> ! {
    let gate = PowerGate::new(Output::new(power.gate, Level::Low));
    let orchestrator = Orchestrator::new(&BOARD, rtc, gate, Delay, config::SYNC_POLICY);
    orchestrator
        .run(|| spawner.spawn(unwrap!(telemetry_task(rtc))))
        .await
}

#[embassy_executor::task]
async fn telemetry_task(rtc: &'static BoardRtc) -> ! {
    let mut delay = Delay;
    run_telemetry(
        &BOARD,
        rtc,
        config::LOCAL_UTC_OFFSET_HOURS,
        config::SYNC_POLICY.telemetry_interval_ms,
        &mut delay,
    )
    .await
}

#[entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    let r = AssignedResources::take(p);

    let rtc = RTC.init(SharedRtc::new(RefCell::new(RpRtc::new(r.RtcResources.rtc))));
    info!(
        "rtc-sync starting, local offset {} h",
        config::LOCAL_UTC_OFFSET_HOURS
    );

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(unwrap!(gps_task(r.GpsResources)));
        spawner.spawn(unwrap!(clock_task(spawner, r.PowerResources, rtc)));
    });
}
