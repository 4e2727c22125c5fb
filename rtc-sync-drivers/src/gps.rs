use crate::hardware::{GpsResources, Irqs};
use embassy_rp::uart::{BufferedUart, Config};
use embedded_io_async::Read;
use rtc_sync_core::{ClockBoard, NmeaIngest, info};
use static_cell::StaticCell;

/// Adafruit Ultimate GPS default rate.
pub const GPS_BAUD: u32 = 9600;

/// Brings up UART0 for the receiver. Call once; the buffers are static.
pub fn setup_gps_uart(r: GpsResources) -> BufferedUart {
    let mut config = Config::default();
    config.baudrate = GPS_BAUD;

    static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    let tx_buf = &mut TX_BUF.init([0; 64])[..];
    // The receiver sends its sentences in one burst per second.
    static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
    let rx_buf = &mut RX_BUF.init([0; 256])[..];

    let uart = BufferedUart::new(r.uart, r.tx, r.rx, Irqs, tx_buf, rx_buf, config);
    info!("GPS UART Initialized at {} baud", GPS_BAUD);
    uart
}

/// Reads the receiver forever, publishing every parsed sentence to `board`.
///
/// Runs whether or not the module is powered; while it is off the UART is
/// simply idle.
pub async fn run_gps_reader<R: Read>(rx: &mut R, board: &ClockBoard) -> ! {
    let mut ingest = NmeaIngest::new();
    let mut chunk = [0u8; 32];
    loop {
        match rx.read(&mut chunk).await {
            Ok(0) => {}
            Ok(n) => {
                ingest.feed(&chunk[..n], board);
            }
            // Overruns and framing errors lose at most the current sentence.
            Err(_) => ingest.read_failed(board),
        }
    }
}
