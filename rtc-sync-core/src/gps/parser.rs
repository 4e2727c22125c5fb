// gps/parser.rs
use crate::gps::types::{Coordinate, GpsDate, GpsFix, GpsSensorError, GpsTime, Hemisphere};
use heapless::Vec;

/// Longest line the framer keeps. NMEA caps sentences at 82 bytes.
pub const MAX_SENTENCE_LEN: usize = 128;

const MAX_FIELDS: usize = 24;

pub fn validate_checksum(line: &[u8]) -> bool {
    let mut parts = line.split(|&b| b == b'*');
    let payload = parts.next().unwrap_or(&[]);
    let checksum_hex = parts.next().unwrap_or(&[]);
    if payload.is_empty() || checksum_hex.len() < 2 {
        return false;
    }

    let mut calc = 0u8;
    let start = if payload.starts_with(b"$") { 1 } else { 0 };
    for &b in &payload[start..] {
        calc ^= b;
    }

    let prov = core::str::from_utf8(&checksum_hex[..2])
        .ok()
        .and_then(|s| u8::from_str_radix(s, 16).ok());
    prov == Some(calc)
}

/// Applies one checksummed sentence to `gps_fix`.
///
/// The update is all-or-nothing: the fix is only touched once every field the
/// sentence contributes has parsed, so readers never see half a sentence.
pub fn process_line(line: &[u8], gps_fix: &mut GpsFix) -> Result<(), GpsSensorError> {
    if !validate_checksum(line) {
        return Err(GpsSensorError::InvalidChecksum);
    }
    let Ok(sentence) = core::str::from_utf8(line) else {
        return Err(GpsSensorError::InvalidData);
    };

    let body = sentence.split('*').next().unwrap_or("");
    let fields: Vec<&str, MAX_FIELDS> = body.split(',').take(MAX_FIELDS).collect();
    let header = fields.first().copied().unwrap_or("");
    // "$" + two letter talker (GP, GN, GL, ...) + three letter type
    if header.len() != 6 || !header.is_ascii() || !header.starts_with('$') {
        return Err(GpsSensorError::InvalidData);
    }

    let mut next = *gps_fix;
    match &header[3..] {
        "RMC" => apply_rmc(&fields, &mut next)?,
        "GGA" => apply_gga(&fields, &mut next)?,
        "GLL" => apply_gll(&fields, &mut next)?,
        _ => return Err(GpsSensorError::Unsupported),
    }
    *gps_fix = next;
    Ok(())
}

// $xxRMC,time,status,lat,N/S,lon,E/W,speed,course,date,...
fn apply_rmc(fields: &[&str], gps_fix: &mut GpsFix) -> Result<(), GpsSensorError> {
    if fields.len() < 10 {
        return Err(GpsSensorError::InvalidData);
    }
    gps_fix.fix_valid = fields[2] == "A";
    if !gps_fix.fix_valid {
        // Receiver is still searching; keep the last known values.
        return Ok(());
    }
    gps_fix.time = Some(parse_time(fields[1])?);
    gps_fix.date = Some(parse_date(fields[9])?);
    gps_fix.latitude = Some(parse_latitude(fields[3], fields[4])?);
    gps_fix.longitude = Some(parse_longitude(fields[5], fields[6])?);
    Ok(())
}

// $xxGGA,time,lat,N/S,lon,E/W,quality,satellites,hdop,alt,...
fn apply_gga(fields: &[&str], gps_fix: &mut GpsFix) -> Result<(), GpsSensorError> {
    if fields.len() < 8 {
        return Err(GpsSensorError::InvalidData);
    }
    gps_fix.fix_valid = !fields[6].is_empty() && fields[6] != "0";
    gps_fix.satellites = fields[7].parse::<u8>().unwrap_or(0);
    if gps_fix.fix_valid {
        let time = parse_time(fields[1])?;
        gps_fix.latitude = Some(parse_latitude(fields[2], fields[3])?);
        gps_fix.longitude = Some(parse_longitude(fields[4], fields[5])?);
        set_undated_time(gps_fix, time);
    }
    Ok(())
}

// $xxGLL,lat,N/S,lon,E/W,time,status
fn apply_gll(fields: &[&str], gps_fix: &mut GpsFix) -> Result<(), GpsSensorError> {
    if fields.len() < 7 {
        return Err(GpsSensorError::InvalidData);
    }
    gps_fix.fix_valid = fields[6] == "A";
    if gps_fix.fix_valid {
        gps_fix.latitude = Some(parse_latitude(fields[1], fields[2])?);
        gps_fix.longitude = Some(parse_longitude(fields[3], fields[4])?);
        set_undated_time(gps_fix, parse_time(fields[5])?);
    }
    Ok(())
}

/// Time from a sentence without a date field. The date is only kept while
/// the time still matches the RMC it came from; a new epoch drops it until
/// the next RMC, so date and time always describe the same instant.
fn set_undated_time(gps_fix: &mut GpsFix, time: GpsTime) {
    if gps_fix.time != Some(time) {
        gps_fix.date = None;
    }
    gps_fix.time = Some(time);
}

fn two_digits(raw: &[u8]) -> Result<u8, GpsSensorError> {
    match raw {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Ok((a - b'0') * 10 + (b - b'0')),
        _ => Err(GpsSensorError::InvalidData),
    }
}

/// `hhmmss` with optional fractional seconds, which are dropped.
fn parse_time(raw: &str) -> Result<GpsTime, GpsSensorError> {
    let b = raw.as_bytes();
    if b.len() < 6 {
        return Err(GpsSensorError::InvalidData);
    }
    let hour = two_digits(&b[0..2])?;
    let minute = two_digits(&b[2..4])?;
    let second = two_digits(&b[4..6])?;
    if hour > 23 || minute > 59 || second > 59 {
        return Err(GpsSensorError::InvalidData);
    }
    Ok(GpsTime::new(hour, minute, second))
}

/// `ddmmyy`
fn parse_date(raw: &str) -> Result<GpsDate, GpsSensorError> {
    let b = raw.as_bytes();
    if b.len() != 6 {
        return Err(GpsSensorError::InvalidData);
    }
    let day = two_digits(&b[0..2])?;
    let month = two_digits(&b[2..4])?;
    let year = two_digits(&b[4..6])?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(GpsSensorError::InvalidData);
    }
    Ok(GpsDate::new(year as u16, month, day))
}

fn parse_latitude(raw: &str, dir: &str) -> Result<Coordinate, GpsSensorError> {
    let hemisphere = match dir {
        "N" => Hemisphere::North,
        "S" => Hemisphere::South,
        _ => return Err(GpsSensorError::InvalidData),
    };
    parse_coordinate(raw, hemisphere, 90)
}

fn parse_longitude(raw: &str, dir: &str) -> Result<Coordinate, GpsSensorError> {
    let hemisphere = match dir {
        "E" => Hemisphere::East,
        "W" => Hemisphere::West,
        _ => return Err(GpsSensorError::InvalidData),
    };
    parse_coordinate(raw, hemisphere, 180)
}

/// Splits an NMEA `[d]ddmm.mmmm` field into whole degrees and minutes.
fn parse_coordinate(
    raw: &str,
    hemisphere: Hemisphere,
    max_degrees: u16,
) -> Result<Coordinate, GpsSensorError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(GpsSensorError::InvalidData);
    }
    let dot_pos = raw.find('.').unwrap_or(raw.len());
    if dot_pos < 3 {
        return Err(GpsSensorError::InvalidData);
    }

    let degrees = raw[..dot_pos - 2]
        .parse::<u16>()
        .map_err(|_| GpsSensorError::InvalidData)?;
    let minutes = two_digits(raw[dot_pos - 2..dot_pos].as_bytes())? as u32;

    // Keep four fractional digits of minutes, padding short fields.
    let frac_str = raw.get(dot_pos + 1..).unwrap_or("");
    let frac_str = &frac_str[..frac_str.len().min(4)];
    let mut frac_val = if frac_str.is_empty() {
        0
    } else {
        frac_str
            .parse::<u32>()
            .map_err(|_| GpsSensorError::InvalidData)?
    };
    for _ in frac_str.len()..4 {
        frac_val *= 10;
    }

    if degrees > max_degrees || minutes > 59 {
        return Err(GpsSensorError::InvalidData);
    }

    Ok(Coordinate {
        degrees,
        minutes_e4: minutes * 10_000 + frac_val,
        hemisphere,
    })
}

/// Frames the UART byte stream into CR/LF terminated sentences.
pub struct SentenceBuffer {
    buf: [u8; MAX_SENTENCE_LEN],
    pos: usize,
    overflowed: bool,
}

impl SentenceBuffer {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; MAX_SENTENCE_LEN],
            pos: 0,
            overflowed: false,
        }
    }

    /// Feeds one byte. Returns the completed line when a terminator arrives.
    /// Lines that overflowed the buffer are dropped whole.
    pub fn push(&mut self, b: u8) -> Option<&[u8]> {
        match b {
            b'\r' | b'\n' => {
                let len = core::mem::replace(&mut self.pos, 0);
                let overflowed = core::mem::replace(&mut self.overflowed, false);
                if len > 0 && !overflowed {
                    Some(&self.buf[..len])
                } else {
                    None
                }
            }
            b'$' => {
                // Start of sentence always restarts framing.
                self.buf[0] = b;
                self.pos = 1;
                self.overflowed = false;
                None
            }
            _ => {
                if self.pos < self.buf.len() {
                    self.buf[self.pos] = b;
                    self.pos += 1;
                } else {
                    self.overflowed = true;
                }
                None
            }
        }
    }
}

impl Default for SentenceBuffer {
    fn default() -> Self {
        Self::new()
    }
}
