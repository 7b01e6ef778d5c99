//! Command line and environment configuration.

use std::time::Duration;

use clap::Parser;
use co2mon_hid_protocol::{CO2_MONITOR_PRODUCT_ID, CO2_MONITOR_VENDOR_ID, DeviceKey};

/// Default time between two emitted snapshots.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Poll a USB CO₂ monitor and print a JSON snapshot of the latest readings
/// on every interval.
#[derive(Parser, Debug)]
#[command(name = "co2mon", version)]
pub struct Cli {
    /// Time between snapshots, e.g. 5s, 1.5s, 500ms, 1m30s (bare numbers are seconds)
    #[arg(
        short,
        long,
        env = "CO2MON_INTERVAL",
        default_value = "5s",
        value_parser = parse_interval
    )]
    pub interval: Duration,

    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::with_interval(self.interval)
    }

    /// Log filter directive for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Everything the monitor needs to run. Only the interval is configurable;
/// the device identity and key are fixed for this hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub key: DeviceKey,
    pub interval: Duration,
}

impl MonitorConfig {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            vendor_id: CO2_MONITOR_VENDOR_ID,
            product_id: CO2_MONITOR_PRODUCT_ID,
            key: DeviceKey::DEFAULT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Longest accepted interval between snapshots.
pub const MAX_INTERVAL: Duration = Duration::from_secs(7 * 24 * 3600);

const NANOS_PER_SEC: u128 = 1_000_000_000;
// Fraction digits beyond nanosecond precision of any unit are dropped.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse an interval such as `5s`, `1.5s`, `250ms`, `500us`, `2m`, `1h` or
/// `2h45m`.
///
/// A bare number is taken as seconds. Zero is rejected since the ticker
/// cannot run with a zero period, and anything above [`MAX_INTERVAL`] is
/// rejected as well.
pub fn parse_interval(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("interval must not be empty".to_string());
    }

    let nanos = if input.chars().all(|c| c.is_ascii_digit() || c == '.') {
        parse_quantity(input, input, NANOS_PER_SEC)?
    } else {
        parse_compound(input)?
    };

    if nanos == 0 {
        return Err(format!("invalid interval '{input}': must be greater than zero"));
    }
    if nanos > MAX_INTERVAL.as_nanos() {
        return Err(format!(
            "invalid interval '{input}': must not exceed {}s",
            MAX_INTERVAL.as_secs()
        ));
    }
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|e| format!("invalid interval '{input}': {e}"))
}

/// Sum of `<number><unit>` parts, in nanoseconds.
fn parse_compound(input: &str) -> Result<u128, String> {
    let mut total: u128 = 0;
    let mut rest = input;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_end == 0 {
            return Err(format!("invalid interval '{input}': expected a number"));
        }
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let scale = match unit {
            "" => return Err(format!("invalid interval '{input}': missing unit")),
            other => unit_nanos(other)
                .ok_or_else(|| format!("invalid interval '{input}': unknown unit '{other}'"))?,
        };
        total = total
            .checked_add(parse_quantity(input, number, scale)?)
            .ok_or_else(|| format!("invalid interval '{input}': too large"))?;
        rest = tail;
    }
    Ok(total)
}

/// `number` (digits with at most one decimal point) times `scale` nanoseconds.
fn parse_quantity(input: &str, number: &str, scale: u128) -> Result<u128, String> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains('.') || (whole.is_empty() && fraction.is_empty()) {
        return Err(format!("invalid interval '{input}': malformed number '{number}'"));
    }
    let too_large = || format!("invalid interval '{input}': too large");

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| too_large())?
    };
    let fraction = fraction.get(..MAX_FRACTION_DIGITS).unwrap_or(fraction);
    let fraction_value: u128 = if fraction.is_empty() {
        0
    } else {
        fraction.parse().map_err(|_| too_large())?
    };
    let fraction_scale = fraction.bytes().fold(1_u128, |acc, _| acc.saturating_mul(10));

    let whole_nanos = whole.checked_mul(scale).ok_or_else(too_large)?;
    let fraction_nanos = fraction_value
        .checked_mul(scale)
        .ok_or_else(too_large)?
        / fraction_scale;
    whole_nanos.checked_add(fraction_nanos).ok_or_else(too_large)
}
