//! Display-string formatting.
//!
//! Converts a cell's stored scalar into its display string according to
//! the cell's format and style. Serial dates use the Excel-compatible
//! 1900 system: serial 1 = Jan 1, 1900, including the phantom leap day at
//! serial 60 (Excel incorrectly treats 1900 as a leap year).

use crate::types::{Cell, CellContent, DateStyle, DateTimeStyle, NumberFormat, TimeStyle, Value};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The display string for a cell: empty cells render as "", text as-is,
/// errored formulas as their fixed token, and numeric values per the
/// cell's format.
#[must_use]
pub fn display_value(cell: &Cell) -> String {
    match &cell.content {
        CellContent::Empty => String::new(),
        CellContent::Text(s) => s.clone(),
        CellContent::Number(n) => format_number(*n, cell.format.format, cell.format.precision),
        CellContent::Formula { cache, .. } => match cache {
            Some(Ok(Value::Text(s))) => s.clone(),
            Some(Ok(Value::Number(n))) => {
                format_number(*n, cell.format.format, cell.format.precision)
            }
            Some(Err(err)) => err.token().to_string(),
            None => String::new(),
        },
    }
}

/// Format a numeric value under a format and precision.
#[must_use]
pub fn format_number(value: f64, format: NumberFormat, precision: u8) -> String {
    match format {
        NumberFormat::General | NumberFormat::Number => format_general(value, precision),
        NumberFormat::Percentage => {
            format!("{:.prec$}%", value * 100.0, prec = usize::from(precision))
        }
        NumberFormat::Currency => format_currency(value),
        NumberFormat::Date(style) => {
            let (y, m, d, ..) = serial_to_components(value);
            format_date(y, m, d, style)
        }
        NumberFormat::Time(style) => {
            let (_, _, _, h, min, s) = serial_to_components(value);
            format_time(h, min, s, style)
        }
        NumberFormat::DateTime(style) => {
            let (y, m, d, h, min, s) = serial_to_components(value);
            format_datetime(y, m, d, h, min, s, style)
        }
    }
}

/// Fixed-point at `precision` decimals with trailing zeros (and a bare
/// trailing `.`) stripped.
fn format_general(value: f64, precision: u8) -> String {
    let s = format!("{:.prec$}", value, prec = usize::from(precision));
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Currency is always two decimals; the sign leads the `$`.
fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}

fn format_date(year: i32, month: u32, day: u32, style: DateStyle) -> String {
    let month_name = month_name(month);
    match style {
        DateStyle::MonthDayYear => format!("{month:02}/{day:02}/{year:04}"),
        DateStyle::DayMonthYear => format!("{day:02}/{month:02}/{year:04}"),
        DateStyle::Iso => format!("{year:04}-{month:02}-{day:02}"),
        DateStyle::MonthDayYearShort => {
            format!("{month:02}/{day:02}/{:02}", year.rem_euclid(100))
        }
        DateStyle::MonthNameDayYear => format!("{month_name} {day:02}, {year:04}"),
        DateStyle::DayMonthNameYear => format!("{day:02} {month_name} {year:04}"),
        DateStyle::YearMonthNameDay => format!("{year:04} {month_name} {day:02}"),
    }
}

fn format_time(hour: u32, minute: u32, second: u32, style: TimeStyle) -> String {
    let (h12, ampm) = twelve_hour(hour);
    match style {
        TimeStyle::Hour12 => format!("{h12}:{minute:02} {ampm}"),
        TimeStyle::Hour24 => format!("{hour:02}:{minute:02}"),
        TimeStyle::Hour24Seconds => format!("{hour:02}:{minute:02}:{second:02}"),
        TimeStyle::Hour12Seconds => format!("{h12}:{minute:02}:{second:02} {ampm}"),
    }
}

fn format_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    style: DateTimeStyle,
) -> String {
    let (h12, ampm) = twelve_hour(hour);
    match style {
        DateTimeStyle::Short => format!(
            "{month}/{day}/{:02} {h12}:{minute:02} {ampm}",
            year.rem_euclid(100)
        ),
        DateTimeStyle::Long => format!(
            "{} {day:02}, {year:04} {h12}:{minute:02}:{second:02} {ampm}",
            month_name(month)
        ),
        DateTimeStyle::Iso => format!(
            "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}"
        ),
    }
}

fn twelve_hour(hour: u32) -> (u32, &'static str) {
    let ampm = if hour < 12 { "AM" } else { "PM" };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    (h12, ampm)
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???")
}

/// Convert a serial date to `(year, month, day, hour, minute, second)`.
///
/// Serial 1 maps to Jan 1, 1900 (JDN 2415021). Serials up to 60 sit
/// before Excel's phantom Feb 29, 1900; later serials shift down one day
/// to absorb it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn serial_to_components(serial: f64) -> (i32, u32, u32, u32, u32, u32) {
    let days = serial.floor() as i32;
    let time_frac = serial.fract().abs();

    let jdn = if days <= 60 {
        days + 2_415_020
    } else {
        days + 2_415_019
    };

    let (year, month, day) = jdn_to_ymd(jdn);

    let total_seconds = ((time_frac * 86_400.0).round() as u32).min(86_399);
    let hour = total_seconds / 3600;
    let minute = (total_seconds % 3600) / 60;
    let second = total_seconds % 60;

    (year, month, day, hour, minute, second)
}

/// Julian Day Number to (year, month, day) in the proleptic Gregorian
/// calendar (Richards' algorithm).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // month/day are in-range positives
fn jdn_to_ymd(jdn: i32) -> (i32, u32, u32) {
    let y = 4716;
    let j = 1401;
    let m = 2;
    let n = 12;
    let r = 4;
    let p = 1461;
    let v = 3;
    let u = 5;
    let s = 153;
    let w = 2;
    let b = 274_277;
    let c = -38;

    let jdn = i64::from(jdn);

    let f = jdn + j + (((4 * jdn + b) / 146_097) * 3) / 4 + c;
    let e = r * f + v;
    let g = (e % p) / r;
    let h = u * g + w;

    let day = (h % s) / u + 1;
    let month = ((h / s + m) % n) + 1;
    let year = (e / p) - y + (n + m - month) / n;

    (year as i32, month as u32, day as u32)
}
