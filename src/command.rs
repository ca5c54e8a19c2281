//! Command-line command grammar.
//!
//! Parses the status-line commands the presenter collects into typed
//! [`Command`] values. Parse failures come back as the user-facing notice
//! string for the status line.

use crate::chart::ChartKind;
use crate::color::parse_color;
use crate::types::{DateStyle, DateTimeStyle, NumberFormat, TimeStyle};

/// CSV save/load behavior: `flatten` emits display values, `preserve`
/// keeps formula sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvMode {
    Flatten,
    Preserve,
}

/// Which color a `clrtx`/`clrbg` command sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Text,
    Background,
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    SaveCsv { path: String, mode: CsvMode },
    LoadCsv { path: String, mode: CsvMode },
    /// Apply a format to the current cell, or to the whole selection.
    Format { format: NumberFormat, range: bool },
    /// Set text or background color on the current cell or selection.
    Color {
        target: ColorTarget,
        color: u8,
        range: bool,
    },
    Chart(ChartKind),
}

/// Parse one command line. The error is the status-line notice.
pub fn parse_command(input: &str) -> Result<Command, String> {
    let mut words = input.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".to_string());
    };

    // A leading `range` keyword turns format/color commands into
    // selection-wide variants.
    let (head, range) = if head.eq_ignore_ascii_case("range") {
        match words.next() {
            Some(next) => (next, true),
            None => return Err("range: missing command".to_string()),
        }
    } else {
        (head, false)
    };

    match head.to_ascii_lowercase().as_str() {
        "q" | "quit" => Ok(Command::Quit),
        "savecsv" => {
            let (path, mode) = path_and_mode(&mut words)?;
            Ok(Command::SaveCsv { path, mode })
        }
        "loadcsv" => {
            let (path, mode) = path_and_mode(&mut words)?;
            Ok(Command::LoadCsv { path, mode })
        }
        "format" => {
            let kind = words.next().ok_or("format: missing type")?;
            let format = parse_format(kind, words.next())?;
            Ok(Command::Format { format, range })
        }
        "clrtx" => parse_color_command(ColorTarget::Text, words.next(), range),
        "clrbg" => parse_color_command(ColorTarget::Background, words.next(), range),
        "chart" => {
            let kind = words.next().ok_or("chart: missing kind")?;
            ChartKind::from_name(kind)
                .map(Command::Chart)
                .ok_or_else(|| format!("unknown chart kind: {kind}"))
        }
        other => Err(format!("unrecognized command: {other}")),
    }
}

fn path_and_mode<'a>(
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<(String, CsvMode), String> {
    let path = words.next().ok_or("missing file path")?.to_string();
    let mode = match words.next() {
        None => CsvMode::Flatten,
        Some(m) if m.eq_ignore_ascii_case("flatten") => CsvMode::Flatten,
        Some(m) if m.eq_ignore_ascii_case("preserve") => CsvMode::Preserve,
        Some(other) => return Err(format!("unknown csv mode: {other}")),
    };
    Ok((path, mode))
}

fn parse_color_command(
    target: ColorTarget,
    arg: Option<&str>,
    range: bool,
) -> Result<Command, String> {
    let arg = arg.ok_or("missing color")?;
    match parse_color(arg) {
        Some(color) => Ok(Command::Color {
            target,
            color,
            range,
        }),
        None => Err(format!("Invalid color: {arg}")),
    }
}

/// Map a `format` command's type and optional style words onto a
/// [`NumberFormat`].
fn parse_format(kind: &str, style: Option<&str>) -> Result<NumberFormat, String> {
    let style_lc = style.map(str::to_ascii_lowercase);
    let style = style_lc.as_deref();
    match kind.to_ascii_lowercase().as_str() {
        "general" => Ok(NumberFormat::General),
        "number" => Ok(NumberFormat::Number),
        "percentage" => Ok(NumberFormat::Percentage),
        "currency" => Ok(NumberFormat::Currency),
        "date" => Ok(NumberFormat::Date(match style {
            None | Some("mm/dd/yyyy") => DateStyle::MonthDayYear,
            Some("dd/mm/yyyy") => DateStyle::DayMonthYear,
            Some("yyyy-mm-dd" | "iso") => DateStyle::Iso,
            Some("mm/dd/yy") => DateStyle::MonthDayYearShort,
            Some("mon-dd-yyyy") => DateStyle::MonthNameDayYear,
            Some("dd-mon-yyyy") => DateStyle::DayMonthNameYear,
            Some("yyyy-mon-dd") => DateStyle::YearMonthNameDay,
            Some(other) => return Err(format!("unknown date style: {other}")),
        })),
        "time" => Ok(NumberFormat::Time(match style {
            None | Some("12hr") => TimeStyle::Hour12,
            Some("24hr") => TimeStyle::Hour24,
            Some("24hr-seconds") => TimeStyle::Hour24Seconds,
            Some("12hr-seconds") => TimeStyle::Hour12Seconds,
            Some(other) => return Err(format!("unknown time style: {other}")),
        })),
        "datetime" => Ok(NumberFormat::DateTime(match style {
            None | Some("short") => DateTimeStyle::Short,
            Some("long") => DateTimeStyle::Long,
            Some("iso") => DateTimeStyle::Iso,
            Some(other) => return Err(format!("unknown datetime style: {other}")),
        })),
        other => Err(format!("unknown format: {other}")),
    }
}
