//! Cell formatting: number formats, date/time styles, alignment, colors.

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a cell's display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
    #[default]
    Right,
}

/// Date rendering styles, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateStyle {
    /// MM/DD/YYYY
    #[default]
    MonthDayYear,
    /// DD/MM/YYYY
    DayMonthYear,
    /// YYYY-MM-DD
    Iso,
    /// MM/DD/YY
    MonthDayYearShort,
    /// Mon DD, YYYY
    MonthNameDayYear,
    /// DD Mon YYYY
    DayMonthNameYear,
    /// YYYY Mon DD
    YearMonthNameDay,
}

impl DateStyle {
    /// Next style in the fixed cycle order, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::MonthDayYear => Self::DayMonthYear,
            Self::DayMonthYear => Self::Iso,
            Self::Iso => Self::MonthDayYearShort,
            Self::MonthDayYearShort => Self::MonthNameDayYear,
            Self::MonthNameDayYear => Self::DayMonthNameYear,
            Self::DayMonthNameYear => Self::YearMonthNameDay,
            Self::YearMonthNameDay => Self::MonthDayYear,
        }
    }
}

/// Time rendering styles, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeStyle {
    /// h:mm AM/PM
    #[default]
    Hour12,
    /// HH:MM
    Hour24,
    /// HH:MM:SS
    Hour24Seconds,
    /// h:mm:ss AM/PM
    Hour12Seconds,
}

impl TimeStyle {
    /// Next style in the fixed cycle order, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Hour12 => Self::Hour24,
            Self::Hour24 => Self::Hour24Seconds,
            Self::Hour24Seconds => Self::Hour12Seconds,
            Self::Hour12Seconds => Self::Hour12,
        }
    }
}

/// Combined date+time rendering styles, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateTimeStyle {
    /// M/D/YY h:MM AM/PM
    #[default]
    Short,
    /// Mon DD, YYYY h:MM:SS AM/PM
    Long,
    /// YYYY-MM-DDTHH:MM:SS
    Iso,
}

impl DateTimeStyle {
    /// Next style in the fixed cycle order, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Short => Self::Long,
            Self::Long => Self::Iso,
            Self::Iso => Self::Short,
        }
    }
}

/// How a cell's numeric value is rendered. Date/time formats carry their
/// style; a style only exists under its format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberFormat {
    #[default]
    General,
    Number,
    Percentage,
    Currency,
    Date(DateStyle),
    Time(TimeStyle),
    DateTime(DateTimeStyle),
}

impl NumberFormat {
    /// For date/time/datetime formats, advance to the next style in the
    /// cycle. Other formats are returned unchanged.
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::Date(style) => Self::Date(style.next()),
            Self::Time(style) => Self::Time(style.next()),
            Self::DateTime(style) => Self::DateTime(style.next()),
            other => other,
        }
    }
}

/// Per-cell presentation state. Preserved across content clears, copies,
/// and undo/redo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFormat {
    /// Display column width hint.
    pub width: u16,
    /// Decimal places for general/number/percentage rendering.
    pub precision: u8,
    pub align: Align,
    pub format: NumberFormat,
    /// Console color index, `None` = terminal default.
    pub text_color: Option<u8>,
    /// Console color index, `None` = terminal default.
    pub background_color: Option<u8>,
}

impl Default for CellFormat {
    fn default() -> Self {
        Self {
            width: 10,
            precision: 2,
            align: Align::Right,
            format: NumberFormat::General,
            text_color: None,
            background_color: None,
        }
    }
}
