use chrono::Month;

/// Colour scheme preference, persisted in the settings table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    /// Parse from the stored `dark_mode` setting value
    pub fn from_setting(value: &str) -> Self {
        if value.eq_ignore_ascii_case("false") {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// Convert to the stored `dark_mode` setting value
    pub fn to_setting(&self) -> &'static str {
        match self {
            Self::Dark => "true",
            Self::Light => "false",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Which summary the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    Daily,
    Weekly,
    Monthly,
    /// A whole calendar month (month 1-12)
    Month { month: u32, year: i32 },
}

impl SummaryPeriod {
    /// Title printed at the top of the report
    pub fn title(&self) -> String {
        match self {
            Self::Daily => "Daily Summary".to_string(),
            Self::Weekly => "Weekly Summary".to_string(),
            Self::Monthly => "Monthly Summary".to_string(),
            Self::Month { month, year } => {
                format!("{} {} Summary", month_name(*month).unwrap_or("Unknown"), year)
            }
        }
    }
}

/// English name of a 1-based month number
pub fn month_name(month: u32) -> Option<&'static str> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
}

/// UI mode for the terminal application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    /// Typing a new task name/tags
    EnteringTask,
    /// Editing an existing history row
    EditingTask,
    /// Showing a rendered summary
    Summary,
    /// Picking month/year for a custom summary
    MonthPicker,
    /// Asking before deleting a history row
    ConfirmDelete,
}
