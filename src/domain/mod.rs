pub mod enums;
pub mod record;

pub use enums::{month_name, SummaryPeriod, Theme, UiMode};
pub use record::{
    elapsed_seconds, format_hms, format_timestamp, parse_timestamp, split_tags, TaskRecord,
    EDIT_FORMAT,
};
