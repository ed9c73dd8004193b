use time::OffsetDateTime;
use time::macros::format_description;

/// Format `at` as `YYYYMMDD_HHMMSS` for use in a file name.
pub fn conversation_stamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year][month][day]_[hour][minute][second]");
    // Every component of the description is defined for any OffsetDateTime.
    at.format(format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}
