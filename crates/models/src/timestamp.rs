use chrono::{DateTime, Local};

/// `2025-06-05 14:03:59`, used for `created_at` and comment timestamps.
pub fn display(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `20250605_140359`, used inside generated upload filenames.
pub fn compact(at: &DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

pub fn now_display() -> String {
    display(&Local::now())
}

pub fn now_compact() -> String {
    compact(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats() {
        let at = Local.with_ymd_and_hms(2025, 6, 5, 14, 3, 9).unwrap();
        assert_eq!(display(&at), "2025-06-05 14:03:09");
        assert_eq!(compact(&at), "20250605_140309");
    }
}
