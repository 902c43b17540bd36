use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Public-holiday lookup table. Read-only reference data maintained by HR;
/// calendar views filter it by date range.
#[derive(Debug, Serialize, ToSchema)]
pub struct Holiday {
    #[schema(example = "2026-01-26", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "Republic Day")]
    pub name: &'static str,
    #[serde(rename = "type")]
    #[schema(example = "national")]
    pub kind: &'static str,
}

const TABLE: &[(&str, &str, &str)] = &[
    ("2024-01-14", "Makar Sankranti", "public"),
    ("2024-01-26", "Republic Day", "national"),
    ("2024-03-08", "Maha Shivaratri", "public"),
    ("2024-03-25", "Holi", "public"),
    ("2024-03-29", "Good Friday", "public"),
    ("2024-04-11", "Eid ul-Fitr", "public"),
    ("2024-04-14", "Ambedkar Jayanti", "public"),
    ("2024-04-17", "Ram Navami", "public"),
    ("2024-04-21", "Mahavir Jayanti", "public"),
    ("2024-05-01", "Gujarat Day", "state"),
    ("2024-05-23", "Buddha Purnima", "public"),
    ("2024-06-17", "Eid ul-Adha", "public"),
    ("2024-08-15", "Independence Day", "national"),
    ("2024-08-26", "Janmashtami", "public"),
    ("2024-09-07", "Ganesh Chaturthi", "public"),
    ("2024-10-02", "Gandhi Jayanti", "national"),
    ("2024-10-12", "Dussehra", "public"),
    ("2024-10-31", "Diwali", "public"),
    ("2024-11-01", "Gujarati New Year", "state"),
    ("2024-11-15", "Guru Nanak Jayanti", "public"),
    ("2024-12-25", "Christmas", "public"),
    ("2025-01-14", "Makar Sankranti", "public"),
    ("2025-01-26", "Republic Day", "national"),
    ("2025-02-26", "Maha Shivaratri", "public"),
    ("2025-03-14", "Holi", "public"),
    ("2025-03-31", "Eid ul-Fitr", "public"),
    ("2025-04-06", "Ram Navami", "public"),
    ("2025-04-10", "Mahavir Jayanti", "public"),
    ("2025-04-14", "Ambedkar Jayanti", "public"),
    ("2025-04-18", "Good Friday", "public"),
    ("2025-05-01", "Gujarat Day", "state"),
    ("2025-05-12", "Buddha Purnima", "public"),
    ("2025-06-07", "Eid ul-Adha", "public"),
    ("2025-08-15", "Independence Day", "national"),
    ("2025-08-16", "Janmashtami", "public"),
    ("2025-08-27", "Ganesh Chaturthi", "public"),
    ("2025-10-02", "Gandhi Jayanti", "national"),
    ("2025-10-02", "Dussehra", "public"),
    ("2025-10-20", "Diwali", "public"),
    ("2025-10-21", "Gujarati New Year", "state"),
    ("2025-11-05", "Guru Nanak Jayanti", "public"),
    ("2025-12-25", "Christmas", "public"),
    ("2026-01-14", "Makar Sankranti", "public"),
    ("2026-01-26", "Republic Day", "national"),
    ("2026-02-16", "Maha Shivaratri", "public"),
    ("2026-03-04", "Holi", "public"),
    ("2026-03-21", "Eid ul-Fitr", "public"),
    ("2026-03-27", "Ram Navami", "public"),
    ("2026-03-30", "Mahavir Jayanti", "public"),
    ("2026-04-03", "Good Friday", "public"),
    ("2026-04-14", "Ambedkar Jayanti", "public"),
    ("2026-05-01", "Gujarat Day", "state"),
    ("2026-05-01", "Buddha Purnima", "public"),
    ("2026-05-28", "Eid ul-Adha", "public"),
    ("2026-08-05", "Janmashtami", "public"),
    ("2026-08-15", "Independence Day", "national"),
    ("2026-09-16", "Ganesh Chaturthi", "public"),
    ("2026-10-02", "Gandhi Jayanti", "national"),
    ("2026-10-21", "Dussehra", "public"),
    ("2026-11-08", "Diwali", "public"),
    ("2026-11-09", "Gujarati New Year", "state"),
    ("2026-11-24", "Guru Nanak Jayanti", "public"),
    ("2026-12-25", "Christmas", "public"),
];

/// Holidays falling inside `[start, end]`, in table order.
pub fn in_range(start: NaiveDate, end: NaiveDate) -> Vec<Holiday> {
    TABLE
        .iter()
        .filter_map(|(date, name, kind)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
            (start <= date && date <= end).then_some(Holiday { date, name, kind })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn every_table_date_parses() {
        assert_eq!(
            in_range(d(2024, 1, 1), d(2026, 12, 31)).len(),
            TABLE.len()
        );
    }

    #[test]
    fn range_filter_is_inclusive() {
        let holidays = in_range(d(2026, 1, 26), d(2026, 1, 26));
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].name, "Republic Day");
    }

    #[test]
    fn out_of_table_range_is_empty() {
        assert!(in_range(d(2019, 1, 1), d(2019, 12, 31)).is_empty());
    }
}
