// ==========================================
// 仓库订单看板 - 日期展示格式
// ==========================================
// 荷兰语展示：明天 "Morgen"，后天 "Overmorgen"，
// 其他日期 "Wo 25 jun 25"；诊断表格用 "d-m-yyyy"
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

const DAY_NAMES: [&str; 7] = ["Ma", "Di", "Wo", "Do", "Vr", "Za", "Zo"];
const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mrt", "apr", "mei", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
];

/// 未来订单日期标签
pub fn format_order_date(date: NaiveDateTime, as_of: NaiveDateTime) -> String {
    let day = date.date();
    let today = as_of.date();

    if day == today + Duration::days(1) {
        return "Morgen".to_string();
    }
    if day == today + Duration::days(2) {
        return "Overmorgen".to_string();
    }

    let day_name = DAY_NAMES[day.weekday().num_days_from_monday() as usize];
    let month_name = MONTH_NAMES[day.month0() as usize];
    format!(
        "{} {} {} {:02}",
        day_name,
        day.day(),
        month_name,
        day.year().rem_euclid(100)
    )
}

/// 诊断表格日期（nl-NL 数字格式，无前导零）
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.day(), date.month(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_morgen_overmorgen() {
        let as_of = dt(2025, 6, 23);
        assert_eq!(format_order_date(dt(2025, 6, 24), as_of), "Morgen");
        assert_eq!(format_order_date(dt(2025, 6, 25), as_of), "Overmorgen");
    }

    #[test]
    fn test_other_date_format() {
        let as_of = dt(2025, 6, 20);
        // 2025-06-25 是周三
        assert_eq!(format_order_date(dt(2025, 6, 25), as_of), "Wo 25 jun 25");
        assert_eq!(format_order_date(dt(2026, 1, 5), as_of), "Ma 5 jan 26");
    }

    #[test]
    fn test_display_date() {
        let d = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
        assert_eq!(format_display_date(d), "2-7-2025");
    }
}
