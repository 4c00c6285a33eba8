use crate::models::ForecastDay;
use chrono::{DateTime, Datelike, FixedOffset, Weekday};

const WEEKDAY_CHARS: [&str; 7] = ["一", "二", "三", "四", "五", "六", "日"];

fn weekday_char(weekday: Weekday) -> &'static str {
    WEEKDAY_CHARS[weekday.num_days_from_monday() as usize]
}

/// `星期一` … `星期日`
pub fn weekday_name(weekday: Weekday) -> String {
    format!("星期{}", weekday_char(weekday))
}

/// `周一` … `周日`
pub fn weekday_short(weekday: Weekday) -> String {
    format!("周{}", weekday_char(weekday))
}

/// Date line of the email, e.g. `2024年01月01日 星期一`
pub fn format_local_date(local_time: &DateTime<FixedOffset>) -> String {
    format!(
        "{}年{:02}月{:02}日 {}",
        local_time.year(),
        local_time.month(),
        local_time.day(),
        weekday_name(local_time.weekday())
    )
}

/// Label for a forecast entry by its position in the provider's list.
///
/// Position 0 is today and never rendered. Entries without a parseable
/// `fxDate` get an ordinal label instead.
pub fn forecast_label(index: usize, day: &ForecastDay) -> String {
    let Some(date) = day.date() else {
        return format!("第{}天", index + 1);
    };

    match index {
        1 => "明天".to_string(),
        2 => "后天".to_string(),
        _ => weekday_short(date.weekday()),
    }
}
