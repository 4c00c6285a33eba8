use super::labels::{forecast_label, format_local_date};
use crate::logic::rain::RainAlert;
use crate::models::{AdvisoryList, AqiLevel, CurrentConditions, ForecastDay, WeatherReport};
use chrono::{DateTime, FixedOffset};

pub const TITLE: &str = "小麻雀天气助手";

/// Body sent when the provider returned no current conditions
pub const UNAVAILABLE_BODY: &str = "<p>获取天气信息失败</p>";

/// Forecast entries shown after today
pub const FORECAST_DAYS_SHOWN: usize = 3;

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; margin: 20px; }
        .weather-card {
            background: linear-gradient(135deg, #74b9ff, #0984e3);
            color: white;
            padding: 20px;
            border-radius: 10px;
            margin: 10px 0;
        }
        .current-weather { text-align: center; font-size: 1.2em; }
        .forecast {
            margin-top: 20px;
            background: #f8f9fa;
            color: #333;
            padding: 15px;
            border-radius: 8px;
        }
        .forecast-item { padding: 8px; border-bottom: 1px solid #e9ecef; }
        .rain-alert {
            background: linear-gradient(135deg, #74b9ff, #0984e3);
            color: white;
            padding: 15px;
            border-radius: 8px;
            margin: 15px 0;
            border-left: 4px solid #0066cc;
            text-align: center;
            font-size: 1.1em;
        }
        .temperature { font-size: 2em; font-weight: bold; }
        .date { color: #6c757d; font-size: 0.9em; }
        .clothing-advice {
            background: linear-gradient(135deg, #fd79a8, #e84393);
            color: white;
            padding: 15px;
            border-radius: 8px;
            margin: 15px 0;
        }
    </style>
</head>
<body>
"#;

const FOOTER: &str = r#"    <hr style="margin: 20px 0;">
    <p style="color: #6c757d; font-size: 0.9em; text-align: center;">
        本邮件由小麻雀天气助手自动发送 🐦 | 数据来源：和风天气
    </p>
</body>
</html>
"#;

/// Everything the renderer reads, fixed at construction
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    report: &'a WeatherReport,
    advisories: &'a AdvisoryList,
    rain_alert: Option<RainAlert>,
    local_time: DateTime<FixedOffset>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        report: &'a WeatherReport,
        advisories: &'a AdvisoryList,
        rain_alert: Option<RainAlert>,
        local_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            report,
            advisories,
            rain_alert,
            local_time,
        }
    }

}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render(ctx: &RenderContext<'_>) -> String {
    let Some(current) = ctx.report.current.as_ref() else {
        return UNAVAILABLE_BODY.to_string();
    };

    let mut html = String::with_capacity(8 * 1024);
    html.push_str(HEAD);
    html.push_str(&format!("    <h1>{}</h1>\n", TITLE));
    html.push_str(&format!(
        "    <div class=\"date\">{}</div>\n",
        format_local_date(&ctx.local_time)
    ));

    render_current(&mut html, current, ctx.report.air_quality);

    if let Some(alert) = ctx.rain_alert {
        html.push_str(&format!(
            "    <div class=\"rain-alert\">{}</div>\n",
            alert.message()
        ));
    }

    if !ctx.report.forecast.is_empty() {
        render_forecast(&mut html, &ctx.report.forecast);
    }

    if !ctx.advisories.is_empty() {
        html.push_str("    <div class=\"clothing-advice\">\n        <h3>💝 温馨提醒</h3>\n");
        for advisory in ctx.advisories.iter() {
            html.push_str(&format!(
                "        <div style=\"margin: 5px 0;\">• {}</div>\n",
                escape_html(advisory)
            ));
        }
        html.push_str("    </div>\n");
    }

    html.push_str(FOOTER);
    html
}

fn render_current(html: &mut String, current: &CurrentConditions, air_quality: Option<u32>) {
    let aqi_info = match air_quality {
        Some(aqi) => {
            let level = AqiLevel::classify(Some(aqi));
            format!(
                "<span style=\"color: {};\">🫁 AQI {} ({})</span> | ",
                level.color(),
                aqi,
                level
            )
        }
        None => String::new(),
    };

    html.push_str(&format!(
        r#"    <div class="weather-card">
        <div class="current-weather">
            <div class="temperature">{temp}°C</div>
            <div style="font-size: 1.1em; margin: 10px 0;">{text}</div>
            <div style="font-size: 0.9em;">
                💨 {wind_dir} {wind_scale}级 | 💧 湿度 {humidity}% | {aqi}👁️ 能见度 {vis}km
            </div>
        </div>
    </div>
"#,
        temp = escape_html(current.temp_display()),
        text = escape_html(current.text_display()),
        wind_dir = escape_html(current.wind_dir_display()),
        wind_scale = escape_html(current.wind_scale_display()),
        humidity = escape_html(current.humidity_display()),
        aqi = aqi_info,
        vis = escape_html(current.vis_display()),
    ));
}

fn render_forecast(html: &mut String, forecast: &[ForecastDay]) {
    html.push_str("    <div class=\"forecast\">\n        <h3>📅 未来几天预报</h3>\n");

    for (index, day) in forecast.iter().enumerate().skip(1).take(FORECAST_DAYS_SHOWN) {
        html.push_str(&format!(
            r#"        <div class="forecast-item">
            <strong>{label}</strong> ({date})
            <br>
            🌅 白天: {day_text} | 🌙 夜间: {night_text}
            <br>
            🌡️ {min}°C ~ {max}°C | 💨 {wind_dir} {wind_scale}级
        </div>
"#,
            label = forecast_label(index, day),
            date = escape_html(&day.fx_date),
            day_text = escape_html(day.text_day_display()),
            night_text = escape_html(day.text_night_display()),
            min = escape_html(day.temp_min_display()),
            max = escape_html(day.temp_max_display()),
            wind_dir = escape_html(day.wind_dir_display()),
            wind_scale = escape_html(day.wind_scale_display()),
        ));
    }

    html.push_str("    </div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::clock::{local_offset, to_local};
    use chrono::{TimeZone, Utc};

    fn current() -> CurrentConditions {
        CurrentConditions {
            temp: Some("25".into()),
            text: Some("Sunny".into()),
            humidity: Some("60".into()),
            wind_scale: Some("2".into()),
            wind_dir: Some("北风".into()),
            vis: Some("10".into()),
        }
    }

    fn day(date: &str, day_text: &str) -> ForecastDay {
        ForecastDay {
            fx_date: date.into(),
            temp_min: Some("12".into()),
            temp_max: Some("24".into()),
            text_day: Some(day_text.into()),
            text_night: Some("多云".into()),
            wind_dir_day: Some("南风".into()),
            wind_scale_day: Some("1-3".into()),
        }
    }

    fn advisories() -> AdvisoryList {
        AdvisoryList::from(vec!["👕 第一条".to_string(), "✨ 第二条".to_string()])
    }

    #[test]
    fn date_line_comes_from_injected_time() {
        let report = WeatherReport::new(current());
        let advisories = advisories();
        for instant in [
            Utc.with_ymd_and_hms(2023, 12, 31, 18, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 15, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 4, 0, 0, 0).unwrap(),
        ] {
            let local = to_local(instant);
            let html = render(&RenderContext::new(&report, &advisories, None, local));
            let expected = format!("<div class=\"date\">{}</div>", format_local_date(&local));
            assert!(html.contains(&expected), "missing {}", expected);
        }

        let local = to_local(Utc.with_ymd_and_hms(2023, 12, 31, 18, 0, 0).unwrap());
        let html = render(&RenderContext::new(&report, &advisories, None, local));
        assert!(html.contains("2024年01月01日 星期一"));
    }

    #[test]
    fn section_order_and_current_block() {
        let report = WeatherReport::new(current())
            .with_forecast(vec![day("2024-05-14", "晴"), day("2024-05-15", "小雨")])
            .with_air_quality(120);
        let advisories = advisories();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        let html = render(&RenderContext::new(
            &report,
            &advisories,
            Some(RainAlert::LikelyToday),
            local,
        ));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("25°C"));
        assert!(html.contains("💨 北风 2级"));
        assert!(html.contains("💧 湿度 60%"));
        assert!(html.contains("🫁 AQI 120 (轻度污染)"));
        assert!(html.contains("#ff7e00"));
        assert!(html.contains("能见度 10km"));

        let positions: Vec<usize> = [
            "<h1>小麻雀天气助手</h1>",
            "class=\"date\"",
            "class=\"weather-card\"",
            "class=\"rain-alert\"",
            "class=\"forecast\"",
            "class=\"clothing-advice\"",
            "数据来源：和风天气",
        ]
        .iter()
        .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn optional_blocks_are_omitted() {
        let report = WeatherReport::new(current());
        let advisories = advisories();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        let html = render(&RenderContext::new(&report, &advisories, None, local));

        assert!(!html.contains("class=\"rain-alert\""));
        assert!(!html.contains("class=\"forecast\""));
        assert!(!html.contains("AQI"));
        assert!(html.contains("class=\"clothing-advice\""));
    }

    #[test]
    fn forecast_skips_today_and_caps_at_three() {
        let report = WeatherReport::new(current()).with_forecast(vec![
            day("2024-05-14", "今天的天气"),
            day("2024-05-15", "阴"),
            day("2024-05-16", "阴"),
            day("2024-05-17", "阴"),
            day("2024-05-18", "第五天的天气"),
        ]);
        let advisories = advisories();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        let html = render(&RenderContext::new(&report, &advisories, None, local));

        assert!(!html.contains("今天的天气"));
        assert!(!html.contains("第五天的天气"));
        assert_eq!(html.matches("class=\"forecast-item\"").count(), 3);
        assert!(html.contains("<strong>明天</strong> (2024-05-15)"));
        assert!(html.contains("<strong>后天</strong> (2024-05-16)"));
        assert!(html.contains("<strong>周五</strong> (2024-05-17)"));
        assert!(html.contains("🌡️ 12°C ~ 24°C | 💨 南风 1-3级"));
    }

    #[test]
    fn single_day_forecast_renders_empty_block() {
        let report = WeatherReport::new(current()).with_forecast(vec![day("2024-05-14", "晴")]);
        let advisories = advisories();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        let html = render(&RenderContext::new(&report, &advisories, None, local));

        assert!(html.contains("class=\"forecast\""));
        assert_eq!(html.matches("class=\"forecast-item\"").count(), 0);
    }

    #[test]
    fn bad_forecast_date_does_not_break_render() {
        let report = WeatherReport::new(current())
            .with_forecast(vec![day("2024-05-14", "晴"), day("soon", "阴")]);
        let advisories = advisories();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        let html = render(&RenderContext::new(&report, &advisories, None, local));

        assert!(html.contains("<strong>第2天</strong> (soon)"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn every_advisory_is_rendered_in_order() {
        let report = WeatherReport::new(current());
        let advisories = advisories();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        let html = render(&RenderContext::new(&report, &advisories, None, local));

        let first = html.find("• 👕 第一条").unwrap();
        let second = html.find("• ✨ 第二条").unwrap();
        assert!(first < second);
    }

    #[test]
    fn provider_text_is_escaped() {
        let mut conditions = current();
        conditions.text = Some("<script>alert(1)</script>".into());
        let report = WeatherReport::new(conditions);
        let advisories = AdvisoryList::new();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        let html = render(&RenderContext::new(&report, &advisories, None, local));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn missing_current_renders_error_body() {
        let report = WeatherReport::default();
        let advisories = advisories();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        assert_eq!(
            render(&RenderContext::new(&report, &advisories, None, local)),
            UNAVAILABLE_BODY
        );
    }

    #[test]
    fn render_is_repeatable() {
        let report = WeatherReport::new(current()).with_forecast(vec![
            day("2024-05-14", "晴"),
            day("2024-05-15", "阴"),
        ]);
        let advisories = advisories();
        let local = local_offset().with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        let ctx = RenderContext::new(&report, &advisories, Some(RainAlert::CurrentlyRaining), local);
        assert_eq!(render(&ctx), render(&ctx));
    }
}
