//! Date/Time Rendering Module
//!
//! Excelのシリアル値を日付・時刻の構成要素に変換し、日付トークンを出力します。

use chrono::{Datelike, Duration, NaiveDate};

use super::sections::FormatSection;
use super::tokens::{ElapsedUnit, FormatToken};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Excelで表現できる最大のシリアル値（9999-12-31の翌日）
const MAX_SERIAL: f64 = 2_958_466.0;

const SECONDS_PER_DAY: i64 = 86_400;

/// シリアル値を分解した日付・時刻
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 曜日（0 = 日曜日）
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
    /// 経過時間表示用の合計ミリ秒
    pub total_millis: i64,
}

impl DateParts {
    /// Excelのシリアル値を分解する
    ///
    /// # 引数
    ///
    /// * `serial` - シリアル値（整数部が日付、小数部が時刻）
    /// * `date_1904` - 1904年エポックを使用するかどうか
    /// * `keep_millis` - ミリ秒単位で丸めるかどうか（`false`なら秒単位）
    ///
    /// # 戻り値
    ///
    /// 負の値や範囲外の値の場合は`None`
    ///
    /// # エポックシステム
    ///
    /// - 1900年システム: シリアル値1 = 1900-01-01。Excelは1900年を閏年として
    ///   扱うため、シリアル値60は存在しない1900-02-29になり、61以降は
    ///   1899-12-30起算と一致します。
    /// - 1904年システム: シリアル値0 = 1904-01-01
    pub fn from_serial(serial: f64, date_1904: bool, keep_millis: bool) -> Option<Self> {
        if !(0.0..MAX_SERIAL).contains(&serial) {
            return None;
        }

        let unit: i64 = if keep_millis { 1000 } else { 1 };
        let ticks = (serial * (SECONDS_PER_DAY * unit) as f64).round() as i64;
        let days = ticks.div_euclid(SECONDS_PER_DAY * unit);
        let in_day = ticks.rem_euclid(SECONDS_PER_DAY * unit);
        let total_millis = ticks * (1000 / unit);

        let seconds = in_day / unit;
        let millis = ((in_day % unit) * (1000 / unit)) as u32;
        let (hour, minute, second) = (
            (seconds / 3600) as u32,
            ((seconds % 3600) / 60) as u32,
            (seconds % 60) as u32,
        );

        let (year, month, day, weekday) = if date_1904 {
            let date = NaiveDate::from_ymd_opt(1904, 1, 1)?.checked_add_signed(Duration::days(days))?;
            (
                date.year(),
                date.month(),
                date.day(),
                date.weekday().num_days_from_sunday(),
            )
        } else {
            // シリアル値1（1900-01-01）は日曜日として扱われる
            let weekday = (days + 6).rem_euclid(7) as u32;
            match days {
                60 => (1900, 2, 29, weekday),
                0..=59 => {
                    let date = NaiveDate::from_ymd_opt(1899, 12, 31)?
                        .checked_add_signed(Duration::days(days))?;
                    (date.year(), date.month(), date.day(), weekday)
                }
                _ => {
                    let date = NaiveDate::from_ymd_opt(1899, 12, 30)?
                        .checked_add_signed(Duration::days(days))?;
                    (date.year(), date.month(), date.day(), weekday)
                }
            }
        };

        Some(Self {
            year,
            month,
            day,
            weekday,
            hour,
            minute,
            second,
            millis,
            total_millis,
        })
    }
}

/// 日付・時刻セクションを出力する
pub(crate) fn render_datetime(parts: &DateParts, section: &FormatSection) -> String {
    let twelve_hour = section.has_am_pm();
    let mut result = String::new();

    for token in &section.tokens {
        match token {
            FormatToken::Year(count) => {
                if *count <= 2 {
                    result.push_str(&format!("{:02}", parts.year.rem_euclid(100)));
                } else {
                    result.push_str(&format!("{:04}", parts.year));
                }
            }
            FormatToken::Month(count) => {
                let name = MONTH_NAMES[(parts.month as usize).saturating_sub(1) % 12];
                match count {
                    1 => result.push_str(&parts.month.to_string()),
                    2 => result.push_str(&format!("{:02}", parts.month)),
                    3 => result.push_str(&name[..3]),
                    4 => result.push_str(name),
                    _ => result.push_str(&name[..1]),
                }
            }
            FormatToken::Day(count) => {
                let name = DAY_NAMES[parts.weekday as usize % 7];
                match count {
                    1 => result.push_str(&parts.day.to_string()),
                    2 => result.push_str(&format!("{:02}", parts.day)),
                    3 => result.push_str(&name[..3]),
                    _ => result.push_str(name),
                }
            }
            FormatToken::Hour(count) => {
                let hour = if twelve_hour {
                    match parts.hour % 12 {
                        0 => 12,
                        h => h,
                    }
                } else {
                    parts.hour
                };
                push_padded(&mut result, i64::from(hour), *count);
            }
            FormatToken::Minute(count) => push_padded(&mut result, i64::from(parts.minute), *count),
            FormatToken::Second(count) => push_padded(&mut result, i64::from(parts.second), *count),
            FormatToken::SubSecond(count) => {
                let digits = format!("{:03}", parts.millis);
                result.push('.');
                result.push_str(&digits[..(*count).min(3)]);
                for _ in 3..*count {
                    result.push('0');
                }
            }
            FormatToken::Elapsed(unit, width) => {
                let total_seconds = parts.total_millis.div_euclid(1000);
                let value = match unit {
                    ElapsedUnit::Hours => total_seconds / 3600,
                    ElapsedUnit::Minutes => total_seconds / 60,
                    ElapsedUnit::Seconds => total_seconds,
                };
                push_padded(&mut result, value, *width);
            }
            FormatToken::AmPm { full, lowercase } => {
                let morning = parts.hour < 12;
                let marker = match (full, morning) {
                    (true, true) => "AM",
                    (true, false) => "PM",
                    (false, true) => "A",
                    (false, false) => "P",
                };
                if *lowercase && !*full {
                    result.push_str(&marker.to_lowercase());
                } else {
                    result.push_str(marker);
                }
            }
            FormatToken::Literal(s) => result.push_str(s),
            FormatToken::FractionBar => result.push('/'),
            FormatToken::DecimalPoint => result.push('.'),
            FormatToken::ThousandSeparator => result.push(','),
            _ => {}
        }
    }

    result
}

fn push_padded(result: &mut String, value: i64, width: usize) {
    if width >= 2 {
        result.push_str(&format!("{:0width$}", value, width = width));
    } else {
        result.push_str(&value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_1900_epoch() {
        let p = DateParts::from_serial(1.0, false, false).unwrap();
        assert_eq!((p.year, p.month, p.day), (1900, 1, 1));
        assert_eq!(p.weekday, 0);

        let p = DateParts::from_serial(59.0, false, false).unwrap();
        assert_eq!((p.year, p.month, p.day), (1900, 2, 28));

        let p = DateParts::from_serial(60.0, false, false).unwrap();
        assert_eq!((p.year, p.month, p.day), (1900, 2, 29));

        let p = DateParts::from_serial(61.0, false, false).unwrap();
        assert_eq!((p.year, p.month, p.day), (1900, 3, 1));
        assert_eq!(p.weekday, 4);

        let p = DateParts::from_serial(45658.0, false, false).unwrap();
        assert_eq!((p.year, p.month, p.day), (2025, 1, 1));
        assert_eq!(p.weekday, 3);
    }

    #[test]
    fn test_serial_1904_epoch() {
        let p = DateParts::from_serial(0.0, true, false).unwrap();
        assert_eq!((p.year, p.month, p.day), (1904, 1, 1));
        let p = DateParts::from_serial(1.0, true, false).unwrap();
        assert_eq!((p.year, p.month, p.day), (1904, 1, 2));
    }

    #[test]
    fn test_serial_time_rounding() {
        let p = DateParts::from_serial(0.5, false, false).unwrap();
        assert_eq!((p.hour, p.minute, p.second), (12, 0, 0));

        // 23:59:59.6 は秒単位の丸めで翌日になる
        let serial = 1.0 + (86_399.6 / 86_400.0);
        let p = DateParts::from_serial(serial, false, false).unwrap();
        assert_eq!((p.day, p.hour, p.minute, p.second), (2, 0, 0, 0));

        let p = DateParts::from_serial(serial, false, true).unwrap();
        assert_eq!((p.day, p.hour, p.second, p.millis), (1, 23, 59, 600));
    }

    #[test]
    fn test_serial_out_of_range() {
        assert!(DateParts::from_serial(-1.0, false, false).is_none());
        assert!(DateParts::from_serial(3_000_000.0, false, false).is_none());
    }
}
