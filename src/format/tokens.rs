//! FormatToken Module
//!
//! Excel Number Format Stringのトークン定義を提供します。

/// 数字プレースホルダーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placeholder {
    /// `0`: 桁がなければ0を表示
    Zero,
    /// `#`: 桁がなければ何も表示しない
    Hash,
    /// `?`: 桁がなければ空白を表示
    Question,
}

/// 経過時間の単位（`[h]`, `[mm]`, `[ss]`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElapsedUnit {
    Hours,
    Minutes,
    Seconds,
}

/// フォーマットトークン
///
/// Excel Number Format Stringを解析した際に生成されるトークンです。
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FormatToken {
    /// 年（例: "yyyy" -> 4, "yy" -> 2）
    Year(usize),

    /// 月（1-2: 数字, 3: "Jan", 4: "January", 5: "J"）
    Month(usize),

    /// 日（1-2: 数字, 3: "Mon", 4以上: "Monday"）
    Day(usize),

    /// 時（例: "hh" -> 2桁, "h" -> 1桁）
    Hour(usize),

    /// 分（例: "mm" -> 2桁, "m" -> 1桁）
    /// 注意: 直前が時、または直後が秒の場合のみ分として扱われる
    Minute(usize),

    /// 秒（例: "ss" -> 2桁, "s" -> 1桁）
    Second(usize),

    /// 秒の小数部（例: "ss.000" -> 3桁）
    SubSecond(usize),

    /// 経過時間（例: "[h]", "[mm]"）と最小桁数
    Elapsed(ElapsedUnit, usize),

    /// 午前/午後（`true`: "AM/PM", `false`: "A/P"）
    AmPm { full: bool, lowercase: bool },

    /// 数字プレースホルダー（1文字につき1トークン）
    Digit(Placeholder),

    /// 小数点
    DecimalPoint,

    /// 千の位区切り（または末尾の場合は1000での除算）
    ThousandSeparator,

    /// パーセント記号
    Percent,

    /// 指数表記（例: "E+" -> `plus_sign = true`）
    Exponent { plus_sign: bool },

    /// 分数の区切り（数値書式では未対応、日付書式ではリテラル）
    FractionBar,

    /// "General"
    General,

    /// リテラル文字列（例: "$", "-", " "）
    Literal(String),

    /// 色指定（例: "[Red]", "[Blue]"）。出力では無視されます
    Color(String),

    /// テキストプレースホルダー（例: "@"）
    TextPlaceholder,
}

impl FormatToken {
    /// トークンが日付・時刻関連かどうかを判定
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            FormatToken::Year(_)
                | FormatToken::Month(_)
                | FormatToken::Day(_)
                | FormatToken::Hour(_)
                | FormatToken::Minute(_)
                | FormatToken::Second(_)
                | FormatToken::SubSecond(_)
                | FormatToken::Elapsed(..)
                | FormatToken::AmPm { .. }
        )
    }

    /// トークンが数値関連かどうかを判定
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FormatToken::Digit(_)
                | FormatToken::DecimalPoint
                | FormatToken::ThousandSeparator
                | FormatToken::Percent
                | FormatToken::Exponent { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_datetime() {
        assert!(FormatToken::Year(4).is_datetime());
        assert!(FormatToken::Month(2).is_datetime());
        assert!(FormatToken::Day(2).is_datetime());
        assert!(FormatToken::Hour(2).is_datetime());
        assert!(FormatToken::Minute(2).is_datetime());
        assert!(FormatToken::Second(2).is_datetime());
        assert!(FormatToken::Elapsed(ElapsedUnit::Hours, 1).is_datetime());
        assert!(FormatToken::AmPm {
            full: true,
            lowercase: false
        }
        .is_datetime());
        assert!(!FormatToken::Digit(Placeholder::Zero).is_datetime());
        assert!(!FormatToken::Literal("$".to_string()).is_datetime());
    }

    #[test]
    fn test_is_numeric() {
        assert!(FormatToken::Digit(Placeholder::Zero).is_numeric());
        assert!(FormatToken::Digit(Placeholder::Hash).is_numeric());
        assert!(FormatToken::DecimalPoint.is_numeric());
        assert!(FormatToken::ThousandSeparator.is_numeric());
        assert!(FormatToken::Percent.is_numeric());
        assert!(FormatToken::Exponent { plus_sign: true }.is_numeric());
        assert!(!FormatToken::Year(4).is_numeric());
        assert!(!FormatToken::General.is_numeric());
        assert!(!FormatToken::Literal("$".to_string()).is_numeric());
    }
}
