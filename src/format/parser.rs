//! FormatParser Module
//!
//! Excel Number Format Stringの構文解析と適用を提供します。

use super::datetime::{render_datetime, DateParts};
use super::general::format_general;
use super::sections::{Condition, FormatSection, NumericLayout, SectionKind};
use super::tokens::{ElapsedUnit, FormatToken, Placeholder};

/// Number Format Stringパーサー
///
/// Excel Number Format Stringを解析し、数値をフォーマットします。
/// 解析は失敗しません。解釈できない文字はリテラルとして扱われます。
#[derive(Debug, Clone)]
pub(crate) struct FormatParser {
    /// パースされたセクション
    sections: Vec<FormatSection>,
}

impl FormatParser {
    /// フォーマット文字列をパース
    ///
    /// # 引数
    ///
    /// * `format_string` - Excel Number Format String
    pub fn parse(format_string: &str) -> Self {
        let mut sections = Vec::new();
        for (idx, section_str) in Self::split_sections(format_string).iter().enumerate() {
            let kind = match idx {
                0 => SectionKind::Positive,
                1 => SectionKind::Negative,
                2 => SectionKind::Zero,
                3 => SectionKind::Text,
                _ => break,
            };
            sections.push(Self::parse_section(section_str, kind));
        }

        // セクションが空の場合は"General"として扱う
        if sections.is_empty() {
            let mut section = FormatSection::new(SectionKind::Positive);
            section.tokens.push(FormatToken::General);
            sections.push(section);
        }

        Self { sections }
    }

    /// セクションに分割
    ///
    /// Excel Number Format Stringは';'でセクションに分割されます。
    /// 引用符、エスケープ、'['と']'で囲まれた部分の';'は区切りとして扱いません。
    fn split_sections(format_string: &str) -> Vec<String> {
        let mut sections = Vec::new();
        let mut current = String::new();
        let mut in_brackets = false;
        let mut in_quotes = false;
        let mut escaped = false;

        for ch in format_string.chars() {
            if escaped {
                escaped = false;
                current.push(ch);
                continue;
            }
            match ch {
                '\\' if !in_quotes => {
                    escaped = true;
                    current.push(ch);
                }
                '"' => {
                    in_quotes = !in_quotes;
                    current.push(ch);
                }
                '[' if !in_quotes => {
                    in_brackets = true;
                    current.push(ch);
                }
                ']' if !in_quotes => {
                    in_brackets = false;
                    current.push(ch);
                }
                ';' if !in_brackets && !in_quotes => {
                    sections.push(std::mem::take(&mut current));
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() || !sections.is_empty() {
            sections.push(current);
        }

        sections
    }

    /// セクションをパース
    fn parse_section(section_str: &str, kind: SectionKind) -> FormatSection {
        let mut section = FormatSection::new(kind);
        let chars: Vec<char> = section_str.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            match ch {
                '"' => {
                    let end = chars[i + 1..]
                        .iter()
                        .position(|&c| c == '"')
                        .map_or(chars.len(), |p| i + 1 + p);
                    let literal: String = chars[i + 1..end].iter().collect();
                    if !literal.is_empty() {
                        section.tokens.push(FormatToken::Literal(literal));
                    }
                    i = end + 1;
                }
                '\\' => {
                    if let Some(&next) = chars.get(i + 1) {
                        section.tokens.push(FormatToken::Literal(next.to_string()));
                    }
                    i += 2;
                }
                '_' => {
                    // 次の文字の幅の空白
                    section.tokens.push(FormatToken::Literal(" ".to_string()));
                    i += 2;
                }
                '*' => {
                    // 繰り返し文字（セル幅に依存するため出力しない）
                    i += 2;
                }
                '[' => {
                    let end = chars[i + 1..]
                        .iter()
                        .position(|&c| c == ']')
                        .map_or(chars.len(), |p| i + 1 + p);
                    let content: String = chars[i + 1..end].iter().collect();
                    Self::parse_bracket(&content, &mut section);
                    i = end + 1;
                }
                '@' => {
                    section.tokens.push(FormatToken::TextPlaceholder);
                    i += 1;
                }
                '0' | '#' | '?' => {
                    let placeholder = match ch {
                        '0' => Placeholder::Zero,
                        '#' => Placeholder::Hash,
                        _ => Placeholder::Question,
                    };
                    section.tokens.push(FormatToken::Digit(placeholder));
                    i += 1;
                }
                '.' => {
                    let after_seconds =
                        matches!(section.tokens.last(), Some(FormatToken::Second(_)));
                    let zeros = Self::run_length(&chars, i + 1, '0');
                    if after_seconds && zeros > 0 {
                        section.tokens.push(FormatToken::SubSecond(zeros));
                        i += 1 + zeros;
                    } else {
                        section.tokens.push(FormatToken::DecimalPoint);
                        i += 1;
                    }
                }
                ',' => {
                    section.tokens.push(FormatToken::ThousandSeparator);
                    i += 1;
                }
                '%' => {
                    section.tokens.push(FormatToken::Percent);
                    i += 1;
                }
                'E' | 'e' if matches!(chars.get(i + 1), Some('+') | Some('-')) => {
                    section.tokens.push(FormatToken::Exponent {
                        plus_sign: chars[i + 1] == '+',
                    });
                    i += 2;
                }
                '/' => {
                    section.tokens.push(FormatToken::FractionBar);
                    i += 1;
                }
                'y' | 'Y' => {
                    let count = Self::run_length(&chars, i, 'y');
                    section.tokens.push(FormatToken::Year(count));
                    i += count;
                }
                'm' | 'M' => {
                    let count = Self::run_length(&chars, i, 'm');
                    if Self::is_minute(&section.tokens, &chars, i + count) {
                        section.tokens.push(FormatToken::Minute(count.min(2)));
                    } else {
                        section.tokens.push(FormatToken::Month(count));
                    }
                    i += count;
                }
                'd' | 'D' => {
                    let count = Self::run_length(&chars, i, 'd');
                    section.tokens.push(FormatToken::Day(count));
                    i += count;
                }
                'h' | 'H' => {
                    let count = Self::run_length(&chars, i, 'h');
                    section.tokens.push(FormatToken::Hour(count.min(2)));
                    i += count;
                }
                's' | 'S' => {
                    let count = Self::run_length(&chars, i, 's');
                    section.tokens.push(FormatToken::Second(count.min(2)));
                    i += count;
                }
                'A' | 'a' if Self::starts_with_ci(&chars, i, "am/pm") => {
                    section.tokens.push(FormatToken::AmPm {
                        full: true,
                        lowercase: false,
                    });
                    i += 5;
                }
                'A' | 'a' if Self::starts_with_ci(&chars, i, "a/p") => {
                    section.tokens.push(FormatToken::AmPm {
                        full: false,
                        lowercase: ch == 'a',
                    });
                    i += 3;
                }
                'G' | 'g' if Self::starts_with_ci(&chars, i, "general") => {
                    section.tokens.push(FormatToken::General);
                    i += 7;
                }
                _ => {
                    // その他の文字はリテラルとして扱う
                    section.tokens.push(FormatToken::Literal(ch.to_string()));
                    i += 1;
                }
            }
        }

        section
    }

    /// ブラケット内の内容を解析
    ///
    /// 経過時間（`[h]`）、通貨記号（`[$€-407]`）、条件（`[>100]`）、色（`[Red]`）を扱います。
    fn parse_bracket(content: &str, section: &mut FormatSection) {
        let lower = content.to_ascii_lowercase();
        let elapsed = match lower.chars().next() {
            Some(first @ ('h' | 'm' | 's')) if lower.chars().all(|c| c == first) => Some(first),
            _ => None,
        };

        if let Some(unit) = elapsed {
            let unit = match unit {
                'h' => ElapsedUnit::Hours,
                'm' => ElapsedUnit::Minutes,
                _ => ElapsedUnit::Seconds,
            };
            section.tokens.push(FormatToken::Elapsed(unit, lower.len()));
        } else if let Some(currency) = content.strip_prefix('$') {
            let symbol = currency.split('-').next().unwrap_or_default();
            if !symbol.is_empty() {
                section.tokens.push(FormatToken::Literal(symbol.to_string()));
            }
        } else if let Some(condition) = Condition::parse(content) {
            section.condition = Some(condition);
        } else if content.starts_with(char::is_alphabetic) {
            section.tokens.push(FormatToken::Color(content.to_string()));
        }
        // その他（ロケール指定など）は無視
    }

    /// `start`から連続する同じ文字（大文字小文字を区別しない）の数
    fn run_length(chars: &[char], start: usize, target: char) -> usize {
        chars[start.min(chars.len())..]
            .iter()
            .take_while(|c| c.eq_ignore_ascii_case(&target))
            .count()
    }

    fn starts_with_ci(chars: &[char], start: usize, pattern: &str) -> bool {
        let len = pattern.chars().count();
        chars.len() >= start + len
            && chars[start..start + len]
                .iter()
                .zip(pattern.chars())
                .all(|(a, b)| a.eq_ignore_ascii_case(&b))
    }

    /// "m"が分を表すかどうか
    ///
    /// 直前の日付トークンが時、または直後の日付トークンが秒の場合は分です。
    fn is_minute(tokens: &[FormatToken], chars: &[char], next: usize) -> bool {
        let after_hour = tokens
            .iter()
            .rev()
            .find(|t| t.is_datetime())
            .is_some_and(|t| {
                matches!(
                    t,
                    FormatToken::Hour(_) | FormatToken::Elapsed(ElapsedUnit::Hours, _)
                )
            });
        if after_hour {
            return true;
        }

        let rest = &chars[next.min(chars.len())..];
        let letter = rest
            .iter()
            .position(|c| c.is_ascii_alphabetic())
            .map(|p| (p, rest[p]));
        match letter {
            Some((_, 's' | 'S')) => true,
            Some((p, _)) => p > 0 && rest[p - 1] == '[' && rest[p].eq_ignore_ascii_case(&'s'),
            None => false,
        }
    }

    /// 数値をフォーマット
    ///
    /// # 引数
    ///
    /// * `value` - フォーマットする数値
    /// * `date_1904` - 日付書式で1904年エポックを使用するかどうか
    ///
    /// # 戻り値
    ///
    /// フォーマット済み文字列。日付として表現できない値の場合は"General"で表示します。
    pub fn format_number(&self, value: f64, date_1904: bool) -> String {
        let Some((section, signed)) = self.select_section(value) else {
            return format_general(value);
        };

        if section.is_datetime() {
            return DateParts::from_serial(value, date_1904, section.has_subseconds())
                .map(|parts| render_datetime(&parts, section))
                .unwrap_or_else(|| format_general(value));
        }

        let magnitude = value.abs();
        let body = if section.is_numeric() {
            Self::format_numeric(magnitude, section)
        } else {
            Self::format_literal(magnitude, section)
        };

        let shows_digit = body.chars().any(|c| c.is_ascii_digit() && c != '0');
        if signed && value < 0.0 && shows_digit {
            format!("-{}", body)
        } else {
            body
        }
    }

    /// 適切なセクションを選択
    ///
    /// # 戻り値
    ///
    /// 選択されたセクションと、負数の場合に符号を付加する必要があるかどうか。
    /// 数値用のセクションがない場合は`None`
    fn select_section(&self, value: f64) -> Option<(&FormatSection, bool)> {
        let numeric: Vec<&FormatSection> = self
            .sections
            .iter()
            .filter(|s| s.kind != SectionKind::Text)
            .collect();

        if numeric.iter().any(|s| s.condition.is_some()) {
            let chosen = numeric
                .iter()
                .find(|s| s.condition.map_or(true, |c| c.matches(value)))
                .or_else(|| numeric.last())?;
            return Some((*chosen, true));
        }

        match numeric.as_slice() {
            [] => None,
            [only] => Some((*only, true)),
            [positive, negative, rest @ ..] => {
                if value < 0.0 {
                    Some((*negative, false))
                } else if value == 0.0 {
                    Some((*rest.first().unwrap_or(positive), false))
                } else {
                    Some((*positive, false))
                }
            }
        }
    }

    /// 数字プレースホルダーを含まないセクションを出力（"General"、"@"、リテラルのみ）
    fn format_literal(magnitude: f64, section: &FormatSection) -> String {
        let mut result = String::new();
        for token in &section.tokens {
            match token {
                FormatToken::General | FormatToken::TextPlaceholder => {
                    result.push_str(&format_general(magnitude));
                }
                FormatToken::Literal(s) => result.push_str(s),
                _ => {}
            }
        }
        result
    }

    /// 数値をフォーマット
    ///
    /// # 引数
    ///
    /// * `magnitude` - フォーマットする数値の絶対値
    /// * `section` - フォーマットセクション
    fn format_numeric(magnitude: f64, section: &FormatSection) -> String {
        let layout = section.numeric_layout();
        if layout.has_fraction_bar {
            // 分数書式は未対応
            return format_general(magnitude);
        }

        let mut scaled = magnitude * 100f64.powi(layout.percent_count as i32)
            / 1000f64.powi(layout.thousands_scale as i32);

        let exponent = layout
            .exponent_plus
            .map(|_| Self::split_exponent(&mut scaled, &layout));

        let places = layout.fraction.len();
        let rounded = Self::round_to(scaled, places);
        let text = format!("{:.*}", places, rounded);
        let (int_digits, frac_digits) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let int_digits = if int_digits == "0" { "" } else { int_digits };

        let integer_slots = Self::fill_integer(int_digits, &layout.integer, layout.grouping);
        let fraction_slots = Self::fill_fraction(frac_digits, &layout.fraction);

        let mut result = String::new();
        let mut integer_iter = integer_slots.into_iter();
        let mut fraction_iter = fraction_slots.into_iter();
        let mut in_fraction = false;
        let mut in_exponent = false;

        for token in &section.tokens {
            match token {
                FormatToken::Digit(_) if in_exponent => {}
                FormatToken::Digit(_) if in_fraction => {
                    result.push_str(&fraction_iter.next().unwrap_or_default());
                }
                FormatToken::Digit(_) => {
                    result.push_str(&integer_iter.next().unwrap_or_default());
                }
                FormatToken::DecimalPoint if !in_fraction && !in_exponent => {
                    if layout.integer.is_empty() {
                        result.push_str(int_digits);
                    }
                    result.push('.');
                    in_fraction = true;
                }
                FormatToken::Exponent { plus_sign } => {
                    let e = exponent.unwrap_or(0);
                    let sign = if e < 0 {
                        "-"
                    } else if *plus_sign {
                        "+"
                    } else {
                        ""
                    };
                    let width = layout.exponent.len().max(1);
                    result.push_str(&format!("E{}{:0width$}", sign, e.abs(), width = width));
                    in_exponent = true;
                }
                FormatToken::Percent => result.push('%'),
                FormatToken::Literal(s) => result.push_str(s),
                _ => {}
            }
        }

        result
    }

    /// 指数表記の仮数部と指数を求める
    ///
    /// 整数部に`#`を含む場合（例: `##0.0E+0`）は、指数を整数部の桁数の倍数に揃えます。
    fn split_exponent(value: &mut f64, layout: &NumericLayout) -> i32 {
        if *value == 0.0 {
            return 0;
        }

        let int_width = layout.integer.len().max(1) as i32;
        let engineering = int_width > 1 && layout.integer.contains(&Placeholder::Hash);
        let magnitude = value.log10().floor() as i32;
        let mut exponent = if engineering {
            magnitude.div_euclid(int_width) * int_width
        } else {
            magnitude - (int_width - 1)
        };

        let places = layout.fraction.len();
        let limit = 10f64.powi(int_width);
        let mut mantissa = Self::round_to(Self::scale_down(*value, exponent), places);
        if mantissa >= limit {
            exponent += if engineering { int_width } else { 1 };
            mantissa = Self::round_to(Self::scale_down(*value, exponent), places);
        }

        *value = mantissa;
        exponent
    }

    /// `value / 10^exponent`
    ///
    /// 非正規化数の近くで`10^exponent`がアンダーフローしないよう、2段階で割ります。
    fn scale_down(value: f64, exponent: i32) -> f64 {
        let half = exponent / 2;
        value / 10f64.powi(half) / 10f64.powi(exponent - half)
    }

    fn round_to(value: f64, places: usize) -> f64 {
        let multiplier = 10f64.powi(places as i32);
        (value * multiplier).round() / multiplier
    }

    /// 整数部の桁をプレースホルダーに右詰めで割り当てる
    ///
    /// 先頭のプレースホルダーにはあふれた桁もすべて含めます。
    /// 桁区切りが有効な場合は、右から3桁ごとに','を挿入します。
    fn fill_integer(digits: &str, placeholders: &[Placeholder], grouping: bool) -> Vec<String> {
        let digits: Vec<char> = digits.chars().collect();
        let n = placeholders.len();
        let overflow = digits.len().saturating_sub(n);

        let mut slots: Vec<Vec<char>> = Vec::with_capacity(n);
        for (s, placeholder) in placeholders.iter().enumerate() {
            let mut slot: Vec<char> = if s == 0 {
                digits[..overflow].to_vec()
            } else {
                Vec::new()
            };
            let from_right = n - 1 - s;
            if from_right < digits.len() {
                slot.push(digits[digits.len() - 1 - from_right]);
            } else {
                match placeholder {
                    Placeholder::Zero => slot.push('0'),
                    Placeholder::Question => slot.push(' '),
                    Placeholder::Hash => {}
                }
            }
            slots.push(slot);
        }

        let total = slots
            .iter()
            .flatten()
            .filter(|c| c.is_ascii_digit())
            .count();
        let mut emitted = 0;
        slots
            .into_iter()
            .map(|slot| {
                let mut out = String::new();
                for c in slot {
                    out.push(c);
                    if c.is_ascii_digit() {
                        emitted += 1;
                        let remaining = total - emitted;
                        if grouping && remaining > 0 && remaining % 3 == 0 {
                            out.push(',');
                        }
                    }
                }
                out
            })
            .collect()
    }

    /// 小数部の桁をプレースホルダーに割り当てる
    ///
    /// 末尾の`#`と`?`に対応する0は表示しません（`?`は空白）。
    fn fill_fraction(digits: &str, placeholders: &[Placeholder]) -> Vec<String> {
        let mut slots: Vec<String> = digits.chars().map(String::from).collect();
        slots.resize(placeholders.len(), "0".to_string());

        for (slot, placeholder) in slots.iter_mut().zip(placeholders).rev() {
            if slot.as_str() != "0" {
                break;
            }
            match placeholder {
                Placeholder::Zero => break,
                Placeholder::Hash => slot.clear(),
                Placeholder::Question => *slot = " ".to_string(),
            }
        }

        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(pattern: &str, value: f64) -> String {
        FormatParser::parse(pattern).format_number(value, false)
    }

    #[test]
    fn test_split_sections() {
        let sections = FormatParser::split_sections("0;0;0;@");
        assert_eq!(sections, vec!["0", "0", "0", "@"]);

        let sections2 = FormatParser::split_sections("0.00");
        assert_eq!(sections2, vec!["0.00"]);

        let sections3 = FormatParser::split_sections("0\";\"0;[<0;]0");
        assert_eq!(sections3.len(), 2);

        let sections4 = FormatParser::split_sections("0;;");
        assert_eq!(sections4, vec!["0", "", ""]);
    }

    #[test]
    fn test_parse_simple_number() {
        let parser = FormatParser::parse("0");
        assert_eq!(parser.sections.len(), 1);
        assert_eq!(
            parser.sections[0].tokens,
            vec![FormatToken::Digit(Placeholder::Zero)]
        );
    }

    #[test]
    fn test_parse_minute_versus_month() {
        let parser = FormatParser::parse("h:mm");
        assert_eq!(parser.sections[0].tokens[2], FormatToken::Minute(2));

        let parser = FormatParser::parse("mm:ss");
        assert_eq!(parser.sections[0].tokens[0], FormatToken::Minute(2));

        let parser = FormatParser::parse("yyyy-mm-dd");
        assert_eq!(parser.sections[0].tokens[2], FormatToken::Month(2));
    }

    // 数値書式のテスト
    #[test]
    fn test_format_number_integer() {
        assert_eq!(fmt("0", 123.0), "123");
        assert_eq!(fmt("0", 0.0), "0");
        assert_eq!(fmt("0", 999999999.0), "999999999");
        assert_eq!(fmt("0000", 123.0), "0123");
        assert_eq!(fmt("#", 0.0), "");
    }

    #[test]
    fn test_format_number_decimal() {
        assert_eq!(fmt("0.00", 123.456), "123.46");
        assert_eq!(fmt("0.00", 0.1), "0.10");
        assert_eq!(fmt("0.00", 999.999), "1000.00");
        assert_eq!(fmt("#.00", 0.5), ".50");
        assert_eq!(fmt("0.0#", 1.5), "1.5");
        assert_eq!(fmt("0.0#", 1.25), "1.25");
        assert_eq!(fmt(".00", 12.5), "12.50");
    }

    #[test]
    fn test_format_number_percent() {
        assert_eq!(fmt("0%", 0.5), "50%");
        assert_eq!(fmt("0%", 1.0), "100%");
        assert_eq!(fmt("0.00%", 0.123), "12.30%");
        assert_eq!(fmt("0.00%", -0.1234), "-12.34%");
    }

    #[test]
    fn test_format_number_thousand_separator() {
        assert_eq!(fmt("#,##0", 1234.0), "1,234");
        assert_eq!(fmt("#,##0", 1234567.0), "1,234,567");
        assert_eq!(fmt("#,##0", 12.0), "12");
        assert_eq!(fmt("#,##0.00", 1234.56), "1,234.56");
        assert_eq!(fmt("0,", 12345.0), "12");
        assert_eq!(fmt("0.0,,", 1_500_000.0), "1.5");
    }

    #[test]
    fn test_format_number_currency() {
        assert_eq!(fmt("\"$\"#,##0.00", 1234.56), "$1,234.56");
        assert_eq!(fmt("[$€-407]#,##0.00", 1234.5), "€1,234.50");
        assert_eq!(fmt("\\$0", 5.0), "$5");
        assert_eq!(fmt("\"Price: $\"0.00", 123.45), "Price: $123.45");
    }

    #[test]
    fn test_format_number_sections() {
        assert_eq!(fmt("0;-0", 123.0), "123");
        assert_eq!(fmt("0;-0", -123.0), "-123");
        assert_eq!(fmt("0;(0)", -123.0), "(123)");
        assert_eq!(fmt("0;0;\"-\"", 0.0), "-");
        assert_eq!(fmt("0", -5.0), "-5");
        assert_eq!(fmt("0.00", -0.001), "0.00");
        assert_eq!(fmt("#,##0_);(#,##0)", -1234.0), "(1,234)");
        assert_eq!(fmt("#,##0_);(#,##0)", 1234.0), "1,234 ");
    }

    #[test]
    fn test_format_conditions() {
        let pattern = "[>=1000]#,##0,\"K\";0";
        assert_eq!(fmt(pattern, 25_000.0), "25K");
        assert_eq!(fmt(pattern, 999.0), "999");
    }

    #[test]
    fn test_format_scientific() {
        assert_eq!(fmt("0.00E+00", 12345.0), "1.23E+04");
        assert_eq!(fmt("0.00E+00", 0.000123), "1.23E-04");
        assert_eq!(fmt("0.00E+00", 0.0), "0.00E+00");
        assert_eq!(fmt("0.00E+00", 1e-310), "1.00E-310");
        assert_eq!(fmt("0.00E+00", 1.5e300), "1.50E+300");
        assert_eq!(fmt("##0.0E+0", 12345.0), "12.3E+3");
        assert_eq!(fmt("0.0E+0", 9.96), "1.0E+1");
    }

    #[test]
    fn test_format_mixed_literal() {
        assert_eq!(fmt("0.00\" kg\"", 123.45), "123.45 kg");
        assert_eq!(fmt("0\" units\"", 100.0), "100 units");
        assert_eq!(fmt("000-0000", 5551234.0), "555-1234");
    }

    #[test]
    fn test_format_color_ignored() {
        assert_eq!(fmt("[Red]0", 123.0), "123");
        assert_eq!(fmt("[Blue]0;[Red]-0", -7.0), "-7");
    }

    #[test]
    fn test_format_general_and_text() {
        assert_eq!(fmt("General", 123.45), "123.45");
        assert_eq!(fmt("General;[Red]-General", -2.5), "-2.5");
        assert_eq!(fmt("@", 123.0), "123");
        assert_eq!(fmt("", 1.5), "1.5");
        assert_eq!(fmt("# ?/?", 0.5), "0.5");
    }

    // 日付書式のテスト
    #[test]
    fn test_format_date() {
        assert_eq!(fmt("yyyy-mm-dd", 45658.0), "2025-01-01");
        assert_eq!(fmt("mm/dd/yyyy", 1.0), "01/01/1900");
        assert_eq!(fmt("m/d/yy", 45658.0), "1/1/25");
        assert_eq!(fmt("d-mmm-yy", 45658.0), "1-Jan-25");
        assert_eq!(fmt("mmmm d, yyyy", 45658.0), "January 1, 2025");
        assert_eq!(fmt("mmmmm", 45658.0), "J");
        assert_eq!(fmt("ddd", 45658.0), "Wed");
        assert_eq!(fmt("dddd", 45658.0), "Wednesday");
    }

    #[test]
    fn test_format_date_1904() {
        let parser = FormatParser::parse("yyyy-mm-dd");
        assert_eq!(parser.format_number(0.0, true), "1904-01-01");
        assert_eq!(parser.format_number(1.0, true), "1904-01-02");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(fmt("hh:mm:ss", 0.5), "12:00:00");
        assert_eq!(fmt("h:mm", 0.75), "18:00");
        assert_eq!(fmt("h:mm AM/PM", 0.75), "6:00 PM");
        assert_eq!(fmt("h:mm:ss AM/PM", 0.0), "12:00:00 AM");
        assert_eq!(fmt("h a/p", 0.25), "6 a");
        assert_eq!(fmt("yyyy-mm-dd hh:mm:ss", 45658.5), "2025-01-01 12:00:00");
    }

    #[test]
    fn test_format_elapsed_and_subseconds() {
        assert_eq!(fmt("[h]:mm:ss", 1.5), "36:00:00");
        assert_eq!(fmt("[mm]:ss", 0.0625), "90:00");
        assert_eq!(fmt("mm:ss.0", 0.5 / 86400.0), "00:00.5");
        assert_eq!(fmt("ss.000", 1.25 / 86400.0), "01.250");
    }

    #[test]
    fn test_format_negative_date_falls_back() {
        assert_eq!(fmt("yyyy-mm-dd", -1.0), "-1");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_format_is_deterministic(value in -1.0e9f64..1.0e9f64) {
                for pattern in ["0.00", "#,##0", "0%", "0.00E+00", "yyyy-mm-dd hh:mm", "General"] {
                    let parser = FormatParser::parse(pattern);
                    prop_assert_eq!(
                        parser.format_number(value, false),
                        parser.format_number(value, false)
                    );
                }
            }

            #[test]
            fn test_integer_format_matches_rounding(value in 0u32..10_000_000u32) {
                prop_assert_eq!(fmt("0", f64::from(value)), value.to_string());
            }
        }
    }
}
