//! FormatSection Module
//!
//! Excel Number Format Stringのセクション定義を提供します。

use super::tokens::{FormatToken, Placeholder};

/// セクションの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionKind {
    /// 正数
    Positive,
    /// 負数
    Negative,
    /// ゼロ
    Zero,
    /// テキスト
    Text,
}

/// 比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

/// 条件付き書式の条件（例: `[>100]`, `[<=0]`）
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Condition {
    pub op: Comparison,
    pub operand: f64,
}

impl Condition {
    /// ブラケット内の文字列（`>100`など）を条件として解析する
    pub fn parse(content: &str) -> Option<Self> {
        let content = content.trim();
        let (op, rest) = [
            ("<=", Comparison::Le),
            (">=", Comparison::Ge),
            ("<>", Comparison::Ne),
            ("<", Comparison::Lt),
            (">", Comparison::Gt),
            ("=", Comparison::Eq),
        ]
        .iter()
        .find_map(|(prefix, op)| content.strip_prefix(prefix).map(|rest| (*op, rest)))?;

        let operand = rest.trim().parse::<f64>().ok()?;
        Some(Self { op, operand })
    }

    /// 値が条件を満たすかどうか
    pub fn matches(&self, value: f64) -> bool {
        match self.op {
            Comparison::Lt => value < self.operand,
            Comparison::Le => value <= self.operand,
            Comparison::Gt => value > self.operand,
            Comparison::Ge => value >= self.operand,
            Comparison::Eq => value == self.operand,
            Comparison::Ne => value != self.operand,
        }
    }
}

/// フォーマットのセクション（正数、負数、ゼロ、テキスト）
///
/// Excel Number Format Stringは最大4つのセクションに分割されます:
/// 1. 正数
/// 2. 負数
/// 3. ゼロ
/// 4. テキスト
#[derive(Debug, Clone)]
pub(crate) struct FormatSection {
    /// セクションの種類
    pub kind: SectionKind,

    /// 条件（例: [>100]）
    pub condition: Option<Condition>,

    /// フォーマットトークン
    pub tokens: Vec<FormatToken>,
}

impl FormatSection {
    /// 新しいセクションを生成
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            condition: None,
            tokens: Vec::new(),
        }
    }

    /// セクションが日付・時刻書式かどうかを判定
    pub fn is_datetime(&self) -> bool {
        self.tokens.iter().any(|t| t.is_datetime())
    }

    /// セクションが数値書式かどうかを判定
    pub fn is_numeric(&self) -> bool {
        self.tokens.iter().any(|t| t.is_numeric())
    }

    /// 秒の小数部を含むかどうか
    pub fn has_subseconds(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, FormatToken::SubSecond(_)))
    }

    /// 12時間表記かどうか
    pub fn has_am_pm(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, FormatToken::AmPm { .. }))
    }

    /// 数値レイアウトを解析する
    pub fn numeric_layout(&self) -> NumericLayout {
        NumericLayout::analyze(&self.tokens)
    }
}

/// 数値セクションの構造
///
/// プレースホルダーを整数部・小数部・指数部に分類し、
/// 桁区切りと倍率（`%`と末尾の`,`）を求めた結果です。
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct NumericLayout {
    pub integer: Vec<Placeholder>,
    pub fraction: Vec<Placeholder>,
    pub exponent: Vec<Placeholder>,
    pub has_decimal_point: bool,
    pub exponent_plus: Option<bool>,
    pub grouping: bool,
    pub percent_count: u32,
    pub thousands_scale: u32,
    pub has_fraction_bar: bool,
}

impl NumericLayout {
    fn analyze(tokens: &[FormatToken]) -> Self {
        #[derive(PartialEq)]
        enum Region {
            Integer,
            Fraction,
            Exponent,
        }

        let mut layout = NumericLayout::default();
        let mut region = Region::Integer;

        for (idx, token) in tokens.iter().enumerate() {
            match token {
                FormatToken::Digit(p) => match region {
                    Region::Integer => layout.integer.push(*p),
                    Region::Fraction => layout.fraction.push(*p),
                    Region::Exponent => layout.exponent.push(*p),
                },
                FormatToken::DecimalPoint if region == Region::Integer => {
                    layout.has_decimal_point = true;
                    region = Region::Fraction;
                }
                FormatToken::Exponent { plus_sign } => {
                    layout.exponent_plus = Some(*plus_sign);
                    region = Region::Exponent;
                }
                FormatToken::Percent => layout.percent_count += 1,
                FormatToken::FractionBar => layout.has_fraction_bar = true,
                FormatToken::ThousandSeparator if region != Region::Exponent => {
                    let rest = &tokens[idx + 1..];
                    let digit_follows = rest
                        .iter()
                        .take_while(|t| {
                            !matches!(t, FormatToken::DecimalPoint | FormatToken::Exponent { .. })
                        })
                        .any(|t| matches!(t, FormatToken::Digit(_)));
                    let digit_precedes = tokens[..idx]
                        .iter()
                        .any(|t| matches!(t, FormatToken::Digit(_)));

                    if digit_follows && region == Region::Integer && digit_precedes {
                        layout.grouping = true;
                    } else if !digit_follows && digit_precedes {
                        layout.thousands_scale += 1;
                    }
                }
                _ => {}
            }
        }

        layout
    }
}
