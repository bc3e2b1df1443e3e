//! Format Module
//!
//! Excel Number Format Stringの構文解析と適用を提供します。

mod builtin;
mod datetime;
mod general;
mod parser;
mod sections;
mod tokens;

pub(crate) use builtin::builtin_format;
pub(crate) use general::format_general;
pub(crate) use parser::FormatParser;
