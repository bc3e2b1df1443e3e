//! General Format Module
//!
//! "General"書式の表示規則を実装します。

/// 有効数字の最大桁数
const SIGNIFICANT_DIGITS: i32 = 11;

/// "General"書式で数値を表示する
///
/// 絶対値が`1e-9`以上`1e11`未満なら最大11桁の有効数字で固定小数点表示し、
/// それ以外は`1.23457E+11`形式の指数表記にします。末尾の0は削除されます。
pub(crate) fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    let body = if (1e-9..1e11).contains(&abs) {
        let magnitude = abs.log10().floor() as i32 + 1;
        let decimals = (SIGNIFICANT_DIGITS - magnitude.max(1)).clamp(0, 15) as usize;
        let fixed = format!("{:.*}", decimals, abs);
        // 丸めで整数部が12桁になった場合は指数表記
        let integer_len = fixed.split('.').next().map_or(0, str::len);
        if integer_len > SIGNIFICANT_DIGITS as usize {
            scientific(abs)
        } else {
            trim_fraction(fixed)
        }
    } else {
        scientific(abs)
    };

    if body == "0" || value > 0.0 {
        body
    } else {
        format!("-{}", body)
    }
}

/// 仮数部を最大5桁の小数で表す指数表記
fn scientific(abs: f64) -> String {
    let formatted = format!("{:.5e}", abs);
    let (mantissa, exponent) = formatted
        .split_once('e')
        .unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!(
        "{}E{}{:02}",
        trim_fraction(mantissa.to_string()),
        sign,
        exponent.abs()
    )
}

/// 小数部の末尾の0と、不要になった小数点を削除する
fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}
