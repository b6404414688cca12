use std::str::FromStr;

use anyhow::{bail, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// 対応しているロケールのプリセット。
pub const SUPPORTED_LOCALES: [&str; 3] = ["pt-BR", "en-US", "de-DE"];

const NO_BREAK_SPACE: char = '\u{a0}';

/// 通貨記号を金額の前後どちらに置くか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// ロケールごとの通貨表示形式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub position: SymbolPosition,
    /// 記号と金額の間に改行しない空白を入れるか。
    pub spaced: bool,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    /// ブラジルレアル(`pt-BR`)の表示形式を返す。
    fn default() -> Self {
        Self {
            symbol: "R$".to_string(),
            position: SymbolPosition::Prefix,
            spaced: true,
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

impl CurrencyFormat {
    /// ロケール名から表示形式のプリセットを返す。
    ///
    /// # Arguments
    ///
    /// * `locale` - `pt-BR`などのロケール名
    pub fn for_locale(locale: &str) -> Result<Self> {
        let format = match locale {
            "pt-BR" => Self::default(),
            "en-US" => Self {
                symbol: "$".to_string(),
                position: SymbolPosition::Prefix,
                spaced: false,
                thousands_separator: ',',
                decimal_separator: '.',
            },
            "de-DE" => Self {
                symbol: "€".to_string(),
                position: SymbolPosition::Suffix,
                spaced: true,
                thousands_separator: '.',
                decimal_separator: ',',
            },
            other => bail!(
                "Unsupported locale: {} (supported: {})",
                other,
                SUPPORTED_LOCALES.join(", ")
            ),
        };

        Ok(format)
    }

    /// 金額を通貨形式の文字列に変換する。
    ///
    /// 金額の最短の10進表記を小数点以下2桁で四捨五入する。数値でない金額は0として表示する。
    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let digits = fixed_digits(amount.abs());
        let (units, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
        let is_zero = units.bytes().chain(cents.bytes()).all(|b| b == b'0');
        let sign = if amount < 0.0 && !is_zero { "-" } else { "" };

        let number = format!(
            "{}{}{}",
            group_thousands(units, self.thousands_separator),
            self.decimal_separator,
            cents
        );
        let space = if self.spaced {
            NO_BREAK_SPACE.to_string()
        } else {
            String::new()
        };

        match self.position {
            SymbolPosition::Prefix => format!("{}{}{}{}", sign, self.symbol, space, number),
            SymbolPosition::Suffix => format!("{}{}{}{}", sign, number, space, self.symbol),
        }
    }
}

/// デフォルトの表示形式(`pt-BR`/`BRL`)で金額を文字列に変換する。
pub fn format_currency(amount: f64) -> String {
    CurrencyFormat::default().format(amount)
}

/// 入力テキストを数値に変換する。
///
/// 前後の空白を除いて空なら0、数値として読めなければ`NaN`を返す。
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    trimmed.parse().unwrap_or(f64::NAN)
}

/// 0以上の金額を`1234.56`のような小数点以下2桁の文字列にする。
///
/// `Decimal`に収まらない大きさの金額は端数を持たないので、そのまま書き出す。
fn fixed_digits(amount: f64) -> String {
    match Decimal::from_str(&amount.to_string()) {
        Ok(value) => format!(
            "{:.2}",
            value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        Err(_) => format!("{:.2}", amount),
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }

    grouped
}
