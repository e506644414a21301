// src/common/currency.rs

use rust_decimal::{Decimal, RoundingStrategy};

// Rand sul-africano (ZAR). Único formato de moeda do dashboard.
pub const CURRENCY_CODE: &str = "ZAR";
pub const CURRENCY_PREFIX: &str = "R";

// Marcador para métricas sem período anterior comparável
pub const NOT_AVAILABLE: &str = "N/A";

/// Valor monetário completo, ex: `R 1,234,500` ou `R 1,234.50`.
///
/// Valores inteiros saem sem casas decimais; valores fracionados saem sempre com
/// duas casas (arredondamento "meio para longe do zero").
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = sign_marker(rounded);

    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = format!("{}{} {}", sign, CURRENCY_PREFIX, group_thousands(whole));
    if cents != "00" {
        out.push('.');
        out.push_str(cents);
    }
    out
}

/// Versão compacta para rótulos de eixo: `amount / 1000` sem casas, sufixo `k`.
/// `1_234_500` vira `R 1235k` (sem separador de milhar).
pub fn format_compact_currency(amount: Decimal) -> String {
    let thousands = (amount / Decimal::ONE_THOUSAND)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{} {:.0}k", sign_marker(thousands), CURRENCY_PREFIX, thousands.abs())
}

/// Contagens (pedidos, clientes): só separador de milhar.
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Variação percentual com sinal explícito: `+12.5%`, `+0.0%`, `-5.3%`.
pub fn format_percent_change(percent: Decimal) -> String {
    let marker = if percent.is_sign_negative() && !percent.is_zero() { "-" } else { "+" };
    format!("{}{:.1}%", marker, round_one_decimal(percent).abs())
}

/// Percentual simples: `12.5%`, `-5.3%`.
pub fn format_percent(percent: Decimal) -> String {
    let marker = if percent.is_sign_negative() && !percent.is_zero() { "-" } else { "" };
    format!("{}{:.1}%", marker, round_one_decimal(percent).abs())
}

fn round_one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

// Zero arredondado nunca leva sinal
fn sign_marker(value: Decimal) -> &'static str {
    if value.is_sign_negative() && !value.is_zero() { "-" } else { "" }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
