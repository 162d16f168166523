use rust_decimal::Decimal;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Decimal, symbol: &str) -> String;
}

/// Groups integer digits in threes (`Rp 1,250,000.5`).
#[derive(Debug, Clone, Copy)]
pub struct GroupedFormatter {
    pub separator: char,
}

impl Default for GroupedFormatter {
    fn default() -> Self {
        Self { separator: ',' }
    }
}

impl CurrencyFormatter for GroupedFormatter {
    fn format_amount(&self, amount: Decimal, symbol: &str) -> String {
        let normalized = amount.normalize().to_string();
        let (sign, digits) = match normalized.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", normalized.as_str()),
        };
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (digits, None),
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (idx, ch) in whole.chars().enumerate() {
            if idx > 0 && (whole.len() - idx) % 3 == 0 {
                grouped.push(self.separator);
            }
            grouped.push(ch);
        }
        if let Some(fraction) = fraction {
            grouped.push('.');
            grouped.push_str(fraction);
        }

        if symbol.is_empty() {
            format!("{sign}{grouped}")
        } else {
            format!("{symbol} {sign}{grouped}")
        }
    }
}

/// Shorthand for [`GroupedFormatter::default`].
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    GroupedFormatter::default().format_amount(amount, symbol)
}
