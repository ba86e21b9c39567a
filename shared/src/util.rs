use rust_decimal::{Decimal, RoundingStrategy};

/// Format a price for display: `$` plus two decimal places.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}
