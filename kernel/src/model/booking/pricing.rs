use rust_decimal::{Decimal, RoundingStrategy};
use shared::error::{AppError, AppResult};

/// Stays of at least this many hours get the long-stay discount.
pub const LONG_STAY_THRESHOLD_HOURS: i32 = 5;
const LONG_STAY_DISCOUNT_PERCENT: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub total_hours: i32,
    pub total_price: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Prices a stay of `total_hours` whole hours at `hourly_rate`. All money
/// amounts are fixed to two decimal places.
pub fn quote(total_hours: i32, hourly_rate: Decimal) -> AppResult<PriceBreakdown> {
    if total_hours <= 0 {
        return Err(AppError::UnprocessableEntity(
            "Booking duration must be at least one hour".into(),
        ));
    }
    if hourly_rate <= Decimal::ZERO {
        return Err(AppError::UnprocessableEntity(
            "Hourly rate must be positive".into(),
        ));
    }

    let total_price = round_money(hourly_rate * Decimal::from(total_hours));
    let discount_percent = if total_hours >= LONG_STAY_THRESHOLD_HOURS {
        Decimal::from(LONG_STAY_DISCOUNT_PERCENT)
    } else {
        Decimal::ZERO
    };
    let discount_amount = round_money(total_price * discount_percent / Decimal::ONE_HUNDRED);
    let final_price = total_price - discount_amount;

    Ok(PriceBreakdown {
        total_hours,
        total_price,
        discount_percent,
        discount_amount,
        final_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn short_stays_pay_full_price() {
        let breakdown = quote(4, dec!(50)).unwrap();
        assert_eq!(breakdown.total_price, dec!(200.00));
        assert_eq!(breakdown.discount_percent, Decimal::ZERO);
        assert_eq!(breakdown.discount_amount, dec!(0.00));
        assert_eq!(breakdown.final_price, dec!(200.00));
    }

    #[test]
    fn five_hours_at_fifty_gets_the_long_stay_discount() {
        let breakdown = quote(5, dec!(50)).unwrap();
        assert_eq!(breakdown.total_price, dec!(250.00));
        assert_eq!(breakdown.discount_percent, dec!(15));
        assert_eq!(breakdown.discount_amount, dec!(37.50));
        assert_eq!(breakdown.final_price, dec!(212.50));
    }

    #[test]
    fn discounts_round_half_away_from_zero() {
        // 6 * 33.33 = 199.98; 15% of that is 29.997 -> 30.00
        let breakdown = quote(6, dec!(33.33)).unwrap();
        assert_eq!(breakdown.total_price, dec!(199.98));
        assert_eq!(breakdown.discount_amount, dec!(30.00));
        assert_eq!(breakdown.final_price, dec!(169.98));
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        assert!(quote(0, dec!(50)).is_err());
        assert!(quote(-1, dec!(50)).is_err());
        assert!(quote(3, Decimal::ZERO).is_err());
        assert!(quote(3, dec!(-10)).is_err());
    }
}
