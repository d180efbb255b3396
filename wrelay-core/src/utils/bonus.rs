use rust_decimal::Decimal;

/// Returns the deposit bonus for a credited amount: 1%, rounded to 2 dp.
pub fn deposit_bonus(amount: Decimal) -> Decimal {
    (amount * Decimal::new(1, 2)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn one_percent_rounded_to_two_places() {
        assert_eq!(deposit_bonus(dec!(100)), dec!(1.00));
        assert_eq!(deposit_bonus(dec!(10)), dec!(0.10));
        assert_eq!(deposit_bonus(dec!(333)), dec!(3.33));
        assert_eq!(deposit_bonus(dec!(55.55)), dec!(0.56));
    }

    #[test]
    fn total_credited_is_amount_plus_bonus() {
        let amount = dec!(250);
        assert_eq!(amount + deposit_bonus(amount), dec!(252.50));
    }
}
