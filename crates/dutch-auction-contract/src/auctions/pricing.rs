/*
    Date: 2023
    Author: Fred Kyung-jin Rezeau <fred@litemint.com>
    Copyright (c) 2023 Litemint LLC

    MIT License
*/

//! Integer price math for descending price auctions.
//!
//! All quantities are atomic units (i128) and ledger seconds (u64).
//! Division is explicit: the decay rate is floored toward negative
//! infinity, the demand-implied clearing price is rounded up so that
//! tokens owed can never exceed the supply on sale.

/// Quotient rounded toward negative infinity.
/// Rust `/` truncates toward zero which is one too high for a
/// negative, non-exact quotient (e.g. the price decay rate).
pub fn floor_div(a: i128, b: i128) -> i128 {
    let quotient = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        quotient - 1
    } else {
        quotient
    }
}

/// Quotient rounded up. Operands must be non-negative.
pub fn ceil_div(a: i128, b: i128) -> i128 {
    (a + b - 1) / b
}

/// Time-based price: `initial_price` before the window, linear decay
/// inside it, `final_price` from the closing time on.
/// The decay rate is computed once with floored division; the result
/// is clamped so the floored rate cannot undershoot the final price
/// near the close.
pub fn time_price(
    initial_price: i128,
    final_price: i128,
    opening_time: u64,
    closing_time: u64,
    now: u64,
) -> i128 {
    if now < opening_time {
        initial_price
    } else if now >= closing_time {
        final_price
    } else {
        let rate = floor_div(
            final_price - initial_price,
            (closing_time - opening_time) as i128,
        );
        (initial_price + (now - opening_time) as i128 * rate).max(final_price)
    }
}

/// Demand-implied clearing price: the least price at which
/// `wei_raised / price` does not exceed `token_max_amount`.
pub fn clearing_price(wei_raised: i128, token_max_amount: i128) -> i128 {
    ceil_div(wei_raised, token_max_amount)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn floor_div_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(-1200, 1200), -1);
        assert_eq!(floor_div(-1201, 1200), -2);
        assert_eq!(floor_div(-2401, 1200), -3);
        assert_eq!(floor_div(-1199, 1200), -1);
    }

    #[test]
    fn ceil_div_rounds_up() {
        assert_eq!(ceil_div(0, 10), 0);
        assert_eq!(ceil_div(14400, 10), 1440);
        assert_eq!(ceil_div(14401, 10), 1441);
        assert_eq!(ceil_div(9, 10), 1);
    }

    #[test]
    fn time_price_holds_initial_before_opening() {
        assert_eq!(time_price(2400, 1200, 1000, 2200, 0), 2400);
        assert_eq!(time_price(2400, 1200, 1000, 2200, 999), 2400);
    }

    #[test]
    fn time_price_decays_linearly() {
        // 2400 -> 1200 over 20 minutes decays by 1 per second.
        assert_eq!(time_price(2400, 1200, 0, 1200, 0), 2400);
        assert_eq!(time_price(2400, 1200, 0, 1200, 301), 2099);
        assert_eq!(time_price(2400, 1200, 0, 1200, 600), 1800);
        assert_eq!(time_price(2400, 1200, 0, 1200, 1199), 1201);
    }

    #[test]
    fn time_price_holds_final_from_closing_on() {
        assert_eq!(time_price(2400, 1200, 0, 1200, 1200), 1200);
        assert_eq!(time_price(2400, 1200, 0, 1200, 9999), 1200);
    }

    #[test]
    fn time_price_rate_is_floored_not_truncated() {
        // Rate is floor(-2401 / 1200) = -3, not the truncated -2.
        assert_eq!(time_price(3601, 1200, 0, 1200, 600), 3601 - 3 * 600);
    }

    #[test]
    fn time_price_is_clamped_to_final_price() {
        // The floored rate hits the floor price before the close.
        assert_eq!(time_price(3601, 1200, 0, 1200, 1100), 1200);
    }

    #[test]
    fn clearing_price_never_overcommits_supply() {
        let supply = 10;
        for wei_raised in [1, 9, 14400, 14401, 20990] {
            let price = clearing_price(wei_raised, supply);
            assert!(wei_raised / price <= supply);
        }
    }
}
