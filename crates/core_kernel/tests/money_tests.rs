//! Unit tests for the Money module
//!
//! Tests cover money creation, half-up rounding, currency handling,
//! rate application and overflow.

use core_kernel::{round_half_up, Currency, Money, MoneyError, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50), Currency::EGP);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::EGP);
    }

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_midpoint_rounds_up() {
        assert_eq!(round_half_up(dec!(2.345), 2), dec!(2.35));
        assert_eq!(round_half_up(dec!(2.355), 2), dec!(2.36));
    }

    #[test]
    fn test_below_midpoint_rounds_down() {
        assert_eq!(round_half_up(dec!(2.3449), 2), dec!(2.34));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_abs_diff_is_symmetric() {
        let a = Money::new(dec!(100), Currency::EGP);
        let b = Money::new(dec!(100.02), Currency::EGP);
        assert_eq!(a.abs_diff(&b).unwrap(), dec!(0.02));
        assert_eq!(b.abs_diff(&a).unwrap(), dec!(0.02));
    }

    #[test]
    fn test_abs_diff_mismatch() {
        let a = Money::new(dec!(10), Currency::EGP);
        let b = Money::new(dec!(10), Currency::USD);
        assert_eq!(
            a.abs_diff(&b),
            Err(MoneyError::CurrencyMismatch("EGP".to_string(), "USD".to_string()))
        );
    }
}

mod currency {
    use super::*;

    #[test]
    fn test_default_currency_is_egp() {
        assert_eq!(Currency::default(), Currency::EGP);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("sar".parse::<Currency>().unwrap(), Currency::SAR);
        assert_eq!(" Usd ".parse::<Currency>().unwrap(), Currency::USD);
    }

    #[test]
    fn test_parse_unknown_currency() {
        assert!(matches!(
            "XYZ".parse::<Currency>(),
            Err(MoneyError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_serde_uses_iso_code() {
        let json = serde_json::to_string(&Currency::EGP).unwrap();
        assert_eq!(json, "\"EGP\"");
    }
}

mod rates {
    use super::*;

    #[test]
    fn test_rate_display_as_percentage() {
        assert_eq!(Rate::new(dec!(0.025)).to_string(), "2.5%");
    }

    #[test]
    fn test_rate_applied_to_amount() {
        let rate = Rate::new(dec!(0.025));
        assert_eq!(rate.checked_apply_to(dec!(10000)), Some(dec!(250)));
    }

    #[test]
    fn test_rate_application_reports_overflow() {
        let rate = Rate::new(dec!(2));
        assert_eq!(rate.checked_apply_to(Decimal::MAX), None);
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_pads_to_minor_unit() {
        assert_eq!(Money::new(dec!(250), Currency::EGP).to_string(), "E£ 250.00");
    }

    #[test]
    fn test_display_three_decimals_for_kwd() {
        assert_eq!(Money::new(dec!(1.5), Currency::KWD).to_string(), "KD 1.500");
    }
}
