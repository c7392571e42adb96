//! Unit tests for the Usd and Percent types
//!
//! Tests cover construction, rounding, arithmetic, display formatting,
//! parsing and JSON representation.

use core_kernel::{Usd, Percent, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_cents() {
        let m = Usd::new(dec!(100.123456789));
        assert_eq!(m.amount(), dec!(100.12));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Usd::from_cents(10050).amount(), dec!(100.50));
        assert_eq!(Usd::from_cents(10050).cents(), 10050);
    }

    #[test]
    fn test_zero_is_zero() {
        assert!(Usd::zero().is_zero());
        assert!(!Usd::zero().is_positive());
        assert!(!Usd::zero().is_negative());
    }

    #[test]
    fn test_positive_rejects_zero_and_negative() {
        assert!(matches!(Usd::positive(dec!(0)), Err(MoneyError::InvalidAmount(_))));
        assert!(Usd::positive(dec!(-5)).is_err());
        assert_eq!(Usd::positive(dec!(0.01)).unwrap().amount(), dec!(0.01));
    }

    #[test]
    fn test_positive_rejects_sub_cent_amount() {
        // 0.004 rounds to 0.00
        assert!(Usd::positive(dec!(0.004)).is_err());
    }

    #[test]
    fn test_non_negative_accepts_zero() {
        assert_eq!(Usd::non_negative(dec!(0)).unwrap(), Usd::zero());
        assert_eq!(
            Usd::non_negative(dec!(-1)),
            Err(MoneyError::Negative(dec!(-1)))
        );
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_add_and_sub() {
        let a = Usd::new(dec!(100.00));
        let b = Usd::new(dec!(30.25));
        assert_eq!((a + b).amount(), dec!(130.25));
        assert_eq!((a - b).amount(), dec!(69.75));
        assert_eq!((-a).amount(), dec!(-100.00));
    }

    #[test]
    fn test_checked_add() {
        let a = Usd::new(dec!(1.10));
        assert_eq!(a.checked_add(&a).unwrap().amount(), dec!(2.20));
    }

    #[test]
    fn test_sum_iterator() {
        let parts = vec![Usd::new(dec!(1000)), Usd::new(dec!(50)), Usd::new(dec!(50)), Usd::new(dec!(100))];
        let total: Usd = parts.iter().sum();
        assert_eq!(total.amount(), dec!(1200.00));
    }

    #[test]
    fn test_percent_of_rounds_to_cents() {
        let carrier = Usd::new(dec!(1234.57));
        let tax = carrier.percent_of(Percent::new(dec!(3.6)).unwrap());
        // 44.44452 -> 44.44
        assert_eq!(tax.amount(), dec!(44.44));
    }

    #[test]
    fn test_percent_of_zero_rate() {
        let carrier = Usd::new(dec!(5000));
        assert!(carrier.percent_of(Percent::zero()).is_zero());
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_formats() {
        assert_eq!(Usd::new(dec!(1234.5)).to_string(), "$1,234.50");
        assert_eq!(Usd::new(dec!(12)).to_string(), "$12.00");
        assert_eq!(Usd::new(dec!(123456789.01)).to_string(), "$123,456,789.01");
        assert_eq!(Usd::new(dec!(100)).to_display(), "$100.00");
    }

    #[test]
    fn test_parse_accepts_formatted_and_plain() {
        assert_eq!("$1,234.50".parse::<Usd>().unwrap(), Usd::new(dec!(1234.50)));
        assert_eq!("1234.5".parse::<Usd>().unwrap(), Usd::new(dec!(1234.50)));
        assert_eq!("-$12".parse::<Usd>().unwrap(), Usd::new(dec!(-12)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("twelve".parse::<Usd>(), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::new(dec!(5.00)).unwrap().to_string(), "5%");
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_usd_json_number() {
        let json = serde_json::to_value(Usd::new(dec!(150))).unwrap();
        assert_eq!(json, serde_json::json!(150.0));
    }

    #[test]
    fn test_usd_deserialize_rounds() {
        let usd: Usd = serde_json::from_str("10.125").unwrap();
        assert_eq!(usd.amount(), dec!(10.13));
    }

    #[test]
    fn test_percent_deserialize_validates_range() {
        assert!(serde_json::from_str::<Percent>("101").is_err());
        let ok: Percent = serde_json::from_str("5").unwrap();
        assert_eq!(ok.as_percentage(), dec!(5));
    }
}
