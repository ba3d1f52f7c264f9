use thiserror::Error;
use vx_api_types::{CardDetails, PaymentMethod};

pub const MIN_CARD_DIGITS: usize = 13;
pub const MIN_CVV_DIGITS: usize = 3;
pub const MIN_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount {amount} is below the minimum top-up of {minimum}")]
    AmountBelowMinimum { amount: u64, minimum: u64 },
    #[error("card number needs at least 13 digits")]
    CardNumber,
    #[error("expiry must look like MM/YY")]
    Expiry,
    #[error("cvv needs at least 3 digits")]
    Cvv,
    #[error("cardholder name needs at least 2 characters")]
    CardholderName,
}

/// Checks the form in field order and reports the first rule that fails.
pub fn validate(
    amount: u64,
    minimum: u64,
    method: PaymentMethod,
    card: &CardDetails,
) -> Result<(), ValidationError> {
    if amount < minimum {
        return Err(ValidationError::AmountBelowMinimum { amount, minimum });
    }

    if method != PaymentMethod::Card {
        return Ok(());
    }

    if card.number_digits().len() < MIN_CARD_DIGITS {
        return Err(ValidationError::CardNumber);
    }
    if !is_expiry_shape(&card.expiry) {
        return Err(ValidationError::Expiry);
    }
    if card.cvv.len() < MIN_CVV_DIGITS || !card.cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Cvv);
    }
    if card.name.trim().chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::CardholderName);
    }

    Ok(())
}

pub fn is_valid(amount: u64, minimum: u64, method: PaymentMethod, card: &CardDetails) -> bool {
    validate(amount, minimum, method, card).is_ok()
}

// exactly `\d\d/\d\d`
fn is_expiry_shape(expiry: &str) -> bool {
    let bytes = expiry.as_bytes();
    bytes.len() == 5
        && bytes[2] == b'/'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_card_number;
    use proptest::prelude::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    const MIN: u64 = 10_000;

    fn valid_card() -> CardDetails {
        CardDetails {
            number: "4242 4242 4242 4242".to_owned(),
            expiry: "08/28".to_owned(),
            cvv: "321".to_owned(),
            name: "Siti Rahma".to_owned(),
        }
    }

    #[test]
    fn amount_below_minimum_is_rejected() {
        assert_eq!(
            validate(7_500, MIN, PaymentMethod::Dana, &CardDetails::default()),
            Err(ValidationError::AmountBelowMinimum {
                amount: 7_500,
                minimum: MIN
            })
        );
        assert!(is_valid(MIN, MIN, PaymentMethod::Dana, &CardDetails::default()));
    }

    #[test]
    fn non_card_methods_ignore_card_fields() {
        for method in [
            PaymentMethod::Dana,
            PaymentMethod::Gopay,
            PaymentMethod::Ovo,
            PaymentMethod::Shopeepay,
            PaymentMethod::Bank,
        ] {
            assert!(is_valid(20_000, MIN, method, &CardDetails::default()), "{method}");
        }
    }

    #[test]
    fn card_method_checks_each_field() {
        let card = valid_card();
        assert_eq!(validate(20_000, MIN, PaymentMethod::Card, &card), Ok(()));

        let short_number = CardDetails {
            number: "4242 4242 4242".to_owned(),
            ..valid_card()
        };
        assert_eq!(
            validate(20_000, MIN, PaymentMethod::Card, &short_number),
            Err(ValidationError::CardNumber)
        );

        let bad_expiry = CardDetails {
            expiry: "08/2".to_owned(),
            ..valid_card()
        };
        assert_eq!(
            validate(20_000, MIN, PaymentMethod::Card, &bad_expiry),
            Err(ValidationError::Expiry)
        );

        let slashless = CardDetails {
            expiry: "08-28".to_owned(),
            ..valid_card()
        };
        assert_eq!(
            validate(20_000, MIN, PaymentMethod::Card, &slashless),
            Err(ValidationError::Expiry)
        );

        let short_cvv = CardDetails {
            cvv: "12".to_owned(),
            ..valid_card()
        };
        assert_eq!(
            validate(20_000, MIN, PaymentMethod::Card, &short_cvv),
            Err(ValidationError::Cvv)
        );

        let blank_name = CardDetails {
            name: "  A  ".to_owned(),
            ..valid_card()
        };
        assert_eq!(
            validate(20_000, MIN, PaymentMethod::Card, &blank_name),
            Err(ValidationError::CardholderName)
        );
    }

    #[test]
    fn thirteen_digit_cards_are_accepted() {
        let card = CardDetails {
            number: "4222 2222 2222 2".to_owned(),
            ..valid_card()
        };
        assert!(is_valid(20_000, MIN, PaymentMethod::Card, &card));
    }

    /// Each field is either drawn from its valid shape or from arbitrary noise, so
    /// both fully valid and invalid forms come up regularly.
    fn card_form() -> impl Strategy<Value = (u64, CardDetails)> {
        let amount = prop_oneof![MIN..200_000u64, 0..MIN];
        let number = prop_oneof![
            "[0-9]{13,16}".prop_map(|digits| format_card_number(&digits)),
            "[0-9 ]{0,19}",
        ];
        let expiry = prop_oneof!["[0-9]{2}/[0-9]{2}", "[0-9/]{0,6}"];
        let cvv = prop_oneof!["[0-9]{3,4}", "[0-9]{0,4}"];
        let name = prop_oneof!["[A-Z][a-z]{1,7}( [A-Z][a-z]{1,7})?", "[ a-z]{0,4}"];
        (amount, number, expiry, cvv, name).prop_map(|(amount, number, expiry, cvv, name)| {
            (
                amount,
                CardDetails {
                    number,
                    expiry,
                    cvv,
                    name,
                },
            )
        })
    }

    fn satisfies_every_rule(amount: u64, card: &CardDetails) -> bool {
        let digit_count = card.number.chars().filter(char::is_ascii_digit).count();
        let expiry_ok = card.expiry.len() == 5
            && card
                .expiry
                .chars()
                .enumerate()
                .all(|(i, c)| if i == 2 { c == '/' } else { c.is_ascii_digit() });
        amount >= MIN
            && digit_count >= 13
            && expiry_ok
            && card.cvv.len() >= 3
            && card.name.trim().len() >= 2
    }

    #[test]
    fn card_form_reaches_both_outcomes() {
        let mut runner = TestRunner::deterministic();
        let strategy = card_form();
        let (mut valid, mut invalid) = (0, 0);
        for _ in 0..512 {
            let (amount, card) = strategy
                .new_tree(&mut runner)
                .expect("card form strategy generates")
                .current();
            if is_valid(amount, MIN, PaymentMethod::Card, &card) {
                valid += 1;
            } else {
                invalid += 1;
            }
        }
        assert!(valid > 0, "no valid card forms generated");
        assert!(invalid > 0, "no invalid card forms generated");
    }

    proptest! {
        #[test]
        fn below_minimum_is_never_valid(
            amount in 0u64..MIN,
            method_index in 0usize..PaymentMethod::ALL.len(),
            number in "[0-9 ]{0,19}",
            cvv in "[0-9]{0,4}",
        ) {
            let card = CardDetails { number, cvv, ..valid_card() };
            prop_assert!(!is_valid(amount, MIN, PaymentMethod::ALL[method_index], &card));
        }

        #[test]
        fn card_validity_is_conjunction_of_rules((amount, card) in card_form()) {
            prop_assert_eq!(
                is_valid(amount, MIN, PaymentMethod::Card, &card),
                satisfies_every_rule(amount, &card)
            );
        }
    }
}
