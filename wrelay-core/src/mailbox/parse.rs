//! Payment email parsing.
//!
//! The provider's emails look like:
//!
//! ```text
//! Subject: You received ₹10.0 in your account
//! Body:    ... from KUSUM BHAGAT ...
//! ```
//!
//! The amount comes from the subject (rupee symbol, falling back to `Rs.`),
//! the sender name from an all-caps `from NAME` phrase in the body.

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

// Patterns are literals and cannot fail to compile.
#[allow(clippy::expect_used)]
static RUPEE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹\s*([0-9][0-9.]*)").expect("valid pattern"));
#[allow(clippy::expect_used)]
static RS_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Rs\.?\s*([0-9][0-9.]*)").expect("valid pattern"));
#[allow(clippy::expect_used)]
static SENDER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+([A-Z][A-Z\s]+)").expect("valid pattern"));

/// Fields extracted from a payment confirmation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEmail {
    pub amount: Decimal,
    pub sender_name: Option<String>,
}

/// Extract the paid amount and sender name. `None` when no amount can be
/// recognized in the subject.
pub fn parse_payment_email(subject: &str, body: &str) -> Option<PaymentEmail> {
    let captures = RUPEE_AMOUNT
        .captures(subject)
        .or_else(|| RS_AMOUNT.captures(subject))?;
    let amount: Decimal = captures.get(1)?.as_str().parse().ok()?;

    let sender_name = SENDER_NAME
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty());

    Some(PaymentEmail {
        amount,
        sender_name,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_rupee_symbol_subject() {
        let parsed = parse_payment_email(
            "You received ₹10.0 in your account",
            "You've got money from KUSUM BHAGAT today",
        )
        .unwrap();
        assert_eq!(parsed.amount, dec!(10.0));
        assert_eq!(parsed.sender_name.as_deref(), Some("KUSUM BHAGAT"));
    }

    #[test]
    fn falls_back_to_rs_prefix() {
        let parsed = parse_payment_email("Payment of Rs. 250 received", "").unwrap();
        assert_eq!(parsed.amount, dec!(250));
        assert_eq!(parsed.sender_name, None);

        let parsed = parse_payment_email("rs 99.50 credited", "").unwrap();
        assert_eq!(parsed.amount, dec!(99.50));
    }

    #[test]
    fn missing_amount_yields_none() {
        assert!(parse_payment_email("Welcome to your new account", "from ALICE").is_none());
    }

    #[test]
    fn sender_name_is_trimmed() {
        let parsed =
            parse_payment_email("₹5 received", "transfer from RAVI KUMAR \nref 123").unwrap();
        assert_eq!(parsed.sender_name.as_deref(), Some("RAVI KUMAR"));
    }

    #[test]
    fn lowercase_sender_is_ignored() {
        let parsed = parse_payment_email("₹5 received", "a gift from someone").unwrap();
        assert_eq!(parsed.sender_name, None);
    }
}
