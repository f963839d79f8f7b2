//! Presentation of single transactions.

use std::fmt::Display;

use serde::Serialize;

use crate::format::{format_magnitude, with_currency};

use super::models::{Transaction, TransactionKind, TransactionRole};

/// A transaction amount with the sign implied by its kind.
///
/// Commissions display as `+amount`, withdrawals as `-amount` and anything
/// else unsigned. The stored amount is never changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedAmount {
    /// The direction of money.
    pub role: TransactionRole,
    /// The unsigned amount.
    pub magnitude: f64,
}

impl SignedAmount {
    /// The sign prefix: `+`, `-` or nothing.
    pub fn sign(&self) -> &'static str {
        match self.role {
            TransactionRole::Inbound => "+",
            TransactionRole::Outbound => "-",
            TransactionRole::Neutral => "",
        }
    }

    /// The amount as a signed number, e.g. for summing.
    pub fn value(&self) -> f64 {
        match self.role {
            TransactionRole::Outbound => -self.magnitude,
            TransactionRole::Inbound | TransactionRole::Neutral => self.magnitude,
        }
    }

    /// The formatted amount followed by `currency`, e.g. `+45.00 DT`.
    pub fn with_currency(&self, currency: &str) -> String {
        with_currency(&self.to_string(), currency)
    }
}

impl Display for SignedAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.sign(), format_magnitude(self.magnitude))
    }
}

impl Serialize for SignedAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The signed representation of `transaction`'s amount.
pub fn signed_amount(transaction: &Transaction) -> SignedAmount {
    SignedAmount {
        role: transaction.kind.role(),
        magnitude: transaction.amount,
    }
}

/// A one-line description of `transaction`.
pub fn describe(transaction: &Transaction) -> String {
    match transaction.kind {
        TransactionKind::Commission => {
            let name = format!(
                "{} {}",
                transaction.customer.first_name, transaction.customer.last_name
            );
            let name = name.trim();

            if name.is_empty() {
                "Commission earned from an order".to_owned()
            } else {
                format!("Commission earned from {name}'s order")
            }
        }
        TransactionKind::Withdrawal => "Withdrawal".to_owned(),
        TransactionKind::Refund | TransactionKind::Other => "Transaction".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use crate::transaction::{Transaction, TransactionKind, TransactionStatus};

    use super::{describe, signed_amount};

    fn transaction(kind: TransactionKind, amount: f64) -> Transaction {
        Transaction::build(kind, TransactionStatus::Completed, amount).finalise()
    }

    #[test]
    fn commissions_are_positive() {
        let transaction = transaction(TransactionKind::Commission, 45.0);

        let got = signed_amount(&transaction);

        assert_eq!(got.to_string(), "+45.00");
        assert_eq!(got.with_currency("DT"), "+45.00 DT");
        assert_eq!(got.value(), 45.0);
        assert_eq!(transaction.amount, 45.0);
    }

    #[test]
    fn withdrawals_are_negative() {
        let transaction = transaction(TransactionKind::Withdrawal, 200.0);

        let got = signed_amount(&transaction);

        assert_eq!(got.to_string(), "-200.00");
        assert_eq!(got.value(), -200.0);
        assert_eq!(got.magnitude, transaction.amount);
    }

    #[test]
    fn other_kinds_are_unsigned() {
        for kind in [TransactionKind::Refund, TransactionKind::Other] {
            let got = signed_amount(&transaction(kind, 32.5));

            assert_eq!(got.to_string(), "32.50");
            assert_eq!(got.value(), 32.5);
        }
    }

    #[test]
    fn describes_commission_with_customer_name() {
        let transaction =
            Transaction::build(TransactionKind::Commission, TransactionStatus::Pending, 1.0)
                .customer("John", "Doe")
                .finalise();

        assert_eq!(
            describe(&transaction),
            "Commission earned from John Doe's order"
        );
    }

    #[test]
    fn describes_commission_without_customer_name() {
        let transaction = transaction(TransactionKind::Commission, 1.0);

        assert_eq!(describe(&transaction), "Commission earned from an order");
    }

    #[test]
    fn describes_other_kinds() {
        assert_eq!(
            describe(&transaction(TransactionKind::Withdrawal, 1.0)),
            "Withdrawal"
        );
        assert_eq!(
            describe(&transaction(TransactionKind::Refund, 1.0)),
            "Transaction"
        );
        assert_eq!(
            describe(&transaction(TransactionKind::Other, 1.0)),
            "Transaction"
        );
    }
}
