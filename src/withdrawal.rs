//! Withdrawal requests as listed by the withdraw-history endpoint.
//!
//! These records use their own status codes, distinct from the ledger
//! transaction codes: `1` completed, `0` or `2` pending, `3` rejected.

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    format::{format_date, format_magnitude},
    scalar::{Scalar, parse_timestamp},
};

/// The processing state of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithdrawalStatus {
    /// Paid out.
    Completed,
    /// Waiting for approval.
    Pending,
    /// Refused by the merchant.
    Rejected,
    /// Missing or unrecognised status.
    Unknown,
}

impl WithdrawalStatus {
    fn from_scalar(scalar: Option<&Scalar>) -> Self {
        match scalar.and_then(Scalar::as_i64) {
            Some(1) => Self::Completed,
            Some(0 | 2) => Self::Pending,
            Some(3) => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    /// The label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }
}

/// A request to pay out earned commission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawWithdrawal")]
pub struct WithdrawalRecord {
    /// The backend's withdrawal ID.
    pub id: Option<String>,
    /// The requested amount.
    pub amount: f64,
    /// The processing state.
    pub status: WithdrawalStatus,
    /// How the money is paid out, e.g. a bank transfer.
    pub payment_method: Option<String>,
    /// The affiliate's note on the request.
    pub description: Option<String>,
    /// When the request was made.
    pub created_at: Option<PrimitiveDateTime>,
}

impl WithdrawalRecord {
    /// The amount with two decimals, e.g. `1,200.00`.
    pub fn display_amount(&self) -> String {
        format_magnitude(self.amount)
    }

    /// The request date as `YYYY/MM/DD`, or an empty string when unknown.
    pub fn display_date(&self) -> String {
        self.created_at
            .map(|timestamp| format_date(timestamp.date()))
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct RawWithdrawal {
    #[serde(default, alias = "id")]
    withdraw_id: Option<Scalar>,
    #[serde(default)]
    amount: Option<Scalar>,
    #[serde(default)]
    status: Option<Scalar>,
    #[serde(default)]
    payment_method: Option<Scalar>,
    #[serde(default)]
    withdraw_description: Option<Scalar>,
    #[serde(default)]
    created_at: Option<Scalar>,
}

impl From<RawWithdrawal> for WithdrawalRecord {
    fn from(raw: RawWithdrawal) -> Self {
        let text = |scalar: &Option<Scalar>| scalar.as_ref().and_then(Scalar::as_non_empty_text);

        Self {
            id: text(&raw.withdraw_id),
            amount: raw
                .amount
                .as_ref()
                .and_then(Scalar::as_f64)
                .map_or(0.0, f64::abs),
            status: WithdrawalStatus::from_scalar(raw.status.as_ref()),
            payment_method: text(&raw.payment_method),
            description: text(&raw.withdraw_description),
            created_at: text(&raw.created_at).and_then(|text| parse_timestamp(&text)),
        }
    }
}

/// Withdrawal amounts summed by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WithdrawalTotals {
    /// Paid out.
    pub completed: f64,
    /// Waiting for approval.
    pub pending: f64,
    /// Refused.
    pub rejected: f64,
}

/// Sum withdrawal amounts by state. Records in an unknown state are skipped.
pub fn withdrawal_totals(records: &[WithdrawalRecord]) -> WithdrawalTotals {
    let mut totals = WithdrawalTotals::default();

    for record in records {
        match record.status {
            WithdrawalStatus::Completed => totals.completed += record.amount,
            WithdrawalStatus::Pending => totals.pending += record.amount,
            WithdrawalStatus::Rejected => totals.rejected += record.amount,
            WithdrawalStatus::Unknown => {}
        }
    }

    totals
}
