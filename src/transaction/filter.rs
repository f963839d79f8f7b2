//! Filtering transactions for the commission and campaign views.

use serde::{Deserialize, Serialize};

use crate::campaign::{CampaignId, CampaignLookup};

use super::{
    models::{Transaction, TransactionKind},
    window::WindowRange,
};

/// Which kinds of transaction to show.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TypeFilter {
    /// No filtering.
    #[default]
    All,
    /// Commissions only.
    Commission,
    /// Withdrawals only.
    Withdrawal,
    /// Refunds only. Reserved for when the backend starts sending them.
    Refund,
}

impl TypeFilter {
    /// Whether a transaction of `kind` passes the filter.
    pub fn matches(self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Commission => kind == TransactionKind::Commission,
            TypeFilter::Withdrawal => kind == TransactionKind::Withdrawal,
            TypeFilter::Refund => kind == TransactionKind::Refund,
        }
    }
}

/// The filter parameters of the commission history view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Free text matched against the campaign name of commissions.
    pub query: String,
    /// Which kinds of transaction to keep.
    pub kind: TypeFilter,
    /// Only keep transactions created inside this window.
    pub window: Option<WindowRange>,
}

impl TransactionFilter {
    /// Whether `transaction` passes every part of the filter.
    ///
    /// The text query only applies to commissions; other kinds are kept or
    /// dropped by the type filter alone. Transactions without a creation time
    /// never fall inside a window.
    pub fn matches(&self, transaction: &Transaction, lookup: &CampaignLookup) -> bool {
        if !self.kind.matches(transaction.kind) {
            return false;
        }

        if let Some(window) = self.window {
            match transaction.created_on() {
                Some(date) if window.contains(date) => {}
                _ => return false,
            }
        }

        if transaction.is_commission() {
            let campaign_name = lookup.resolve_name(transaction.campaign_id.as_ref());
            return matches_query(campaign_name, &self.query);
        }

        true
    }
}

/// Case-insensitive substring match. A blank query matches everything.
fn matches_query(text: &str, query: &str) -> bool {
    let query = query.trim();

    query.is_empty() || text.to_lowercase().contains(&query.to_lowercase())
}

/// The transactions that pass `filter`, in their original order.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    lookup: &CampaignLookup,
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    let filtered: Vec<_> = transactions
        .iter()
        .filter(|transaction| filter.matches(transaction, lookup))
        .collect();

    tracing::debug!(
        "kept {} of {} transactions for filter {:?}",
        filtered.len(),
        transactions.len(),
        filter
    );

    filtered
}

/// The commissions earned through campaign `campaign_id`.
pub fn filter_by_campaign<'a>(
    transactions: &'a [Transaction],
    campaign_id: &CampaignId,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| {
            transaction.is_commission() && transaction.campaign_id.as_ref() == Some(campaign_id)
        })
        .collect()
}
