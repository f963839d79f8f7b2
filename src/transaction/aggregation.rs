//! Scalar and grouped aggregates over affiliate transactions.
//!
//! Every function takes the current transaction list by reference and
//! returns fresh values; nothing here is cached. Records with missing fields
//! contribute zero and never fall inside a date-bounded aggregate.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use time::Date;

use crate::campaign::{CampaignId, CampaignLookup};

use super::{
    models::{Transaction, TransactionKind, TransactionRole, TransactionStatus},
    window::{WindowPreset, compute_window_range, month_abbrev},
};

/// The label used for commissions that have no known campaign.
pub const UNASSIGNED_CAMPAIGN_LABEL: &str = "Unassigned";

/// Amounts summed by the direction of money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KindTotals {
    /// Sum of all commissions.
    pub commission: f64,
    /// Sum of all withdrawals.
    pub withdrawal: f64,
    /// Sum of everything else.
    pub neutral: f64,
}

/// Amounts summed by processing state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusTotals {
    /// Sum of completed transactions.
    pub completed: f64,
    /// Sum of pending transactions.
    pub pending: f64,
    /// Sum of transactions in an unknown state.
    pub unknown: f64,
}

/// The headline figures of the commissions page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CommissionSummary {
    /// Completed commissions.
    pub total_earned: f64,
    /// Commissions waiting to be confirmed.
    pub pending: f64,
    /// Completed commissions created this calendar month.
    pub this_month: f64,
    /// Completed withdrawals.
    pub withdrawn: f64,
    /// Withdrawals that were requested but not paid out yet.
    pub requested: f64,
    /// What the affiliate can still withdraw.
    pub available_balance: f64,
    /// Distinct buyers the affiliate has earned commission from.
    pub active_referrals: usize,
}

/// The completed commission earned in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The first day of the month.
    pub month: Date,
    /// Three-letter month name, e.g. "Jan".
    pub label: String,
    /// The commission earned.
    pub total: f64,
}

/// The completed commission earned through one campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignTotal {
    /// The campaign, `None` for commissions without a campaign.
    pub campaign_id: Option<CampaignId>,
    /// The campaign's display name.
    pub name: String,
    /// The commission earned.
    pub total: f64,
    /// How many commissions were counted.
    pub count: usize,
}

fn is_completed_commission(transaction: &Transaction) -> bool {
    transaction.is_commission() && transaction.status == TransactionStatus::Completed
}

/// Sum of completed commissions created in the same calendar month and year
/// as `today`.
///
/// Commissions without a creation time are excluded.
pub fn this_month_commission_total(transactions: &[Transaction], today: Date) -> f64 {
    let this_month = compute_window_range(WindowPreset::Month, today);

    transactions
        .iter()
        .filter(|transaction| is_completed_commission(transaction))
        .filter(|transaction| {
            transaction
                .created_on()
                .is_some_and(|date| this_month.contains(date))
        })
        .map(|transaction| transaction.amount)
        .sum()
}

/// The number of distinct, non-empty buyer IDs across all commissions.
pub fn active_referrals_count(transactions: &[Transaction]) -> usize {
    transactions
        .iter()
        .filter(|transaction| transaction.is_commission())
        .filter_map(|transaction| transaction.buyer_id.as_deref())
        .map(str::trim)
        .filter(|buyer_id| !buyer_id.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Sum amounts by the direction of money.
pub fn totals_by_kind(transactions: &[Transaction]) -> KindTotals {
    let mut totals = KindTotals::default();

    for transaction in transactions {
        match transaction.kind.role() {
            TransactionRole::Inbound => totals.commission += transaction.amount,
            TransactionRole::Outbound => totals.withdrawal += transaction.amount,
            TransactionRole::Neutral => totals.neutral += transaction.amount,
        }
    }

    totals
}

/// Sum amounts by processing state.
pub fn totals_by_status(transactions: &[Transaction]) -> StatusTotals {
    let mut totals = StatusTotals::default();

    for transaction in transactions {
        match transaction.status {
            TransactionStatus::Completed => totals.completed += transaction.amount,
            TransactionStatus::Pending => totals.pending += transaction.amount,
            TransactionStatus::Unknown => totals.unknown += transaction.amount,
        }
    }

    totals
}

/// Compute the headline figures of the commissions page.
///
/// The available balance is completed commissions minus both completed and
/// pending withdrawals, so money that was already requested cannot be
/// requested twice.
pub fn commission_summary(transactions: &[Transaction], today: Date) -> CommissionSummary {
    let mut summary = CommissionSummary {
        this_month: this_month_commission_total(transactions, today),
        active_referrals: active_referrals_count(transactions),
        ..Default::default()
    };

    for transaction in transactions {
        match (transaction.kind, transaction.status) {
            (TransactionKind::Commission, TransactionStatus::Completed) => {
                summary.total_earned += transaction.amount
            }
            (TransactionKind::Commission, TransactionStatus::Pending) => {
                summary.pending += transaction.amount
            }
            (TransactionKind::Withdrawal, TransactionStatus::Completed) => {
                summary.withdrawn += transaction.amount
            }
            (TransactionKind::Withdrawal, TransactionStatus::Pending) => {
                summary.requested += transaction.amount
            }
            _ => {}
        }
    }

    summary.available_balance = summary.total_earned - summary.withdrawn - summary.requested;

    summary
}

/// Completed commission per calendar month, in chronological order.
///
/// Commissions without a creation time are skipped.
pub fn commission_by_month(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<Date, f64> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| is_completed_commission(t)) {
        let Some(month) = transaction
            .created_on()
            .and_then(|date| date.replace_day(1).ok())
        else {
            continue;
        };

        *totals.entry(month).or_insert(0.0) += transaction.amount;
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthlyTotal {
            month,
            label: month_abbrev(month.month()).to_owned(),
            total,
        })
        .collect()
}

/// Completed commission per campaign, largest total first.
///
/// Campaigns with equal totals are ordered by name. Commissions without a
/// campaign, or with a campaign missing from `lookup`, are reported under
/// their ID with [UNASSIGNED_CAMPAIGN_LABEL] as the name when no name is
/// known.
pub fn commission_by_campaign(
    transactions: &[Transaction],
    lookup: &CampaignLookup,
) -> Vec<CampaignTotal> {
    let mut totals: HashMap<Option<&CampaignId>, (f64, usize)> = HashMap::new();

    for transaction in transactions.iter().filter(|t| is_completed_commission(t)) {
        let entry = totals
            .entry(transaction.campaign_id.as_ref())
            .or_insert((0.0, 0));
        entry.0 += transaction.amount;
        entry.1 += 1;
    }

    let mut grouped: Vec<CampaignTotal> = totals
        .into_iter()
        .map(|(campaign_id, (total, count))| {
            let name = campaign_id
                .and_then(|id| lookup.name(id))
                .filter(|name| !name.is_empty())
                .unwrap_or(UNASSIGNED_CAMPAIGN_LABEL)
                .to_owned();

            CampaignTotal {
                campaign_id: campaign_id.cloned(),
                name,
                total,
                count,
            }
        })
        .collect();

    grouped.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.campaign_id.cmp(&b.campaign_id))
    });

    grouped
}
