//! Affiliate transactions: the ledger model, filtering and aggregation.
//!
//! All functions here are pure. They borrow the transaction list the caller
//! fetched and return new values, so they can be called on every re-render.

mod aggregation;
mod display;
mod filter;
mod models;
mod window;

pub use aggregation::{
    CampaignTotal, CommissionSummary, KindTotals, MonthlyTotal, StatusTotals,
    UNASSIGNED_CAMPAIGN_LABEL, active_referrals_count, commission_by_campaign,
    commission_by_month, commission_summary, this_month_commission_total, totals_by_kind,
    totals_by_status,
};
pub use display::{SignedAmount, describe, signed_amount};
pub use filter::{TransactionFilter, TypeFilter, filter_by_campaign, filter_transactions};
pub use models::{
    CustomerName, Transaction, TransactionBuilder, TransactionKind, TransactionRole,
    TransactionStatus,
};
pub use window::{WindowPreset, WindowRange, compute_window_range, month_abbrev};
