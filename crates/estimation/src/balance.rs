//! Balance gate — decides whether a requested budget fits the owner's
//! available balance. Consulted only when finalizing; an insufficient
//! balance never blocks saving a draft.

use studio_core::types::BalanceCheck;

/// Compares the requested budget against the available balance. Defined for
/// any balance, including negative ones.
pub fn evaluate(requested_budget: f64, available_balance: f64) -> BalanceCheck {
    BalanceCheck {
        available_balance,
        requested_budget,
        sufficient: requested_budget <= available_balance,
    }
}
