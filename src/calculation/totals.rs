//! Session totals.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{PricedIncident, SessionTotals};

/// Sums the priced rows of a session. Failed rows are counted in
/// `unpriced_rows` and contribute nothing to the sums.
///
/// # Errors
///
/// Returns `AmountOverflow` naming the total that left the decimal range.
pub fn session_totals(results: &[EngineResult<PricedIncident>]) -> EngineResult<SessionTotals> {
    let mut totals = SessionTotals::default();
    for result in results {
        match result {
            Ok(priced) => {
                let cost = &priced.cost;
                totals.priced_rows += 1;
                totals.total_base = add("total_base", totals.total_base, cost.base)?;
                totals.total_night = add("total_night", totals.total_night, cost.night)?;
                totals.total_transfers =
                    add("total_transfers", totals.total_transfers, cost.transfers)?;
                totals.total_simple = add("total_simple", totals.total_simple, cost.simple_cost)?;
                totals.total_surcharge =
                    add("total_surcharge", totals.total_surcharge, cost.surcharge_cost)?;
            }
            Err(_) => totals.unpriced_rows += 1,
        }
    }
    Ok(totals)
}

fn add(field: &str, total: Decimal, amount: Decimal) -> EngineResult<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| EngineError::amount_overflow(field))
}
