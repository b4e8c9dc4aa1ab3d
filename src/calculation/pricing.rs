//! Per-row cost computation.
//!
//! This module provides [`compute_cost`], the pure cost formula, and
//! [`price_incident`] / [`price_all`], which resolve an incident's rates in
//! the master data before applying it.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use crate::config::PricingSettings;
use crate::error::{EngineError, EngineResult};
use crate::master_data::MasterData;
use crate::models::{EmployeeRates, Incident, IncidentCost, PricedIncident};

/// Rounds a money amount to cents, halves away from zero.
///
/// ```
/// use incident_engine::calculation::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(10665, 3)), Decimal::new(1067, 2));
/// assert_eq!(round_money(Decimal::new(-10665, 3)), Decimal::new(-1067, 2));
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the cost of one incident.
///
/// - base = hours × (price override or hourly rate)
/// - night = night hours × night premium, only for night-shift rows
/// - transfers = transfers × transfer unit cost
/// - simple = base + night + transfers
/// - surcharge = simple × (1 + social security rate)
///
/// The result depends only on the arguments. Values are not rounded.
///
/// # Errors
///
/// Returns `NightRateNotFound` when the row is a night shift and `rates`
/// carries no night premium, and `AmountOverflow` when an amount leaves
/// the decimal range.
///
/// # Examples
///
/// ```
/// use incident_engine::calculation::compute_cost;
/// use incident_engine::models::{EmployeeRates, Incident};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut row = Incident::new("ANA", NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
/// row.hours = Decimal::from(8);
/// row.transfers = Decimal::from(1);
/// let rates = EmployeeRates::new(Decimal::from(10), Decimal::from(2));
///
/// let cost = compute_cost(&row, &rates, Decimal::new(3, 1))?;
/// assert_eq!(cost.simple_cost, Decimal::from(82));
/// assert_eq!(cost.surcharge_cost, Decimal::new(1066, 1));
/// # Ok::<(), incident_engine::error::EngineError>(())
/// ```
pub fn compute_cost(
    incident: &Incident,
    rates: &EmployeeRates,
    social_security_rate: Decimal,
) -> EngineResult<IncidentCost> {
    let hourly_price = incident.price_override.unwrap_or(rates.hourly_rate);
    let base = product("base", incident.hours, hourly_price)?;

    let night = if incident.night_shift {
        let premium = rates
            .night_premium
            .ok_or_else(|| EngineError::NightRateNotFound {
                employee: incident.employee.clone(),
                category: String::new(),
                agreement: String::new(),
            })?;
        product("night", incident.night_hours, premium)?
    } else {
        Decimal::ZERO
    };

    let transfers = product("transfers", incident.transfers, rates.transfer_unit_cost)?;
    let simple_cost = base
        .checked_add(night)
        .and_then(|sum| sum.checked_add(transfers))
        .ok_or_else(|| EngineError::amount_overflow("simple_cost"))?;
    let surcharge_cost = Decimal::ONE
        .checked_add(social_security_rate)
        .and_then(|factor| simple_cost.checked_mul(factor))
        .ok_or_else(|| EngineError::amount_overflow("surcharge_cost"))?;

    Ok(IncidentCost {
        base,
        night,
        transfers,
        simple_cost,
        surcharge_cost,
    })
}

fn product(field: &str, quantity: Decimal, price: Decimal) -> EngineResult<Decimal> {
    quantity
        .checked_mul(price)
        .ok_or_else(|| EngineError::amount_overflow(field))
}

/// Prices one incident against the master data.
///
/// The night premium is the employee's own premium, else the night-rate
/// entry of their (category, agreement).
///
/// # Errors
///
/// - `EmployeeNotFound` when the employee has no master record
/// - `NightRateNotFound` when a night-shift row has no resolvable premium
pub fn price_incident(
    incident: &Incident,
    master: &MasterData,
    pricing: &PricingSettings,
) -> EngineResult<PricedIncident> {
    let record = master.employee(&incident.employee)?;

    let mut rates = record.rates.clone();
    rates.night_premium = master.night_premium_for(record);
    if incident.night_shift && rates.night_premium.is_none() {
        return Err(EngineError::NightRateNotFound {
            employee: record.name.clone(),
            category: record.category.clone(),
            agreement: record.agreement.clone(),
        });
    }

    let cost = compute_cost(incident, &rates, pricing.social_security_rate)?;

    Ok(PricedIncident {
        incident: incident.clone(),
        hourly_price: incident.price_override.unwrap_or(rates.hourly_rate),
        night_price: rates.night_premium.filter(|_| incident.night_shift),
        account: master.account_for(&incident.reason),
        rates,
        cost,
    })
}

/// Prices every row, keeping one result per row in input order.
///
/// Failures are returned, not skipped, so the caller decides whether an
/// unpriced row blocks an export.
pub fn price_all(
    incidents: &[Incident],
    master: &MasterData,
    pricing: &PricingSettings,
) -> Vec<EngineResult<PricedIncident>> {
    incidents
        .iter()
        .map(|incident| price_incident(incident, master, pricing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountCode, EmployeeRecord};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(employee: &str, hours: &str) -> Incident {
        let mut incident = Incident::new(employee, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        incident.hours = dec(hours);
        incident
    }

    fn pricing(rate: &str) -> PricingSettings {
        PricingSettings {
            social_security_rate: dec(rate),
        }
    }

    fn master() -> MasterData {
        let mut ana = EmployeeRecord::new("ana", EmployeeRates::new(dec("10"), dec("2")));
        ana.category = "h ASL".to_string();
        ana.agreement = "99100165012016".to_string();
        let mut luis = EmployeeRecord::new("luis", EmployeeRates::new(dec("12"), dec("12")));
        luis.category = "Camarero".to_string();
        luis.agreement = "123".to_string();
        let eva = EmployeeRecord::new(
            "eva",
            EmployeeRates::new(dec("9"), dec("1")).with_night_premium(dec("3")),
        );
        MasterData::new(vec![ana, luis, eva], vec![])
            .with_night_rate("ASL", "99100165012016", dec("1.5"))
            .with_account("Festivo", AccountCode::Holidays)
    }

    #[test]
    fn test_simple_and_surcharge_cost() {
        let mut incident = row("ANA", "8");
        incident.transfers = dec("1");
        let rates = EmployeeRates::new(dec("10"), dec("2"));

        let cost = compute_cost(&incident, &rates, dec("0.3")).unwrap();

        assert_eq!(cost.base, dec("80"));
        assert_eq!(cost.transfers, dec("2"));
        assert_eq!(cost.simple_cost, dec("82"));
        assert_eq!(cost.surcharge_cost, dec("106.6"));
    }

    #[test]
    fn test_price_override_replaces_hourly_rate() {
        let mut incident = row("ANA", "4");
        incident.price_override = Some(dec("15"));
        let rates = EmployeeRates::new(dec("10"), dec("2"));

        let cost = compute_cost(&incident, &rates, Decimal::ZERO).unwrap();

        assert_eq!(cost.base, dec("60"));
        assert_eq!(cost.surcharge_cost, dec("60"));
    }

    #[test]
    fn test_night_hours_ignored_without_flag() {
        let mut incident = row("ANA", "8");
        incident.night_hours = dec("2");
        let rates = EmployeeRates::new(dec("10"), dec("2")).with_night_premium(dec("1.5"));

        let cost = compute_cost(&incident, &rates, dec("0.3")).unwrap();

        assert_eq!(cost.night, Decimal::ZERO);
        assert_eq!(cost.simple_cost, dec("80"));
    }

    fn overflow_field(result: EngineResult<IncidentCost>) -> String {
        match result {
            Err(EngineError::AmountOverflow { field }) => field,
            other => panic!("Expected AmountOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_hours_overflow_is_an_error() {
        let mut incident = row("ANA", "0");
        incident.hours = Decimal::MAX;
        assert!(incident.validate().is_ok());
        let rates = EmployeeRates::new(dec("10"), dec("2"));

        let result = compute_cost(&incident, &rates, dec("0.3195"));

        assert_eq!(overflow_field(result), "base");
    }

    #[test]
    fn test_surcharge_overflow_is_an_error() {
        let mut incident = row("ANA", "0");
        incident.hours = Decimal::MAX;
        let rates = EmployeeRates::new(Decimal::ONE, Decimal::ZERO);

        let result = compute_cost(&incident, &rates, dec("0.5"));

        assert_eq!(overflow_field(result), "surcharge_cost");
    }

    #[test]
    fn test_overflowing_sum_is_an_error() {
        let mut incident = row("ANA", "0");
        incident.hours = Decimal::MAX;
        incident.transfers = Decimal::MAX;
        let rates = EmployeeRates::new(Decimal::ONE, Decimal::ONE);

        let result = compute_cost(&incident, &rates, Decimal::ZERO);

        assert_eq!(overflow_field(result), "simple_cost");
    }

    #[test]
    fn test_price_all_reports_overflow_per_row() {
        let mut huge = row("ana", "0");
        huge.hours = Decimal::MAX;
        let rows = vec![huge, row("ana", "1")];

        let results = price_all(&rows, &master(), &pricing("0.3"));

        assert!(matches!(results[0], Err(EngineError::AmountOverflow { .. })));
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_night_shift_uses_premium() {
        let mut incident = row("ANA", "8");
        incident.night_shift = true;
        incident.night_hours = dec("2");
        let rates = EmployeeRates::new(dec("10"), dec("2")).with_night_premium(dec("1.5"));

        let cost = compute_cost(&incident, &rates, Decimal::ZERO).unwrap();

        assert_eq!(cost.night, dec("3"));
        assert_eq!(cost.simple_cost, dec("83"));
    }

    #[test]
    fn test_night_shift_without_premium_fails() {
        let mut incident = row("ANA", "8");
        incident.night_shift = true;
        let rates = EmployeeRates::new(dec("10"), dec("2"));

        let result = compute_cost(&incident, &rates, Decimal::ZERO);

        assert!(matches!(result, Err(EngineError::NightRateNotFound { .. })));
    }

    #[test]
    fn test_compute_cost_is_pure() {
        let mut incident = row("ANA", "7.5");
        incident.transfers = dec("3");
        let rates = EmployeeRates::new(dec("10.35"), dec("0.9"));

        let first = compute_cost(&incident, &rates, dec("0.3195")).unwrap();
        let second = compute_cost(&incident, &rates, dec("0.3195")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_price_incident_resolves_table_night_rate() {
        let mut incident = row("ana", "8");
        incident.night_shift = true;
        incident.night_hours = dec("4");
        incident.reason = "Festivo".to_string();

        let priced = price_incident(&incident, &master(), &pricing("0.3")).unwrap();

        assert_eq!(priced.night_price, Some(dec("1.5")));
        assert_eq!(priced.cost.night, dec("6"));
        assert_eq!(priced.hourly_price, dec("10"));
        assert_eq!(priced.account, AccountCode::Holidays);
    }

    #[test]
    fn test_own_night_premium_is_preferred() {
        let mut incident = row("eva", "1");
        incident.night_shift = true;
        incident.night_hours = dec("1");

        let priced = price_incident(&incident, &master(), &pricing("0")).unwrap();

        assert_eq!(priced.cost.night, dec("3"));
    }

    #[test]
    fn test_unknown_employee_is_lookup_error_not_zero_cost() {
        let result = price_incident(&row("pedro", "8"), &master(), &pricing("0.3"));

        match result {
            Err(error) => {
                assert_eq!(error.kind(), crate::error::ErrorKind::Lookup);
                assert!(matches!(error, EngineError::EmployeeNotFound { .. }));
            }
            Ok(priced) => panic!("Expected lookup error, got {:?}", priced),
        }
    }

    #[test]
    fn test_missing_night_rate_names_category_and_agreement() {
        let mut incident = row("luis", "8");
        incident.night_shift = true;

        match price_incident(&incident, &master(), &pricing("0.3")) {
            Err(EngineError::NightRateNotFound { employee, category, agreement }) => {
                assert_eq!(employee, "LUIS");
                assert_eq!(category, "Camarero");
                assert_eq!(agreement, "123");
            }
            other => panic!("Expected NightRateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_day_row_without_night_rate_prices_fine() {
        let priced = price_incident(&row("luis", "2"), &master(), &pricing("0")).unwrap();
        assert_eq!(priced.night_price, None);
        assert_eq!(priced.cost.simple_cost, dec("24"));
    }

    #[test]
    fn test_price_all_keeps_one_result_per_row() {
        let rows = vec![row("ana", "1"), row("pedro", "1"), row("luis", "1")];

        let results = price_all(&rows, &master(), &pricing("0"));

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().incident.employee, "luis");
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec("106.6")), dec("106.60"));
        assert_eq!(round_money(dec("0.005")), dec("0.01"));
        assert_eq!(round_money(dec("2.344")), dec("2.34"));
    }
}
