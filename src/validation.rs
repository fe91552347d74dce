use crate::{config::QuoteConfig, term::FinanceTerm};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

/// Day-month-year, the only textual form delivery dates are accepted in.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// The quote form fields, in the order their errors are reported.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    VehiclePrice,
    DepositAmount,
    DeliveryDate,
    FinanceOption,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::VehiclePrice => "vehiclePrice",
            Field::DepositAmount => "depositAmount",
            Field::DeliveryDate => "deliveryDate",
            Field::FinanceOption => "financeOption",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A quote request exactly as it was typed in.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawQuote<'a> {
    pub vehicle_price: &'a str,
    pub deposit_amount: &'a str,
    pub delivery_date: &'a str,
    pub finance_option: &'a str,
}

/// A quote request that passed validation, with every value in its final type.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub vehicle_price: f64,
    pub deposit_amount: f64,
    pub delivery_date: NaiveDate,
    pub term: FinanceTerm,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ValidationResult {
    pub status: bool,
    pub errors: BTreeMap<Field, Vec<String>>,
    #[serde(skip)]
    input: Option<ScheduleInput>,
}

impl ValidationResult {
    /// The typed request, present only when `status` is true.
    pub fn input(&self) -> Option<&ScheduleInput> {
        self.input.as_ref()
    }

    pub fn field_errors(&self, field: Field) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every message in field order.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.errors.values().flatten().map(String::as_str)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in self.messages() {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}

/// Checks all four inputs and collects every violated rule.
///
/// No check short-circuits another: a single request can fail on several
/// fields and carry more than one message for the same field.
pub fn validate(config: &QuoteConfig, raw: &RawQuote) -> ValidationResult {
    let mut errors: BTreeMap<Field, Vec<String>> = BTreeMap::new();

    let price = parse_amount(raw.vehicle_price);
    let deposit = parse_amount(raw.deposit_amount);

    let price_errors = vehicle_price_errors(price);
    let deposit_errors = deposit_amount_errors(config, price, deposit);
    let (delivery_date, date_errors) = delivery_date_errors(raw.delivery_date);
    let (term, term_errors) = finance_option_errors(raw.finance_option);

    for (field, messages) in [
        (Field::VehiclePrice, price_errors),
        (Field::DepositAmount, deposit_errors),
        (Field::DeliveryDate, date_errors),
        (Field::FinanceOption, term_errors),
    ] {
        if !messages.is_empty() {
            errors.insert(field, messages);
        }
    }

    let status = errors.is_empty();
    let input = match (status, price, deposit, delivery_date, term) {
        (true, Some(vehicle_price), Some(deposit_amount), Some(delivery_date), Some(term)) => {
            Some(ScheduleInput {
                vehicle_price,
                deposit_amount,
                delivery_date,
                term,
            })
        }
        _ => None,
    };

    if status {
        debug!("quote request is valid: {:?}", input);
    } else {
        info!(
            "quote request rejected on {}",
            errors
                .keys()
                .map(Field::name)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    ValidationResult {
        status,
        errors,
        input,
    }
}

// a blank, non-numeric, infinite or NaN entry is not an amount
fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

fn vehicle_price_errors(price: Option<f64>) -> Vec<String> {
    match price {
        Some(price) if price > 0. => Vec::new(),
        _ => vec!["Please set a vehicle price".to_string()],
    }
}

fn deposit_amount_errors(config: &QuoteConfig, price: Option<f64>, deposit: Option<f64>) -> Vec<String> {
    let mut errors = Vec::new();

    if !matches!(deposit, Some(deposit) if deposit > 0.) {
        errors.push("Please set a deposit amount".to_string());
    }

    // the ratio is meaningless without a positive price, which the price rule already reports
    if let (Some(price), Some(deposit)) = (price, deposit) {
        if price > 0. {
            let percentage = deposit_percentage(price, deposit);
            if percentage < config.minimum_deposit_percent {
                errors.push(format!(
                    "Minimum deposit is {}%, your current deposit amount is {}%",
                    config.minimum_deposit_percent, percentage
                ));
            }
            if deposit >= price {
                errors.push("Your deposit must be less than the vehicle price".to_string());
            }
        }
    }

    errors
}

/// Deposit as a percentage of the price. `price` must be positive.
pub fn deposit_percentage(price: f64, deposit: f64) -> f64 {
    (deposit / price) * 100.
}

fn delivery_date_errors(raw: &str) -> (Option<NaiveDate>, Vec<String>) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (None, vec!["Please set a delivery date".to_string()]);
    }

    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => (Some(date), Vec::new()),
        Err(_) => (
            None,
            vec!["Your delivery date is not a valid date".to_string()],
        ),
    }
}

fn finance_option_errors(raw: &str) -> (Option<FinanceTerm>, Vec<String>) {
    match raw.parse::<FinanceTerm>() {
        Ok(term) => (Some(term), Vec::new()),
        Err(_) => (None, vec!["Please set a finance option".to_string()]),
    }
}
