use crate::{config::QuoteConfig, term::FinanceTerm, validation::ScheduleInput};
use chrono::{Datelike, Months, NaiveDate, Weekday};
use log::{debug, trace};
use serde::Serialize;
use std::fmt;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: f64,
}

impl Payment {
    pub fn new(number: u32, due_date: NaiveDate, amount: f64) -> Self {
        Self {
            number,
            due_date,
            amount,
        }
    }

    /// The amount as shown to the customer: truncated to whole currency units.
    pub fn whole_amount(&self) -> f64 {
        self.amount.trunc()
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}  £{:.2}",
            self.due_date.day(),
            ordinal_suffix(self.due_date.day()),
            self.due_date.format("%b %Y"),
            self.whole_amount()
        )
    }
}

/// Equal monthly installments over a fixed term, with the arrangement fee on
/// the first payment and the completion fee on the last.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub term: FinanceTerm,
    pub principal: f64,
    monthly_payment: f64,
    arrangement_fee: f64,
    completion_fee: f64,
    payments: Vec<Payment>,
}

impl Schedule {
    /// Builds the schedule for a request that already passed validation.
    ///
    /// Panics if the term has no months or the dates fall outside the
    /// representable calendar; both are caller bugs, not user errors.
    pub fn new(config: &QuoteConfig, input: &ScheduleInput) -> Self {
        let months = input.term.months();
        let principal = input.vehicle_price - input.deposit_amount;
        let monthly_payment = get_monthly_payment(principal, months);
        debug!(
            "principal {}, {} months, monthly payment {}",
            principal, months, monthly_payment
        );

        let mut payments = add_scheduled_pmts(&input.delivery_date, months, monthly_payment);
        apply_fees(&mut payments, config.arrangement_fee, config.completion_fee);

        Self {
            term: input.term,
            principal,
            monthly_payment,
            arrangement_fee: config.arrangement_fee,
            completion_fee: config.completion_fee,
            payments,
        }
    }

    /// The flat installment before fees. This is also the affordability
    /// ceiling for the inventory lookup.
    pub fn monthly_payment(&self) -> f64 {
        self.monthly_payment
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn get_pmt_count(&self) -> usize {
        self.payments.len()
    }

    /// Standard installment plus the arrangement fee.
    pub fn first_payment(&self) -> f64 {
        self.monthly_payment + self.arrangement_fee
    }

    /// Standard installment plus the completion fee.
    pub fn final_payment(&self) -> f64 {
        self.monthly_payment + self.completion_fee
    }

    pub fn total_payable(&self) -> f64 {
        self.payments.iter().map(|pmt| pmt.amount).sum()
    }

    pub fn get_pmt_info(&self, pmt_number: usize) -> String {
        match pmt_number.checked_sub(1).and_then(|i| self.payments.get(i)) {
            Some(pmt) => pmt.to_string(),
            None => "No payment information.".to_string(),
        }
    }

    pub fn show_schedule(&self) {
        for pmt in &self.payments {
            println!("{}", pmt);
        }
    }
}

fn get_monthly_payment(principal: f64, months: u32) -> f64 {
    principal / months as f64
}

// one payment per calendar month, starting the month after delivery
fn add_scheduled_pmts(&delivery_date: &NaiveDate, months: u32, pmt_amount: f64) -> Vec<Payment> {
    assert!(months > 0, "a schedule needs at least one month");

    let start_date = add_months(&delivery_date, 1);
    let end_date = add_months(&start_date, months);
    let mut sched_pmt: Vec<Payment> = Vec::with_capacity(months as usize);

    // each cursor is measured from the start so month-end clamping never drifts
    let mut offset = 0;
    let mut cursor = start_date;
    while cursor < end_date {
        let due_date = first_monday(cursor.year(), cursor.month());
        trace!(
            "pmt # {}, month {}, due {}",
            offset + 1,
            cursor.format("%m-%Y"),
            due_date
        );
        sched_pmt.push(Payment::new(offset + 1, due_date, pmt_amount));

        offset += 1;
        cursor = add_months(&start_date, offset);
    }
    sched_pmt
}

// a single-entry schedule carries both fees
fn apply_fees(payments: &mut [Payment], arrangement_fee: f64, completion_fee: f64) {
    if let Some(first) = payments.first_mut() {
        first.amount += arrangement_fee;
    }
    if let Some(last) = payments.last_mut() {
        last.amount += completion_fee;
    }
}

/// The first Monday of the given calendar month.
pub fn first_monday(year: i32, month: u32) -> NaiveDate {
    match NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, 1) {
        Some(date) => date,
        None => panic!("{}-{} has no first Monday", year, month),
    }
}

fn add_months(&date: &NaiveDate, months: u32) -> NaiveDate {
    match date.checked_add_months(Months::new(months)) {
        Some(date) => date,
        None => panic!("{} plus {} months is out of range", date, months),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
