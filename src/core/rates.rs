use super::money::{number, Currency};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateError {
    #[error("no rates recorded for {0}")]
    NoRatesForPair(CurrencyPair),
    #[error("no rate observations bracket {date} for {pair}")]
    NoBracketFound { pair: CurrencyPair, date: NaiveDate },
}

/// Exchange-rate series the rate table can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyPair {
    #[serde(rename = "EUR_TO_NOK")]
    EurToNok,
}

impl CurrencyPair {
    pub const ALL: [CurrencyPair; 1] = [CurrencyPair::EurToNok];

    pub fn from(self) -> Currency {
        match self {
            CurrencyPair::EurToNok => Currency::Eur,
        }
    }

    pub fn to(self) -> Currency {
        match self {
            CurrencyPair::EurToNok => Currency::Nok,
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_TO_{}", self.from(), self.to())
    }
}

impl FromStr for CurrencyPair {
    type Err = String;

    /// Accepts `EUR_TO_NOK` as well as `EUR/NOK`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('/', "_TO_");
        CurrencyPair::ALL
            .into_iter()
            .find(|p| p.to_string() == normalized)
            .ok_or_else(|| format!("unknown currency pair: {s}"))
    }
}

/// Rate of `pair` observed on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateObservation {
    pub pair: CurrencyPair,
    pub date: NaiveDate,
    pub rate: Decimal,
}

impl RateObservation {
    pub fn new(pair: CurrencyPair, rate: Decimal, date: NaiveDate) -> Self {
        RateObservation { pair, date, rate }
    }
}

/// Observed rates per currency pair, kept in the order they were added.
#[derive(Debug, Default)]
pub struct RateTable {
    rates: HashMap<CurrencyPair, Vec<RateObservation>>,
}

impl RateTable {
    /// Load observations from CSV with a `pair,date,rate` header.
    pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<RateTable> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut table = RateTable::default();
        for record in rdr.deserialize::<RateObservation>() {
            table.add(record?);
        }
        Ok(table)
    }

    pub fn add(&mut self, observation: RateObservation) {
        self.rates
            .entry(observation.pair)
            .or_default()
            .push(observation);
    }

    pub fn observations(&self, pair: CurrencyPair) -> &[RateObservation] {
        self.rates.get(&pair).map(Vec::as_slice).unwrap_or_default()
    }

    /// Rate for `pair` on `date`.
    ///
    /// An exact observation is returned as stored. Dates outside the observed
    /// range take the nearest end's rate. Dates between two observations get the
    /// plain mean of the neighbouring rates, regardless of how far apart their
    /// dates are. Observations are assumed to be in ascending date order.
    pub fn resolve(&self, pair: CurrencyPair, date: NaiveDate) -> Result<RateObservation, RateError> {
        let rates = self.observations(pair);
        let (Some(first), Some(last)) = (rates.first(), rates.last()) else {
            return Err(RateError::NoRatesForPair(pair));
        };

        if let Some(exact) = rates.iter().find(|r| r.date == date) {
            log::debug!("{} {}: exact observation {}", pair, date, exact.rate);
            return Ok(exact.clone());
        }

        if rates.len() == 1 {
            log::debug!("{} {}: single observation {}", pair, date, first.rate);
            return Ok(RateObservation::new(pair, number(first.rate), date));
        }
        if date <= first.date {
            log::debug!("{} {}: before first observation {}", pair, date, first.date);
            return Ok(RateObservation::new(pair, number(first.rate), date));
        }
        if last.date <= date {
            log::debug!("{} {}: after last observation {}", pair, date, last.date);
            return Ok(RateObservation::new(pair, number(last.rate), date));
        }

        for window in rates.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if a.date <= date && date <= b.date {
                let rate = if a.date == date {
                    a.rate
                } else if b.date == date {
                    b.rate
                } else {
                    (a.rate + b.rate) / Decimal::TWO
                };
                log::debug!("{} {}: between {} and {} -> {}", pair, date, a.date, b.date, rate);
                return Ok(RateObservation::new(pair, number(rate), date));
            }
        }

        Err(RateError::NoBracketFound { pair, date })
    }
}
