use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits every stored amount, price and rate carries.
pub const SCALE: u32 = 5;

/// Round half-up to [`SCALE`] digits and pad to exactly that scale.
///
/// Lot exhaustion and balance checks compare values for equality, so every
/// arithmetic result has to pass through here before it is stored.
pub fn number(value: Decimal) -> Decimal {
    let mut n = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    n.rescale(SCALE);
    n
}

pub(crate) fn deserialize_scaled<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer).map(number)
}

/// Currencies the ledger knows about.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Nok,
    Ripple,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Eur, Currency::Nok, Currency::Ripple];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Nok => "NOK",
            Currency::Ripple => "RIPPLE",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Currency::Eur => "Euro",
            Currency::Nok => "Norske kroner",
            Currency::Ripple => "Ripple",
        }
    }

    pub fn is_crypto(self) -> bool {
        matches!(self, Currency::Ripple)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown currency: {s}"))
    }
}

/// An amount of a single currency, always held at [`SCALE`] digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Amount {
    #[serde(deserialize_with = "deserialize_scaled")]
    #[schemars(with = "f64")]
    amount: Decimal,
    currency: Currency,
}

impl Amount {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Amount {
            amount: number(amount),
            currency,
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Amount::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// New amount in the same currency, shifted by `delta`.
    pub fn plus(&self, delta: Decimal) -> Self {
        Amount::new(self.amount + delta, self.currency)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn number_rounds_half_up_to_fixed_scale() {
        assert_eq!(number(dec!(1.234565)).to_string(), "1.23457");
        assert_eq!(number(dec!(-1.234565)).to_string(), "-1.23457");
        assert_eq!(number(dec!(1.234564)).to_string(), "1.23456");
    }

    #[test]
    fn number_pads_short_values() {
        assert_eq!(number(dec!(1000)).to_string(), "1000.00000");
        assert_eq!(number(dec!(0.5)).scale(), SCALE);
    }

    #[test]
    fn amount_is_normalized_on_construction() {
        let amount = Amount::new(dec!(66.5600001), Currency::Ripple);
        assert_eq!(amount.amount().to_string(), "66.56000");
        assert_eq!(amount.currency(), Currency::Ripple);
    }

    #[test]
    fn plus_keeps_currency_and_scale() {
        let amount = Amount::new(dec!(100), Currency::Eur).plus(dec!(-0.000004));
        assert_eq!(amount.amount().to_string(), "100.00000");
        assert_eq!(amount.currency(), Currency::Eur);
    }

    #[test]
    fn only_ripple_is_crypto() {
        assert!(Currency::Ripple.is_crypto());
        assert!(!Currency::Eur.is_crypto());
        assert!(!Currency::Nok.is_crypto());
    }

    #[test]
    fn currency_parses_case_insensitively() {
        assert_eq!("ripple".parse::<Currency>(), Ok(Currency::Ripple));
        assert_eq!("EUR".parse::<Currency>(), Ok(Currency::Eur));
        assert!("BTC".parse::<Currency>().is_err());
    }

    #[test]
    fn deserialized_amount_is_normalized() {
        let amount: Amount =
            serde_json::from_str(r#"{"amount": "319.4881234", "currency": "EUR"}"#).unwrap();
        assert_eq!(amount.amount().to_string(), "319.48812");
        assert_eq!(amount.currency(), Currency::Eur);
    }
}
