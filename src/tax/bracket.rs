use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Income band taxed at a flat rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub lower: Decimal,
    /// `None` for the open-ended top band
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

/// Progressive income tax made of ascending brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    pub fn new(brackets: Vec<Bracket>) -> Self {
        BracketTable { brackets }
    }

    /// Norwegian step tax (trinnskatt) for 2018, in NOK.
    pub fn norwegian_step_tax_2018() -> Self {
        BracketTable::new(vec![
            Bracket {
                lower: dec!(169000),
                upper: Some(dec!(237900)),
                rate: dec!(0.014),
            },
            Bracket {
                lower: dec!(237900),
                upper: Some(dec!(598050)),
                rate: dec!(0.033),
            },
            Bracket {
                lower: dec!(598050),
                upper: Some(dec!(962050)),
                rate: dec!(0.124),
            },
            Bracket {
                lower: dec!(962050),
                upper: None,
                rate: dec!(0.154),
            },
        ])
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Tax owed on `income`: each bracket taxes the part of the income inside it.
    pub fn tax(&self, income: Decimal) -> Decimal {
        let mut sum = Decimal::ZERO;
        for bracket in &self.brackets {
            if income < bracket.lower {
                break;
            }
            let taxed = match bracket.upper {
                Some(upper) if income > upper => upper - bracket.lower,
                _ => income - bracket.lower,
            };
            sum += taxed * bracket.rate;
        }
        sum
    }
}
