use serde::Serialize;
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FinanceTerm {
    OneYear,
    TwoYear,
    ThreeYear,
}

impl FinanceTerm {
    pub const ALL: [FinanceTerm; 3] = [
        FinanceTerm::OneYear,
        FinanceTerm::TwoYear,
        FinanceTerm::ThreeYear,
    ];

    /// The selector value a form or command line uses for this term.
    pub fn key(&self) -> &'static str {
        match self {
            FinanceTerm::OneYear => "oneYear",
            FinanceTerm::TwoYear => "twoYear",
            FinanceTerm::ThreeYear => "threeYear",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FinanceTerm::OneYear => "One Year",
            FinanceTerm::TwoYear => "Two Year",
            FinanceTerm::ThreeYear => "Three Year",
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            FinanceTerm::OneYear => 12,
            FinanceTerm::TwoYear => 24,
            FinanceTerm::ThreeYear => 36,
        }
    }
}

impl fmt::Display for FinanceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} months)", self.label(), self.months())
    }
}

#[derive(Debug, PartialEq)]
pub struct UnknownTerm(pub String);

impl FromStr for FinanceTerm {
    type Err = UnknownTerm;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        FinanceTerm::ALL
            .into_iter()
            .find(|term| term.key() == key)
            .ok_or_else(|| UnknownTerm(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{FinanceTerm, UnknownTerm};
    use test_log::test;

    #[test]
    fn test_term_table() {
        assert_eq!(FinanceTerm::OneYear.months(), 12);
        assert_eq!(FinanceTerm::TwoYear.months(), 24);
        assert_eq!(FinanceTerm::ThreeYear.months(), 36);
        assert_eq!(FinanceTerm::TwoYear.label(), "Two Year");
        assert_eq!(FinanceTerm::ThreeYear.to_string(), "Three Year (36 months)");
    }

    #[test]
    fn test_parse_term_key() {
        assert_eq!("oneYear".parse::<FinanceTerm>(), Ok(FinanceTerm::OneYear));
        assert_eq!("twoYear".parse::<FinanceTerm>(), Ok(FinanceTerm::TwoYear));
        assert_eq!("threeYear".parse::<FinanceTerm>(), Ok(FinanceTerm::ThreeYear));

        // keys are matched exactly
        assert_eq!(
            "TwoYear".parse::<FinanceTerm>(),
            Err(UnknownTerm("TwoYear".to_string()))
        );
        assert!("".parse::<FinanceTerm>().is_err());
        assert!("Two Year".parse::<FinanceTerm>().is_err());
    }
}
