//! Tabla mínima de elementos (H..Xe).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

const SYMBOLS: [&str; 54] = ["H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
                             "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga",
                             "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd",
                             "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe"];

/// Elemento químico identificado por número atómico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Element(u8);

impl Element {
    pub fn from_symbol(symbol: &str) -> Result<Self, DomainError> {
        SYMBOLS.iter()
               .position(|s| *s == symbol)
               .map(|i| Element(i as u8 + 1))
               .ok_or_else(|| DomainError::UnknownElement(symbol.to_string()))
    }

    pub fn atomic_number(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS[(self.0 - 1) as usize]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<String> for Element {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Element::from_symbol(&value)
    }
}

impl From<Element> for String {
    fn from(e: Element) -> Self {
        e.symbol().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_roundtrip_through_atomic_number() {
        let c = Element::from_symbol("C").unwrap();
        assert_eq!(c.atomic_number(), 6);
        assert_eq!(Element::from_symbol("O").unwrap().atomic_number(), 8);
        assert_eq!(Element::from_symbol("Xe").unwrap().symbol(), "Xe");
        assert!(Element::from_symbol("Cx").is_err());
    }
}
