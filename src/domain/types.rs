// ==========================================
// Wood QC Report - Domain value types
// ==========================================
// Responsibility: compounds tracked by the CCA analysis, per-compound
// containers and the date layouts understood by the normalizer
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Compound - active ingredient of the preservative
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compound {
    Chromium, // CrO3
    Copper,   // CuO
    Arsenic,  // As2O5
}

impl Compound {
    pub const ALL: [Compound; 3] = [Compound::Chromium, Compound::Copper, Compound::Arsenic];

    /// Portuguese name printed next to the oxide formula.
    pub fn display_name(&self) -> &'static str {
        match self {
            Compound::Chromium => "Cromo",
            Compound::Copper => "Cobre",
            Compound::Arsenic => "Arsênio",
        }
    }

    /// Oxide formula split into main-size and subscript segments.
    pub fn oxide_formula(&self) -> &'static [FormulaPart] {
        match self {
            Compound::Chromium => &[FormulaPart::Base("CrO"), FormulaPart::Sub("3")],
            Compound::Copper => &[FormulaPart::Base("CuO")],
            Compound::Arsenic => &[
                FormulaPart::Base("As"),
                FormulaPart::Sub("2"),
                FormulaPart::Base("O"),
                FormulaPart::Sub("5"),
            ],
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compound::Chromium => write!(f, "chromium"),
            Compound::Copper => write!(f, "copper"),
            Compound::Arsenic => write!(f, "arsenic"),
        }
    }
}

/// One typographic segment of a chemical formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaPart {
    Base(&'static str),
    Sub(&'static str),
}

// ==========================================
// CompoundSet - one value per tracked compound
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundSet<T> {
    pub chromium: T,
    pub copper: T,
    pub arsenic: T,
}

impl<T: Copy> CompoundSet<T> {
    pub fn new(chromium: T, copper: T, arsenic: T) -> Self {
        Self {
            chromium,
            copper,
            arsenic,
        }
    }

    pub fn get(&self, compound: Compound) -> T {
        match compound {
            Compound::Chromium => self.chromium,
            Compound::Copper => self.copper,
            Compound::Arsenic => self.arsenic,
        }
    }

    pub fn map<U: Copy>(&self, mut f: impl FnMut(Compound, T) -> U) -> CompoundSet<U> {
        CompoundSet {
            chromium: f(Compound::Chromium, self.chromium),
            copper: f(Compound::Copper, self.copper),
            arsenic: f(Compound::Arsenic, self.arsenic),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Compound, T)> + '_ {
        Compound::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

impl CompoundSet<f64> {
    pub fn sum(&self) -> f64 {
        self.chromium + self.copper + self.arsenic
    }
}

// ==========================================
// DateLayout - accepted source date layouts
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateLayout {
    YearFirst,  // 2024-03-05
    DayFirst,   // 05/03/2024
    MonthFirst, // 03/05/2024
}

impl DateLayout {
    /// chrono patterns tried for this layout, in order.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            DateLayout::YearFirst => &["%Y-%m-%d", "%Y/%m/%d"],
            DateLayout::DayFirst => &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"],
            DateLayout::MonthFirst => &["%m/%d/%Y", "%m-%d-%Y"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_set_map_and_sum() {
        let pct = CompoundSet::new(1.2, 0.5, 0.3);
        let doubled = pct.map(|_, v| v * 2.0);
        assert!((doubled.sum() - 4.0).abs() < 1e-12);
        assert_eq!(doubled.get(Compound::Copper), 1.0);
    }

    #[test]
    fn test_compound_set_iter_order() {
        let set = CompoundSet::new(1, 2, 3);
        let order: Vec<Compound> = set.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Compound::ALL.to_vec());
    }

    #[test]
    fn test_arsenic_formula_has_two_subscripts() {
        let subs = Compound::Arsenic
            .oxide_formula()
            .iter()
            .filter(|p| matches!(p, FormulaPart::Sub(_)))
            .count();
        assert_eq!(subs, 2);
    }
}
