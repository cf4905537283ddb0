// ==========================================
// Wood QC Report - Metrics calculator
// ==========================================
// Responsibility: physical and chemical results of one sample
// Input: replicate diameters/lengths (mm), masses (g), compound percentages
// Output: SampleMetrics (averages, volume, density, retention, balance)
// Red line: pure arithmetic; zero denominators give zero, never an error
// ==========================================

use crate::domain::{CanonicalField, CanonicalRecord, Compound, CompoundSet, SampleMetrics, REPLICATES};
use crate::importer::value_normalizer::ValueNormalizer;
use std::f64::consts::PI;

const MM_PER_CM: f64 = 10.0;
const KG_M3_PER_G_CM3: f64 = 1000.0;

// ==========================================
// MetricsInput - normalized calculator inputs
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsInput {
    pub diameters_mm: Vec<f64>,
    pub lengths_mm: Vec<f64>,
    pub masses_g: Vec<f64>,
    pub percentages: CompoundSet<f64>,
}

impl MetricsInput {
    /// Replicates are read as plain numbers; percentages get the scale correction.
    pub fn from_fields(fields: &CanonicalRecord, normalizer: &ValueNormalizer) -> Self {
        let replicates = |field: fn(u8) -> CanonicalField| -> Vec<f64> {
            (1..=REPLICATES)
                .map(|i| normalizer.number(fields.get(field(i))))
                .collect()
        };

        Self {
            diameters_mm: replicates(CanonicalField::Diameter),
            lengths_mm: replicates(CanonicalField::Length),
            masses_g: replicates(CanonicalField::Mass),
            percentages: CompoundSet::new(
                normalizer.scaled_number(fields.get(CanonicalField::CompoundPercent(Compound::Chromium))),
                normalizer.scaled_number(fields.get(CanonicalField::CompoundPercent(Compound::Copper))),
                normalizer.scaled_number(fields.get(CanonicalField::CompoundPercent(Compound::Arsenic))),
            ),
        }
    }
}

// ==========================================
// MetricsCalculator
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(&self, input: &MetricsInput) -> SampleMetrics {
        let avg_diameter_cm = replicate_average(&input.diameters_mm) / MM_PER_CM;
        let avg_length_cm = replicate_average(&input.lengths_mm) / MM_PER_CM;
        let avg_mass_g = replicate_average(&input.masses_g);

        let volume_cm3 = cylinder_volume(avg_diameter_cm, avg_length_cm);
        let density_g_cm3 = if volume_cm3 > 0.0 {
            avg_mass_g / volume_cm3
        } else {
            0.0
        };
        let density_kg_m3 = density_g_cm3 * KG_M3_PER_G_CM3;

        let retention_kg_m3 = input
            .percentages
            .map(|_, pct| pct / 100.0 * density_kg_m3);
        let total_retention_kg_m3 = retention_kg_m3.sum();

        SampleMetrics {
            avg_diameter_cm,
            avg_length_cm,
            avg_mass_g,
            volume_cm3,
            density_g_cm3,
            density_kg_m3,
            percentages: input.percentages,
            retention_kg_m3,
            balance_percent: balance(&input.percentages),
            total_retention_kg_m3,
        }
    }
}

/// Mean of the non-zero replicates; an empty group averages to 0.
pub fn replicate_average(values: &[f64]) -> f64 {
    let taken: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v != 0.0)
        .collect();
    if taken.is_empty() {
        return 0.0;
    }
    taken.iter().sum::<f64>() / taken.len() as f64
}

/// π (d/2)² l
pub fn cylinder_volume(diameter_cm: f64, length_cm: f64) -> f64 {
    PI * (diameter_cm / 2.0).powi(2) * length_cm
}

/// Each compound's share of the summed percentages; `None` unless the sum is positive.
pub fn balance(percentages: &CompoundSet<f64>) -> Option<CompoundSet<f64>> {
    let total = percentages.sum();
    if total <= 0.0 {
        return None;
    }
    Some(percentages.map(|_, pct| pct / total * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawValue;

    const EPS: f64 = 1e-6;

    fn input_with(diameter: f64, length: f64, mass: f64, pct: (f64, f64, f64)) -> MetricsInput {
        MetricsInput {
            diameters_mm: vec![diameter; 5],
            lengths_mm: vec![length; 5],
            masses_g: vec![mass; 5],
            percentages: CompoundSet::new(pct.0, pct.1, pct.2),
        }
    }

    #[test]
    fn test_replicate_average_skips_zeros() {
        assert!((replicate_average(&[50.0, 0.0, 52.0, 0.0, 0.0]) - 51.0).abs() < EPS);
        assert_eq!(replicate_average(&[0.0; 5]), 0.0);
        assert_eq!(replicate_average(&[]), 0.0);
    }

    #[test]
    fn test_density_and_retention() {
        let volume = cylinder_volume(5.0, 10.0);
        let mass = 0.65 * volume;
        let metrics = MetricsCalculator::new().calculate(&input_with(50.0, 100.0, mass, (1.2, 0.5, 0.3)));

        assert!((metrics.avg_diameter_cm - 5.0).abs() < EPS);
        assert!((metrics.avg_length_cm - 10.0).abs() < EPS);
        assert!((metrics.volume_cm3 - 196.349_540_849).abs() < 1e-6);
        assert!((metrics.density_kg_m3 - 650.0).abs() < 1e-6);
        assert!((metrics.retention_kg_m3.chromium - 7.8).abs() < 1e-6);
        assert!((metrics.retention_kg_m3.copper - 3.25).abs() < 1e-6);
        assert!((metrics.retention_kg_m3.arsenic - 1.95).abs() < 1e-6);
        assert!((metrics.total_retention_kg_m3 - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_volume_short_circuits() {
        let metrics = MetricsCalculator::new().calculate(&input_with(0.0, 100.0, 120.0, (1.2, 0.5, 0.3)));

        assert_eq!(metrics.volume_cm3, 0.0);
        assert_eq!(metrics.density_g_cm3, 0.0);
        assert_eq!(metrics.total_retention_kg_m3, 0.0);
        assert!(metrics.balance_percent.is_some());
    }

    #[test]
    fn test_balance_sums_to_hundred() {
        let cases = [(1.2, 0.5, 0.3), (47.5, 18.5, 34.0), (0.0, 0.0, 2.0), (1e-3, 7.0, 300.0)];
        for (a, b, c) in cases {
            let shares = balance(&CompoundSet::new(a, b, c)).unwrap();
            assert!((shares.sum() - 100.0).abs() < 1e-9, "case {:?}", (a, b, c));
        }
    }

    #[test]
    fn test_balance_unset_when_sum_is_zero() {
        assert!(balance(&CompoundSet::new(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_negative_inputs_pass_through() {
        let metrics = MetricsCalculator::new().calculate(&input_with(50.0, 100.0, 120.0, (-1.0, 0.5, 0.5)));
        assert!(metrics.retention_kg_m3.chromium < 0.0);
    }

    #[test]
    fn test_input_from_fields_scales_percentages_only() {
        let fields = CanonicalRecord::new()
            .with(CanonicalField::Diameter(1), RawValue::text("150"))
            .with(CanonicalField::CompoundPercent(Compound::Chromium), RawValue::text("368"))
            .with(CanonicalField::CompoundPercent(Compound::Copper), RawValue::text("1,5"));

        let input = MetricsInput::from_fields(&fields, &ValueNormalizer::default());

        assert_eq!(input.diameters_mm[0], 150.0);
        assert_eq!(input.diameters_mm[1], 0.0);
        assert!((input.percentages.chromium - 3.68).abs() < EPS);
        assert!((input.percentages.copper - 1.5).abs() < EPS);
        assert_eq!(input.percentages.arsenic, 0.0);
    }
}
