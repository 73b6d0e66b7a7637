// 🌊 Drift Injection - index-dependent perturbations of a sampled batch
//
// Each perturbation decides for itself whether a batch index is in range,
// so adding a new kind of drift never touches the generator loop.

use crate::config::{CategoricalDrift, DriftConfig, NumericDrift};
use crate::error::{DriftError, DriftResult};
use crate::sampler::{fraction_count, sample_without_replacement};
use crate::table::{Table, Value};
use log::info;
use rand::RngCore;
use serde::{Deserialize, Serialize};

// ============================================================================
// OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PerturbationOutcome {
    Scaled {
        column: String,
        factor: f64,
    },
    Relabeled {
        column: String,
        candidates: usize,
        relabeled: usize,
    },
}

// ============================================================================
// PERTURBATION TRAIT
// ============================================================================

pub trait Perturbation {
    fn name(&self) -> &str;

    /// Whether this perturbation runs for the given 1-based batch index
    fn applies_to(&self, batch_index: usize) -> bool;

    /// Mutate the batch in place. Only called when `applies_to` is true.
    /// Returns None when the target column is absent and the drift is optional.
    fn apply(
        &self,
        batch: &mut Table,
        batch_index: usize,
        rng: &mut dyn RngCore,
    ) -> DriftResult<Option<PerturbationOutcome>>;
}

// ============================================================================
// NUMERIC SCALING
// ============================================================================

/// Multiply a numeric column by a factor growing with the batch index
pub struct NumericScale {
    spec: NumericDrift,
}

impl NumericScale {
    pub fn new(spec: NumericDrift) -> Self {
        NumericScale { spec }
    }
}

impl Perturbation for NumericScale {
    fn name(&self) -> &str {
        "numeric_scale"
    }

    fn applies_to(&self, batch_index: usize) -> bool {
        self.spec.factor(batch_index).is_some()
    }

    fn apply(
        &self,
        batch: &mut Table,
        batch_index: usize,
        _rng: &mut dyn RngCore,
    ) -> DriftResult<Option<PerturbationOutcome>> {
        let Some(factor) = self.spec.factor(batch_index) else {
            return Ok(None);
        };
        let column = &self.spec.column;

        batch.try_map_column(column, |row, value| {
            if value.is_missing() {
                return Ok(Value::Missing);
            }
            value
                .as_f64()
                .map(|x| Value::Float(x * factor))
                .ok_or_else(|| DriftError::NonNumeric {
                    column: column.clone(),
                    row,
                    value: value.to_string(),
                })
        })?;

        info!("Batch {}: Injected numerical drift ({} x{:.2})", batch_index, column, factor);
        Ok(Some(PerturbationOutcome::Scaled {
            column: column.clone(),
            factor,
        }))
    }
}

// ============================================================================
// CATEGORICAL RELABELING
// ============================================================================

/// Move a random fraction of one category into another
pub struct CategoryShift {
    spec: CategoricalDrift,
}

impl CategoryShift {
    pub fn new(spec: CategoricalDrift) -> Self {
        CategoryShift { spec }
    }
}

impl Perturbation for CategoryShift {
    fn name(&self) -> &str {
        "category_shift"
    }

    fn applies_to(&self, batch_index: usize) -> bool {
        self.spec.is_active(batch_index)
    }

    fn apply(
        &self,
        batch: &mut Table,
        batch_index: usize,
        rng: &mut dyn RngCore,
    ) -> DriftResult<Option<PerturbationOutcome>> {
        let Some(col) = batch.column_index(&self.spec.column) else {
            return Ok(None);
        };

        let candidates: Vec<usize> = batch
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| row[col].as_text() == Some(self.spec.from.as_str()))
            .map(|(pos, _)| pos)
            .collect();

        let wanted = fraction_count(self.spec.fraction, candidates.len());
        let picks = sample_without_replacement(candidates.len(), wanted, rng)?;

        for pick in &picks {
            if let Some(cell) = batch.cell_mut(candidates[*pick], col) {
                *cell = Value::Text(self.spec.to.clone());
            }
        }

        info!(
            "Batch {}: Injected categorical drift ({} of {} '{}' -> '{}')",
            batch_index,
            picks.len(),
            candidates.len(),
            self.spec.from,
            self.spec.to
        );
        Ok(Some(PerturbationOutcome::Relabeled {
            column: self.spec.column.clone(),
            candidates: candidates.len(),
            relabeled: picks.len(),
        }))
    }
}

// ============================================================================
// PLAN
// ============================================================================

/// Ordered set of perturbations applied to every batch
pub struct DriftPlan {
    perturbations: Vec<Box<dyn Perturbation>>,
}

impl DriftPlan {
    pub fn new(perturbations: Vec<Box<dyn Perturbation>>) -> Self {
        DriftPlan { perturbations }
    }

    /// Numeric scaling first, then the categorical shift
    pub fn from_config(config: &DriftConfig) -> Self {
        DriftPlan::new(vec![
            Box::new(NumericScale::new(config.numeric_drift.clone())),
            Box::new(CategoryShift::new(config.categorical_drift.clone())),
        ])
    }

    pub fn names(&self) -> Vec<&str> {
        self.perturbations.iter().map(|p| p.name()).collect()
    }

    pub fn apply(
        &self,
        batch: &mut Table,
        batch_index: usize,
        rng: &mut dyn RngCore,
    ) -> DriftResult<Vec<PerturbationOutcome>> {
        let mut outcomes = Vec::new();
        for perturbation in &self.perturbations {
            if !perturbation.applies_to(batch_index) {
                continue;
            }
            if let Some(outcome) = perturbation.apply(batch, batch_index, rng)? {
                outcomes.push(outcome);
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn batch(contracts: &[&str]) -> Table {
        let rows: Vec<Vec<&str>> = contracts
            .iter()
            .enumerate()
            .map(|(i, c)| vec![*c, if i % 2 == 0 { "20.0" } else { "" }])
            .collect();
        Table::from_fields(&["Contract", "MonthlyCharges"], &rows)
    }

    fn one_year_count(table: &Table) -> usize {
        table
            .column("Contract")
            .unwrap()
            .iter()
            .filter(|v| v.as_text() == Some("One year"))
            .count()
    }

    #[test]
    fn test_numeric_scale_skips_early_batches() {
        let scale = NumericScale::new(NumericDrift::default());
        assert!(!scale.applies_to(5));
        assert!(scale.applies_to(6));
    }

    #[test]
    fn test_numeric_scale_multiplies_and_keeps_missing() {
        let scale = NumericScale::new(NumericDrift::default());
        let mut table = batch(&["One year", "Two year", "One year"]);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = scale.apply(&mut table, 6, &mut rng).unwrap().unwrap();
        assert!(matches!(outcome, PerturbationOutcome::Scaled { factor, .. } if (factor - 1.1).abs() < 1e-12));

        let charges = table.column("MonthlyCharges").unwrap();
        assert!((charges[0].as_f64().unwrap() - 22.0).abs() < 1e-9);
        assert!(charges[1].is_missing());
        assert!((charges[2].as_f64().unwrap() - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_scale_batch_ten_is_one_point_five() {
        let scale = NumericScale::new(NumericDrift::default());
        let mut table = batch(&["One year"]);
        let mut rng = StdRng::seed_from_u64(1);
        scale.apply(&mut table, 10, &mut rng).unwrap();
        let charges = table.column("MonthlyCharges").unwrap();
        assert!((charges[0].as_f64().unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_scale_rejects_text() {
        let scale = NumericScale::new(NumericDrift::default());
        let mut table = Table::from_fields(&["MonthlyCharges"], &[vec!["12.0"], vec!["lots"]]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = scale.apply(&mut table, 6, &mut rng).unwrap_err();
        assert!(matches!(err, DriftError::NonNumeric { row: 1, .. }));
    }

    #[test]
    fn test_numeric_scale_requires_column() {
        let scale = NumericScale::new(NumericDrift::default());
        let mut table = Table::from_fields(&["Contract"], &[vec!["One year"]]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = scale.apply(&mut table, 6, &mut rng).unwrap_err();
        assert!(matches!(err, DriftError::MissingColumn(_)));
    }

    #[test]
    fn test_category_shift_relabels_exact_fraction() {
        let shift = CategoryShift::new(CategoricalDrift::default());
        let mut contracts = vec!["One year"; 10];
        contracts.extend(["Two year", "Month-to-month", "Two year"]);
        let mut table = batch(&contracts);
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = shift.apply(&mut table, 8, &mut rng).unwrap().unwrap();
        assert_eq!(
            outcome,
            PerturbationOutcome::Relabeled {
                column: "Contract".into(),
                candidates: 10,
                relabeled: 2,
            }
        );
        assert_eq!(one_year_count(&table), 8);

        let month = table
            .column("Contract")
            .unwrap()
            .iter()
            .filter(|v| v.as_text() == Some("Month-to-month"))
            .count();
        assert_eq!(month, 3);
    }

    #[test]
    fn test_category_shift_without_column_is_noop() {
        let shift = CategoryShift::new(CategoricalDrift::default());
        let mut table = Table::from_fields(&["MonthlyCharges"], &[vec!["1.0"]]);
        let before = table.clone();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(shift.apply(&mut table, 9, &mut rng).unwrap().is_none());
        assert_eq!(table, before);
    }

    #[test]
    fn test_category_shift_oversized_fraction_fails() {
        let shift = CategoryShift::new(CategoricalDrift {
            fraction: 2.0,
            ..Default::default()
        });
        let mut table = batch(&["One year", "One year", "Two year"]);
        let mut rng = StdRng::seed_from_u64(3);
        let err = shift.apply(&mut table, 8, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            DriftError::Sampling {
                requested: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn test_plan_respects_thresholds() {
        let plan = DriftPlan::from_config(&DriftConfig::default());
        assert_eq!(plan.names(), vec!["numeric_scale", "category_shift"]);
        let mut rng = StdRng::seed_from_u64(5);

        let mut early = batch(&["One year"; 10]);
        let original = early.clone();
        assert!(plan.apply(&mut early, 5, &mut rng).unwrap().is_empty());
        assert_eq!(early, original);

        let mut middle = batch(&["One year"; 10]);
        let outcomes = plan.apply(&mut middle, 7, &mut rng).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(one_year_count(&middle), 10);

        let mut late = batch(&["One year"; 10]);
        let outcomes = plan.apply(&mut late, 8, &mut rng).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(one_year_count(&late), 8);
    }
}
