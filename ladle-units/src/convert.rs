//! Conversion functions for Ladle
//!
//! Everything goes through the base unit of the quantity's kind. Amounts are
//! plain `f64` and are never rounded here; rounding is a display concern
//! (see [`Quantity`]'s `Display`).

use tracing::{debug, trace};
use crate::{get_unit, units_where, MeasurementSystem, Quantity, Unit, UnitError, UnitKind};

fn resolve(unit_name: &str) -> Result<&'static Unit, UnitError> {
    get_unit(unit_name).ok_or_else(|| UnitError::UnknownUnit(unit_name.to_string()))
}

/// Convert an amount in `unit_name` to its kind's base unit
///
/// `to_base(2.0, "kg")` is `2000.0` (grams).
pub fn to_base(amount: f64, unit_name: &str) -> Result<f64, UnitError> {
    Ok(resolve(unit_name)?.to_base(amount))
}

/// Convert an amount in the base unit to `unit_name`
///
/// `from_base(480.0, "cup")` is `2.0`.
pub fn from_base(base_amount: f64, unit_name: &str) -> Result<f64, UnitError> {
    Ok(resolve(unit_name)?.from_base(base_amount))
}

/// Convert directly between two units of the same kind
pub fn convert(amount: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    let from_unit = resolve(from)?;
    let to_unit = resolve(to)?;

    if !from_unit.is_compatible(to_unit) {
        return Err(UnitError::IncompatibleKinds {
            from: from.to_string(),
            to: to.to_string(),
            from_kind: from_unit.kind,
            to_kind: to_unit.kind,
        });
    }

    Ok(to_unit.from_base(from_unit.to_base(amount)))
}

/// Re-express an amount in the most readable unit of `target`
///
/// Count and neutral units come back unchanged, as do amounts already in the
/// target system and kinds with no unit registered under `target`. Otherwise
/// the amount goes through base and the nicest target unit is picked by
/// [`select_nicest`].
pub fn convert_amount_to_system(
    amount: f64,
    unit_name: &str,
    target: MeasurementSystem,
) -> Result<Quantity, UnitError> {
    let unit = resolve(unit_name)?;
    let unchanged = Quantity::new(amount, unit);

    if unit.kind == UnitKind::Count || unit.system == MeasurementSystem::Neutral {
        debug!(unit = unit.name, "count unit, not converting between systems");
        return Ok(unchanged);
    }

    if unit.system == target {
        return Ok(unchanged);
    }

    let base_amount = unit.to_base(amount);
    let candidates: Vec<&'static Unit> = units_where(target, unit.kind).collect();

    match select_nicest(base_amount, &candidates) {
        Some(best) => {
            debug!(
                from = %unchanged,
                to = %best,
                %target,
                "converted between systems"
            );
            Ok(best)
        }
        None => {
            debug!(unit = unit.name, %target, kind = %unit.kind, "no candidate unit in target system");
            Ok(unchanged)
        }
    }
}

/// Pick the most readable representation of `base_amount` among `candidates`
///
/// Scans in order keeping a running best. Amounts of at least 1 beat amounts
/// below 1, and among those the smallest wins. When nothing reaches 1 the
/// largest wins. Returns `None` for an empty candidate list.
///
/// The two sides of 1 are never compared by distance: 1.01 beats 0.99.
pub fn select_nicest(base_amount: f64, candidates: &[&'static Unit]) -> Option<Quantity> {
    let (first, rest) = candidates.split_first()?;
    let mut best = Quantity::new(first.from_base(base_amount), first);

    for &candidate in rest {
        let amount = candidate.from_base(base_amount);

        let replace = if amount >= 1.0 {
            best.amount < 1.0 || amount < best.amount
        } else {
            amount > best.amount && best.amount < 1.0
        };

        trace!(candidate = candidate.name, amount, best = best.unit.name, replace);

        if replace {
            best = Quantity::new(amount, candidate);
        }
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNITS;
    use approx::{assert_relative_eq, assert_abs_diff_eq};
    use proptest::prelude::*;

    #[test]
    fn test_to_base() {
        assert_relative_eq!(to_base(2.0, "kg").unwrap(), 2000.0);
        assert_relative_eq!(to_base(1.0, "cup").unwrap(), 240.0);
        assert_relative_eq!(to_base(3.0, "tsp").unwrap(), 15.0);
        assert_relative_eq!(to_base(4.0, "clove").unwrap(), 4.0);
    }

    #[test]
    fn test_from_base() {
        assert_relative_eq!(from_base(480.0, "cup").unwrap(), 2.0);
        assert_relative_eq!(from_base(250.0, "kg").unwrap(), 0.25);
        assert_relative_eq!(from_base(453.59237, "lb").unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_unit() {
        assert_eq!(to_base(1.0, "parsec"), Err(UnitError::UnknownUnit("parsec".to_string())));
        assert_eq!(from_base(1.0, "parsec"), Err(UnitError::UnknownUnit("parsec".to_string())));
        assert_eq!(
            convert_amount_to_system(1.0, "parsec", MeasurementSystem::Imperial),
            Err(UnitError::UnknownUnit("parsec".to_string()))
        );
    }

    #[test]
    fn test_convert_direct() {
        assert_relative_eq!(convert(1.0, "tbsp", "tsp").unwrap(), 3.0);
        assert_relative_eq!(convert(2.0, "lb", "oz").unwrap(), 32.0, max_relative = 1e-12);
        assert_relative_eq!(convert(1.5, "L", "ml").unwrap(), 1500.0);
    }

    #[test]
    fn test_convert_incompatible_kinds() {
        let err = convert(100.0, "g", "ml").unwrap_err();
        assert_eq!(
            err,
            UnitError::IncompatibleKinds {
                from: "g".to_string(),
                to: "ml".to_string(),
                from_kind: UnitKind::Mass,
                to_kind: UnitKind::Volume,
            }
        );
        assert!(matches!(convert(1.0, "piece", "cup"), Err(UnitError::IncompatibleKinds { .. })));
    }

    #[test]
    fn test_convert_unknown_target() {
        assert_eq!(convert(1.0, "g", "stone"), Err(UnitError::UnknownUnit("stone".to_string())));
    }

    #[test]
    fn test_count_is_never_converted() {
        for target in MeasurementSystem::ALL {
            let q = convert_amount_to_system(3.0, "piece", target).unwrap();
            assert_eq!(q.amount, 3.0);
            assert_eq!(q.unit.name, "piece");
        }
        let q = convert_amount_to_system(2.0, "clove", MeasurementSystem::Imperial).unwrap();
        assert_eq!(q.unit.name, "clove");
    }

    #[test]
    fn test_same_system_unchanged() {
        let q = convert_amount_to_system(5.0, "kg", MeasurementSystem::Metric).unwrap();
        assert_eq!(q.amount, 5.0);
        assert_eq!(q.unit.name, "kg");

        // not "simplified" to a nicer unit of the same system
        let q = convert_amount_to_system(0.001, "L", MeasurementSystem::Metric).unwrap();
        assert_eq!(q.unit.name, "L");
        assert_eq!(q.amount, 0.001);
    }

    #[test]
    fn test_cup_to_metric_prefers_ml() {
        let q = convert_amount_to_system(1.0, "cup", MeasurementSystem::Metric).unwrap();
        assert_eq!(q.unit.name, "ml");
        assert_relative_eq!(q.amount, 240.0);
    }

    #[test]
    fn test_large_volume_to_metric_prefers_litres() {
        let q = convert_amount_to_system(2.0, "gallon", MeasurementSystem::Metric).unwrap();
        assert_eq!(q.unit.name, "L");
        assert_relative_eq!(q.amount, 7.68, max_relative = 1e-12);
    }

    #[test]
    fn test_grams_to_imperial() {
        let q = convert_amount_to_system(500.0, "g", MeasurementSystem::Imperial).unwrap();
        assert_eq!(q.unit.name, "lb");
        assert_relative_eq!(q.amount, 500.0 / 453.59237, max_relative = 1e-12);

        let q = convert_amount_to_system(100.0, "g", MeasurementSystem::Imperial).unwrap();
        assert_eq!(q.unit.name, "oz");
    }

    #[test]
    fn test_small_volume_to_imperial() {
        let q = convert_amount_to_system(5.0, "ml", MeasurementSystem::Imperial).unwrap();
        assert_eq!(q.unit.name, "tsp");
        assert_relative_eq!(q.amount, 1.0);

        // nothing reaches 1: closest from below
        let q = convert_amount_to_system(2.0, "ml", MeasurementSystem::Imperial).unwrap();
        assert_eq!(q.unit.name, "tsp");
        assert_relative_eq!(q.amount, 0.4);
    }

    #[test]
    fn test_litre_to_imperial_picks_smallest_above_one() {
        let q = convert_amount_to_system(1.0, "L", MeasurementSystem::Imperial).unwrap();
        assert_eq!(q.unit.name, "quart");
        assert_relative_eq!(q.amount, 1000.0 / 960.0, max_relative = 1e-12);
    }

    #[test]
    fn test_no_candidate_falls_back() {
        let q = convert_amount_to_system(250.0, "g", MeasurementSystem::Neutral).unwrap();
        assert_eq!(q.amount, 250.0);
        assert_eq!(q.unit.name, "g");
    }

    #[test]
    fn test_select_nicest_empty() {
        assert!(select_nicest(10.0, &[]).is_none());
    }

    #[test]
    fn test_select_nicest_first_candidate_wins_ties() {
        let tsp = crate::get_unit("tsp").unwrap();
        let q = select_nicest(10.0, &[tsp, tsp]).unwrap();
        assert_eq!(q.unit.name, "tsp");
        assert_relative_eq!(q.amount, 2.0);
    }

    #[test]
    fn test_select_nicest_prefers_above_one_over_closer_below() {
        // 1.01 (above) beats 0.99 (below), even though both are 0.01 away
        let above = Unit::new("above", MeasurementSystem::Metric, UnitKind::Mass, "g", 99.0, 1.0 / 99.0);
        let below = Unit::new("below", MeasurementSystem::Metric, UnitKind::Mass, "g", 101.0, 1.0 / 101.0);
        let above: &'static Unit = Box::leak(Box::new(above));
        let below: &'static Unit = Box::leak(Box::new(below));

        let q = select_nicest(99.99, &[below, above]).unwrap();
        assert_eq!(q.unit.name, "above");
        let q = select_nicest(99.99, &[above, below]).unwrap();
        assert_eq!(q.unit.name, "above");
    }

    #[test]
    fn test_zero_amount() {
        let q = convert_amount_to_system(0.0, "cup", MeasurementSystem::Metric).unwrap();
        assert_eq!(q.unit.name, "ml");
        assert_eq!(q.amount, 0.0);
    }

    proptest! {
        #[test]
        fn prop_round_trip(idx in 0..UNITS.len(), amount in 0.0f64..1.0e9) {
            let unit = &UNITS[idx];
            let back = from_base(to_base(amount, unit.name).unwrap(), unit.name).unwrap();
            prop_assert!((back - amount).abs() <= amount * 1e-9 + f64::EPSILON);
        }

        #[test]
        fn prop_base_consistency(a in 0..UNITS.len(), b in 0..UNITS.len(), amount in 0.0f64..1.0e6) {
            let (u1, u2) = (&UNITS[a], &UNITS[b]);
            prop_assume!(u1.kind == u2.kind);
            let via_base = convert(amount, u1.name, u2.name).unwrap();
            let direct = amount * (u1.factor_to_base / u2.factor_to_base);
            prop_assert!((via_base - direct).abs() <= direct.abs() * 1e-9 + f64::EPSILON);
        }

        #[test]
        fn prop_count_invariance(amount in 0.0f64..1.0e6, target in 0usize..3) {
            let target = MeasurementSystem::ALL[target];
            let q = convert_amount_to_system(amount, "piece", target).unwrap();
            prop_assert_eq!(q.amount, amount);
            prop_assert_eq!(q.unit.name, "piece");
        }

        #[test]
        fn prop_conversion_preserves_quantity(idx in 0..UNITS.len(), amount in 0.0f64..1.0e6) {
            let unit = &UNITS[idx];
            for target in MeasurementSystem::ALL {
                let q = convert_amount_to_system(amount, unit.name, target).unwrap();
                prop_assert_eq!(q.unit.kind, unit.kind);
                let before = unit.to_base(amount);
                let after = q.unit.to_base(q.amount);
                prop_assert!((before - after).abs() <= before * 1e-9 + f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_abs_tolerance_near_zero() {
        assert_abs_diff_eq!(convert(1e-12, "kg", "g").unwrap(), 1e-9, epsilon = 1e-18);
    }
}
