//! Position factory.
//!
//! Every field from `position_type` through `width` is derived from the legs
//! and a caller-supplied `now`; they are only ever written together from one
//! `Derived` value, so a position never carries legs and derived fields that
//! disagree.

use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use uuid::Uuid;

use super::recognition::{
    center_strike, classify, dominant_side, primary_expiration, sort_legs, wing_width,
};
use super::types::{
    same_strike, Classification, CostBasisType, LegacyStrategy, Leg, Position,
    PositionMetadata, PositionType,
};
use crate::error::{EngineError, EngineResult};
use crate::strategies::find_template;

struct Derived {
    classification: Classification,
    primary_expiration: NaiveDate,
    dte: i64,
    strike: f64,
    width: Option<f64>,
}

fn validate_legs(legs: &[Leg]) -> EngineResult<()> {
    if legs.is_empty() {
        return Err(EngineError::invalid_input("a position needs at least one leg"));
    }
    for (i, leg) in legs.iter().enumerate() {
        leg.validate()
            .map_err(|report| EngineError::invalid_input(format!("leg {i}: {report}")))?;
    }
    Ok(())
}

fn derive(legs: &[Leg], now: DateTime<Utc>) -> EngineResult<Derived> {
    validate_legs(legs)?;
    let (Some(primary), Some(strike)) = (primary_expiration(legs), center_strike(legs)) else {
        return Err(EngineError::invalid_input("a position needs at least one leg"));
    };
    let classification = classify(legs);
    Ok(Derived {
        width: wing_width(legs, classification.position_type),
        classification,
        primary_expiration: primary,
        dte: days_to_expiration(primary, now),
        strike,
    })
}

fn apply_derived(position: &mut Position, derived: Derived) {
    position.position_type = derived.classification.position_type;
    position.direction = derived.classification.direction;
    position.is_symmetric = derived.classification.is_symmetric;
    position.primary_expiration = derived.primary_expiration;
    position.dte = derived.dte;
    position.strike = derived.strike;
    position.width = derived.width;
}

/// Calendar days from the UTC date of `now` to `expiration`, floored at zero.
pub fn days_to_expiration(expiration: NaiveDate, now: DateTime<Utc>) -> i64 {
    (expiration - now.date_naive()).num_days().max(0)
}

/// Signed premium from leg fills (debit positive), when every leg has a fill.
pub fn cost_basis_from_fills(legs: &[Leg]) -> Option<f64> {
    legs.iter().map(Leg::signed_premium).sum()
}

/// Build a position from legs. Cost basis comes from the metadata, else from
/// the leg fills, else zero.
pub fn create_position(
    legs: Vec<Leg>,
    metadata: PositionMetadata,
    now: DateTime<Utc>,
) -> EngineResult<Position> {
    metadata.validate()?;
    let derived = derive(&legs, now)?;

    let signed_cost = metadata
        .cost_basis
        .or_else(|| cost_basis_from_fills(&legs))
        .unwrap_or(0.0);
    let (cost_basis, cost_basis_type) = CostBasisType::split(signed_cost);

    let Derived {
        classification,
        primary_expiration,
        dte,
        strike,
        width,
    } = derived;

    let position = Position {
        id: metadata.id.unwrap_or_else(Uuid::new_v4),
        underlying: metadata.underlying,
        legs,
        position_type: classification.position_type,
        direction: classification.direction,
        is_symmetric: classification.is_symmetric,
        primary_expiration,
        dte,
        strike,
        width,
        cost_basis,
        cost_basis_type,
        notes: metadata.notes,
        tags: metadata.tags,
        created_at: now,
        updated_at: now,
    };

    tracing::debug!(
        id = %position.id,
        position_type = %position.position_type,
        legs = position.legs.len(),
        "created position"
    );
    Ok(position)
}

/// Recompute every derived field from the current legs and `now`.
/// Idempotent apart from `updated_at`.
pub fn update_derived_fields(position: &Position, now: DateTime<Utc>) -> EngineResult<Position> {
    let derived = derive(&position.legs, now)?;
    let mut updated = position.clone();
    apply_derived(&mut updated, derived);
    updated.updated_at = now;
    Ok(updated)
}

/// Swap in a new set of legs. When every new leg carries a fill the cost
/// basis is recomputed from the fills; otherwise the existing one is kept.
pub fn replace_legs(
    position: &Position,
    legs: Vec<Leg>,
    now: DateTime<Utc>,
) -> EngineResult<Position> {
    let derived = derive(&legs, now)?;
    let mut updated = position.clone();
    if let Some(signed) = cost_basis_from_fills(&legs) {
        (updated.cost_basis, updated.cost_basis_type) = CostBasisType::split(signed);
    }
    updated.legs = legs;
    apply_derived(&mut updated, derived);
    updated.updated_at = now;
    Ok(updated)
}

/// Expand a legacy strike/width description into legs on one expiration.
pub fn legacy_to_legs(legacy: &LegacyStrategy, expiration: NaiveDate) -> EngineResult<Vec<Leg>> {
    legacy.validate()?;
    if matches!(
        legacy.strategy,
        PositionType::Calendar | PositionType::Diagonal | PositionType::Bwb | PositionType::Custom
    ) {
        return Err(EngineError::unsupported_legacy(format!(
            "{} has no single-expiration strike/width form",
            legacy.strategy
        )));
    }
    let template =
        find_template(legacy.strategy, legacy.side, legacy.direction).ok_or_else(|| {
            EngineError::UnknownStrategy(format!(
                "{:?} {} {}",
                legacy.direction,
                legacy.side.as_str(),
                legacy.strategy
            ))
        })?;
    template.build_legs(
        legacy.strike,
        legacy.width,
        expiration,
        None,
        legacy.contracts,
    )
}

/// Legacy encoding of a position, when its legs are exactly what that
/// encoding expands back to.
pub fn position_to_legacy(position: &Position) -> Option<LegacyStrategy> {
    if position.is_symmetric == Some(false) {
        return None;
    }
    let contracts = position.legs.iter().map(Leg::contracts).min()?;
    let legacy = LegacyStrategy {
        strategy: position.position_type,
        side: dominant_side(&position.legs),
        direction: position.direction,
        strike: position.strike,
        width: position.width.unwrap_or(0.0),
        contracts: i32::try_from(contracts).ok()?,
        debit: position.signed_cost_basis(),
    };

    let rebuilt = legacy_to_legs(&legacy, position.primary_expiration).ok()?;
    same_legs(&rebuilt, &position.legs).then_some(legacy)
}

/// Build a position from a legacy description; the legacy debit is used
/// unless the metadata carries its own cost basis.
pub fn create_position_from_legacy(
    legacy: &LegacyStrategy,
    expiration: NaiveDate,
    mut metadata: PositionMetadata,
    now: DateTime<Utc>,
) -> EngineResult<Position> {
    let legs = legacy_to_legs(legacy, expiration)?;
    metadata.cost_basis = metadata.cost_basis.or(Some(legacy.debit));
    create_position(legs, metadata, now)
}

fn same_legs(a: &[Leg], b: &[Leg]) -> bool {
    a.len() == b.len()
        && sort_legs(a).iter().zip(sort_legs(b).iter()).all(|(x, y)| {
            same_strike(x.strike, y.strike)
                && x.expiration == y.expiration
                && x.option_type == y.option_type
                && x.quantity == y.quantity
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{OptionType, Side};
    use chrono::TimeZone;

    fn exp() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 14, 15, 30, 0).unwrap()
    }

    fn iron_condor_legs() -> Vec<Leg> {
        vec![
            Leg::put(5850.0, exp(), 1),
            Leg::put(5900.0, exp(), -1),
            Leg::call(5950.0, exp(), -1),
            Leg::call(6000.0, exp(), 1),
        ]
    }

    #[test]
    fn derives_fields_from_legs() {
        let p = create_position(iron_condor_legs(), PositionMetadata::new("SPX"), now()).unwrap();
        assert_eq!(p.position_type, PositionType::IronCondor);
        assert_eq!(p.direction, Side::Short);
        assert_eq!(p.is_symmetric, Some(true));
        assert_eq!(p.primary_expiration, exp());
        assert_eq!(p.dte, 30);
        assert!((p.strike - 5925.0).abs() < 1e-9);
        assert_eq!(p.width, Some(50.0));
        assert_eq!(p.created_at, now());
        assert_eq!(p.underlying, "SPX");
    }

    #[test]
    fn cost_basis_from_metadata() {
        let meta = PositionMetadata::new("SPX").with_cost_basis(-12.5);
        let p = create_position(iron_condor_legs(), meta, now()).unwrap();
        assert_eq!(p.cost_basis, 12.5);
        assert_eq!(p.cost_basis_type, CostBasisType::Credit);
        assert!((p.signed_cost_basis() + 12.5).abs() < 1e-12);
    }

    #[test]
    fn cost_basis_from_fills() {
        let fill = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let legs = vec![
            Leg::call(5900.0, exp(), 1).with_fill(45.0, fill).with_costs(0.65, 0.1),
            Leg::call(5950.0, exp(), -1).with_fill(25.0, fill).with_costs(0.65, 0.1),
        ];
        let p = create_position(legs, PositionMetadata::new("SPX"), now()).unwrap();
        assert!((p.cost_basis - 20.0).abs() < 1e-12);
        assert_eq!(p.cost_basis_type, CostBasisType::Debit);
        assert!((p.total_costs() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn partial_fills_fall_back_to_zero() {
        let fill = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let legs = vec![
            Leg::call(5900.0, exp(), 1).with_fill(45.0, fill),
            Leg::call(5950.0, exp(), -1),
        ];
        let p = create_position(legs, PositionMetadata::new("SPX"), now()).unwrap();
        assert_eq!(p.cost_basis, 0.0);
    }

    #[test]
    fn id_from_metadata_is_kept() {
        let id = Uuid::new_v4();
        let meta = PositionMetadata {
            id: Some(id),
            ..PositionMetadata::new("SPX")
        };
        let p = create_position(iron_condor_legs(), meta, now()).unwrap();
        assert_eq!(p.id, id);
    }

    #[test]
    fn expired_position_has_zero_dte() {
        let later = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let p = create_position(iron_condor_legs(), PositionMetadata::new("SPX"), later).unwrap();
        assert_eq!(p.dte, 0);
    }

    #[test]
    fn rejects_empty_and_invalid_legs() {
        assert!(matches!(
            create_position(vec![], PositionMetadata::new("SPX"), now()),
            Err(EngineError::InvalidInput(_))
        ));
        let bad = vec![Leg::call(5900.0, exp(), 0)];
        assert!(create_position(bad, PositionMetadata::new("SPX"), now()).is_err());
        assert!(create_position(iron_condor_legs(), PositionMetadata::new(""), now()).is_err());
    }

    #[test]
    fn update_recomputes_dte_only() {
        let p = create_position(iron_condor_legs(), PositionMetadata::new("SPX"), now()).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let u = update_derived_fields(&p, later).unwrap();
        assert_eq!(u.dte, 14);
        assert_eq!(u.position_type, p.position_type);
        assert_eq!(u.created_at, p.created_at);
        assert_eq!(u.updated_at, later);
    }

    #[test]
    fn update_is_idempotent() {
        let p = create_position(iron_condor_legs(), PositionMetadata::new("SPX"), now()).unwrap();
        let once = update_derived_fields(&p, now()).unwrap();
        let twice = update_derived_fields(&once, now()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn replace_legs_reclassifies() {
        let p = create_position(iron_condor_legs(), PositionMetadata::new("SPX"), now()).unwrap();
        let legs = vec![Leg::put(5900.0, exp(), -1), Leg::put(5850.0, exp(), 1)];
        let r = replace_legs(&p, legs, now()).unwrap();
        assert_eq!(r.position_type, PositionType::Vertical);
        assert_eq!(r.direction, Side::Short);
        assert_eq!(r.width, Some(50.0));
        assert_eq!(r.id, p.id);
        assert_eq!(r.legs.len(), 2);
    }

    #[test]
    fn replace_legs_rejects_empty_without_touching_position() {
        let p = create_position(iron_condor_legs(), PositionMetadata::new("SPX"), now()).unwrap();
        assert!(replace_legs(&p, vec![], now()).is_err());
        assert_eq!(p.legs.len(), 4);
    }

    fn legacy(strategy: PositionType, side: OptionType, direction: Side) -> LegacyStrategy {
        LegacyStrategy {
            strategy,
            side,
            direction,
            strike: 5900.0,
            width: 50.0,
            contracts: 2,
            debit: 12.0,
        }
    }

    #[test]
    fn legacy_butterfly_expands() {
        let legs = legacy_to_legs(
            &legacy(PositionType::Butterfly, OptionType::Put, Side::Long),
            exp(),
        )
        .unwrap();
        let q: Vec<(f64, i32)> = legs.iter().map(|l| (l.strike, l.quantity)).collect();
        assert_eq!(q, vec![(5850.0, 2), (5900.0, -4), (5950.0, 2)]);
        assert!(legs.iter().all(|l| l.option_type == OptionType::Put));
    }

    #[test]
    fn legacy_round_trip() {
        let original = legacy(PositionType::IronCondor, OptionType::Call, Side::Short);
        let p = create_position_from_legacy(&original, exp(), PositionMetadata::new("SPX"), now())
            .unwrap();
        assert_eq!(p.position_type, PositionType::IronCondor);
        assert!((p.signed_cost_basis() - 12.0).abs() < 1e-12);

        let back = position_to_legacy(&p).unwrap();
        assert_eq!(back.strategy, original.strategy);
        assert_eq!(back.direction, original.direction);
        assert_eq!(back.contracts, 2);
        assert!((back.strike - 5900.0).abs() < 1e-9);
        assert!((back.width - 50.0).abs() < 1e-9);
        assert!((back.debit - 12.0).abs() < 1e-12);
    }

    #[test]
    fn legacy_rejects_multi_expiration_and_custom() {
        for strategy in [PositionType::Calendar, PositionType::Diagonal, PositionType::Custom] {
            let err = legacy_to_legs(&legacy(strategy, OptionType::Call, Side::Long), exp());
            assert!(matches!(err, Err(EngineError::UnsupportedLegacy(_))));
        }
    }

    #[test]
    fn no_legacy_form_for_bwb_or_ratio() {
        let bwb = vec![
            Leg::call(5850.0, exp(), 1),
            Leg::call(5900.0, exp(), -2),
            Leg::call(5975.0, exp(), 1),
        ];
        let p = create_position(bwb, PositionMetadata::new("SPX"), now()).unwrap();
        assert!(position_to_legacy(&p).is_none());

        // 1x2 classifies as a vertical but does not match the 1:1 template
        let ratio = vec![Leg::call(5900.0, exp(), 1), Leg::call(5950.0, exp(), -2)];
        let p = create_position(ratio, PositionMetadata::new("SPX"), now()).unwrap();
        assert_eq!(p.position_type, PositionType::Vertical);
        assert!(position_to_legacy(&p).is_none());
    }

    #[test]
    fn legacy_contracts_overflow_is_invalid_input() {
        let mut huge = legacy(PositionType::Butterfly, OptionType::Call, Side::Long);
        huge.contracts = i32::MAX;
        let err = legacy_to_legs(&huge, exp());
        assert!(matches!(err, Err(EngineError::InvalidInput(_))));
    }
}
