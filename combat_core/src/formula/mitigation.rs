//! Damage mitigation through armor and resistance
//!
//! Effective armor strips a flat amount; resistance scales by
//! `1 - resistance/100` after clamping to configured bounds, so negative
//! resistance amplifies. The defender's mitigation-order flag picks
//! whether armor applies before or after the resistance scaling.
//! Mitigated damage never goes below zero.

/// Armor left after the attacker's penetration:
/// `max(0, armor * (1 - pen_percent/100) - armor_pen)`
pub fn effective_armor(armor: f64, armor_pen: f64, pen_percent: f64) -> f64 {
    (armor * (1.0 - pen_percent / 100.0) - armor_pen).max(0.0)
}

/// Flat penetration required to fully strip `armor`, given the attacker's
/// percent penetration
pub fn armor_pen_needed(armor: f64, pen_percent: f64) -> f64 {
    (armor * (1.0 - pen_percent / 100.0)).max(0.0)
}

/// Mitigate a raw hit through armor and resistance.
///
/// With `armor_first` the result is `(raw - effective_armor) * factor`;
/// otherwise `raw * factor - effective_armor`, where
/// `factor = 1 - clamped_resistance / 100`.
#[allow(clippy::too_many_arguments)]
pub fn calculate_mitigation(
    raw_damage: f64,
    armor: f64,
    resistance: f64,
    armor_pen: f64,
    pen_percent: f64,
    armor_first: bool,
    min_resistance: f64,
    max_resistance: f64,
) -> f64 {
    if raw_damage <= 0.0 {
        return 0.0;
    }
    let armor_left = effective_armor(armor, armor_pen, pen_percent);
    let resistance = resistance.clamp(min_resistance, max_resistance);
    let resist_factor = 1.0 - resistance / 100.0;

    let mitigated = if armor_first {
        (raw_damage - armor_left) * resist_factor
    } else {
        raw_damage * resist_factor - armor_left
    };
    mitigated.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES_MIN: f64 = -200.0;
    const RES_MAX: f64 = 100.0;

    #[test]
    fn test_effective_armor() {
        // 40% percent pen first, then 10 flat
        assert!((effective_armor(50.0, 10.0, 40.0) - 20.0).abs() < f64::EPSILON);
        assert!((effective_armor(50.0, 0.0, 0.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_effective_armor_floors_at_zero() {
        assert!((effective_armor(10.0, 50.0, 0.0) - 0.0).abs() < f64::EPSILON);
        assert!((effective_armor(10.0, 0.0, 150.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_armor_before_resistance() {
        // (100 - 20) * (1 - 0.25)
        let result = calculate_mitigation(100.0, 20.0, 25.0, 0.0, 0.0, true, RES_MIN, RES_MAX);
        assert!((result - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resistance_before_armor() {
        // 100 * (1 - 0.25) - 20
        let result = calculate_mitigation(100.0, 20.0, 25.0, 0.0, 0.0, false, RES_MIN, RES_MAX);
        assert!((result - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_resistance_amplifies() {
        // (100 - 20) * 1.5
        let result = calculate_mitigation(100.0, 20.0, -50.0, 0.0, 0.0, true, RES_MIN, RES_MAX);
        assert!((result - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resistance_clamped_to_cap() {
        // 150 clamps to 100, full immunity
        let result = calculate_mitigation(100.0, 0.0, 150.0, 0.0, 0.0, true, RES_MIN, RES_MAX);
        assert!((result - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resistance_clamped_to_floor() {
        // -500 clamps to -200, factor 3
        let result = calculate_mitigation(100.0, 0.0, -500.0, 0.0, 0.0, true, RES_MIN, RES_MAX);
        assert!((result - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_armor_exceeding_damage_floors_at_zero() {
        let result = calculate_mitigation(10.0, 50.0, 0.0, 0.0, 0.0, true, RES_MIN, RES_MAX);
        assert!((result - 0.0).abs() < f64::EPSILON);

        let reversed = calculate_mitigation(10.0, 50.0, 0.0, 0.0, 0.0, false, RES_MIN, RES_MAX);
        assert!((reversed - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_penetration_restores_damage() {
        let walled = calculate_mitigation(100.0, 40.0, 0.0, 0.0, 0.0, true, RES_MIN, RES_MAX);
        let pierced = calculate_mitigation(100.0, 40.0, 0.0, 15.0, 50.0, true, RES_MIN, RES_MAX);
        assert!((walled - 60.0).abs() < f64::EPSILON);
        // effective armor: 40 * 0.5 - 15 = 5
        assert!((pierced - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_positive_raw_damage() {
        let zero = calculate_mitigation(0.0, 5.0, 0.0, 0.0, 0.0, true, RES_MIN, RES_MAX);
        let negative = calculate_mitigation(-10.0, 5.0, 0.0, 0.0, 0.0, true, RES_MIN, RES_MAX);
        assert!(zero.abs() < f64::EPSILON);
        assert!(negative.abs() < f64::EPSILON);
    }

    #[test]
    fn test_armor_pen_needed_inverse() {
        let needed = armor_pen_needed(40.0, 50.0);
        assert!((effective_armor(40.0, needed, 50.0) - 0.0).abs() < f64::EPSILON);
        assert!(effective_armor(40.0, needed - 1.0, 50.0) > 0.0);
    }
}
