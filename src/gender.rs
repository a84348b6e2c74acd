use crate::state::GenderRatio;

/// Map a PokeAPI gender-rate code to male/female percentages.
///
/// The code counts eighths female: 0 is always male, 8 always female, and
/// -1 marks a genderless species. Anything outside -1..=8 is treated as
/// genderless as well.
pub fn gender_ratio(code: i32) -> GenderRatio {
    match code {
        0..=8 => {
            let female = f64::from(code) * 12.5;
            GenderRatio {
                male: 100.0 - female,
                female,
            }
        }
        _ => GenderRatio::GENDERLESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_codes() {
        assert_eq!(gender_ratio(-1), GenderRatio::GENDERLESS);
        assert_eq!(gender_ratio(0), GenderRatio { male: 100.0, female: 0.0 });
        assert_eq!(gender_ratio(1), GenderRatio { male: 87.5, female: 12.5 });
        assert_eq!(gender_ratio(4), GenderRatio { male: 50.0, female: 50.0 });
        assert_eq!(gender_ratio(8), GenderRatio { male: 0.0, female: 100.0 });
    }

    #[test]
    fn test_gendered_codes_sum_to_hundred() {
        for code in 0..=8 {
            let ratio = gender_ratio(code);
            assert_eq!(ratio.male + ratio.female, 100.0, "code {code}");
            assert!(!ratio.is_genderless());
        }
    }

    #[test]
    fn test_out_of_range_is_genderless() {
        for code in [-5, -2, 9, 42, i32::MIN, i32::MAX] {
            assert_eq!(gender_ratio(code), GenderRatio::GENDERLESS, "code {code}");
        }
        assert!(gender_ratio(-1).is_genderless());
    }
}
