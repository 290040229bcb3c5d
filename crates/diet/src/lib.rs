//! Dietary classification for the platepix matching engine.
//!
//! The classifier decides whether free text describes something
//! vegetarian-safe. It is a fixed keyword heuristic, not a linguistic
//! model: strong keyword lists short-circuit the decision, and otherwise
//! two indicator vocabularies are scored by substring occurrence counts.
//! The function is pure and deterministic; given the same tables it must
//! reproduce the same decision byte-for-byte, because persisted match
//! documents were classified with it.

pub mod tables;

/// Classify free text as vegetarian-safe (`true`) or not (`false`).
///
/// Decision order:
/// 1. any strong non-vegetarian keyword ⇒ `false`;
/// 2. any strong vegetarian keyword ⇒ `true`;
/// 3. otherwise count substring occurrences against both indicator
///    lists — no hits on either side defaults to `true` (the safer,
///    more restrictive class for downstream filtering), and ties favor
///    vegetarian.
pub fn classify(text: &str) -> bool {
    let text = text.to_lowercase();

    if tables::STRONG_NON_VEG.iter().any(|kw| text.contains(kw)) {
        return false;
    }
    if tables::STRONG_VEG.iter().any(|kw| text.contains(kw)) {
        return true;
    }

    let veg = occurrence_count(&text, tables::VEG_INDICATORS);
    let non_veg = occurrence_count(&text, tables::NON_VEG_INDICATORS);

    if veg == 0 && non_veg == 0 {
        return true;
    }
    veg >= non_veg
}

/// Classify a meal from its name and optional description.
pub fn detect_meal_vegetarian(name: &str, description: &str) -> bool {
    classify(&format!("{name} {description}"))
}

/// Classify a catalog image from its url, display name, and description.
/// The url participates because asset paths frequently carry the dish
/// name when the display name does not.
pub fn detect_image_vegetarian(url: &str, name: &str, description: &str) -> bool {
    classify(&format!("{url} {name} {description}"))
}

fn occurrence_count(text: &str, table: &[&str]) -> usize {
    table.iter().map(|kw| text.matches(kw).count()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_non_veg_short_circuits() {
        assert!(!classify("Chicken Biryani"));
        assert!(!classify("Grilled Salmon with herbs"));
        assert!(!classify("Egg Curry"));
        assert!(!classify("mutton rogan josh"));
    }

    #[test]
    fn strong_veg_short_circuits() {
        assert!(classify("Vegan Buddha Bowl"));
        assert!(classify("Jain Thali"));
        assert!(classify("Sattvic meal of the day"));
    }

    #[test]
    fn non_veg_phrase_beats_vegetarian_substring() {
        // "non-vegetarian" contains "vegetarian"; the strong non-veg
        // check runs first and must win.
        assert!(!classify("Non-Vegetarian Combo"));
        assert!(!classify("non veg special"));
    }

    #[test]
    fn indicator_counting_decides_ambiguous_text() {
        assert!(classify("Dal Makhani"));
        assert!(classify("Paneer Butter Masala"));
        assert!(classify("Aloo Gobi with roti"));
        assert!(!classify("egg fried noodles"));
    }

    #[test]
    fn tie_favors_vegetarian() {
        // "eggplant" trips the counted "egg" indicator once and the
        // "eggplant" indicator once: a 1-1 tie that must stay vegetarian.
        assert!(classify("Eggplant"));
        assert!(classify("Eggplant Bharta"));
    }

    #[test]
    fn no_signal_defaults_to_vegetarian() {
        assert!(classify("Unknown Dish XYZ"));
        assert!(classify(""));
    }

    #[test]
    fn detect_meal_uses_name_and_description() {
        assert!(!detect_meal_vegetarian("Chicken Biryani", ""));
        assert!(detect_meal_vegetarian("Dal Makhani", ""));
        assert!(detect_meal_vegetarian("Unknown Dish XYZ", ""));
        assert!(!detect_meal_vegetarian(
            "Chef Special",
            "slow cooked prawn curry"
        ));
    }

    #[test]
    fn detect_image_uses_url_name_and_description() {
        assert!(!detect_image_vegetarian(
            "https://cdn.example.com/img/tandoori-chicken.jpg",
            "House Special",
            ""
        ));
        assert!(detect_image_vegetarian(
            "https://cdn.example.com/img/palak-paneer.jpg",
            "Palak Paneer",
            "cottage cheese in spinach gravy"
        ));
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("CHICKEN TIKKA"), classify("chicken tikka"));
        assert_eq!(classify("DaL MaKhAnI"), classify("dal makhani"));
    }

    #[test]
    fn classification_is_deterministic() {
        for _ in 0..3 {
            assert!(!classify("fish and chips"));
            assert!(classify("mango lassi"));
        }
    }
}
