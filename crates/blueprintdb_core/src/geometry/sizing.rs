//! Label-driven node sizing.

const INHERITANCE_BASE_SIZE: f64 = 40.0;
const INHERITANCE_INCREMENT_PER_CHAR: f64 = 5.0;
const INHERITANCE_MAX_SIZE: f64 = 150.0;

/// Grows `base` by `increment` per label character, capped at `max`.
pub fn label_size(label: &str, base: f64, increment: f64, max: f64) -> f64 {
    let chars = label.chars().count() as f64;
    (base + chars * increment).min(max)
}

/// Diameter of an inheritance circle for the given label.
pub fn inheritance_diameter(label: &str) -> f64 {
    label_size(
        label,
        INHERITANCE_BASE_SIZE,
        INHERITANCE_INCREMENT_PER_CHAR,
        INHERITANCE_MAX_SIZE,
    )
}
