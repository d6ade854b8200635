//! Case number generation

use chrono::{Datelike, Utc};

/// Generate a human-readable case number, `POSH-<year>-<6 digits>`.
///
/// The suffix is derived from the current clock; uniqueness is enforced by
/// the store's case id, not by this display number.
pub fn generate_case_number() -> String {
    let now = Utc::now();
    let suffix = (now.timestamp_millis() % 1_000_000).unsigned_abs();
    format!("POSH-{}-{:06}", now.year(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_number_format() {
        let number = generate_case_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "POSH");
        assert_eq!(parts[1].len(), 4);
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
