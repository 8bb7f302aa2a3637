//! Department lookup table
//!
//! Department codes are fixed two-digit strings. The table is closed: names
//! outside it are rejected before any other processing happens.

use crate::errors::{Result, SentinelError};

/// Department names and their codes, in code order.
pub const DEPARTMENTS: [(&str, &str); 18] = [
    ("Atlántida", "01"),
    ("Choluteca", "02"),
    ("Colón", "03"),
    ("Comayagua", "04"),
    ("Copán", "05"),
    ("Cortés", "06"),
    ("El Paraíso", "07"),
    ("Francisco Morazán", "08"),
    ("Gracias a Dios", "09"),
    ("Intibucá", "10"),
    ("Islas de la Bahía", "11"),
    ("La Paz", "12"),
    ("Lempira", "13"),
    ("Ocotepeque", "14"),
    ("Olancho", "15"),
    ("Santa Bárbara", "16"),
    ("Valle", "17"),
    ("Yoro", "18"),
];

/// Resolve a department name to its code.
///
/// Matching is exact (accents and case included).
///
/// ## Errors
///
/// Returns `SentinelError::UnknownDepartment` for names outside the table.
pub fn department_code(name: &str) -> Result<&'static str> {
    DEPARTMENTS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, code)| *code)
        .ok_or_else(|| SentinelError::UnknownDepartment {
            name: name.to_string(),
        })
}

/// Reverse lookup: code to department name.
pub fn department_name(code: &str) -> Option<&'static str> {
    DEPARTMENTS
        .iter()
        .find(|(_, known)| *known == code)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_contiguous_two_digit() {
        for (i, (_, code)) in DEPARTMENTS.iter().enumerate() {
            assert_eq!(*code, format!("{:02}", i + 1));
        }
    }

    #[test]
    fn test_known_department() {
        assert_eq!(department_code("Atlántida"), Ok("01"));
        assert_eq!(department_code("Yoro"), Ok("18"));
        assert_eq!(department_name("08"), Some("Francisco Morazán"));
    }

    #[test]
    fn test_unknown_department() {
        assert_eq!(
            department_code("Atlantis"),
            Err(SentinelError::UnknownDepartment {
                name: "Atlantis".to_string()
            })
        );
        // Unaccented spelling is not in the table
        assert!(department_code("Atlantida").is_err());
        assert_eq!(department_name("19"), None);
    }
}
