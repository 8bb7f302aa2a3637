//! Subcommand implementations

pub mod export;
pub mod index;
pub mod ingest;
pub mod verify;

use sentinel_core::{department_code, department_name};

/// Accept either a department code (`"01"`) or a department name
/// (`"Atlántida"`) and return the code. Anything else is passed through for
/// the store to reject or treat as empty.
pub fn resolve_department(arg: &str) -> String {
    if department_name(arg).is_some() {
        return arg.to_string();
    }
    department_code(arg)
        .map(str::to_string)
        .unwrap_or_else(|_| arg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_department() {
        assert_eq!(resolve_department("01"), "01");
        assert_eq!(resolve_department("Atlántida"), "01");
        assert_eq!(resolve_department("Francisco Morazán"), "08");
        assert_eq!(resolve_department("99"), "99");
    }
}
