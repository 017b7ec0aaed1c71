//! Attendee name helpers.

/// Join names into an English list with an Oxford comma.
///
/// `[]` -> `""`, `[A]` -> `"A"`, `[A, B]` -> `"A and B"`,
/// `[A, B, C]` -> `"A, B, and C"`.
#[must_use]
pub fn format_names_list<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|n| n.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// The local part of an email address, used when no better name is known.
///
/// Returns the whole (trimmed) input when there is no `@`.
#[must_use]
pub fn name_from_email(email: &str) -> String {
    let email = email.trim();
    email.split('@').next().unwrap_or(email).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_list_shapes() {
        let empty: [&str; 0] = [];
        assert_eq!(format_names_list(&empty), "");
        assert_eq!(format_names_list(&["A"]), "A");
        assert_eq!(format_names_list(&["A", "B"]), "A and B");
        assert_eq!(format_names_list(&["A", "B", "C"]), "A, B, and C");
        assert_eq!(format_names_list(&["A", "B", "C", "D"]), "A, B, C, and D");
    }

    #[test]
    fn names_list_accepts_owned_strings() {
        let names = vec!["Ada".to_string(), "Grace".to_string()];
        assert_eq!(format_names_list(&names), "Ada and Grace");
    }

    #[test]
    fn email_local_part() {
        assert_eq!(name_from_email("ada@example.edu"), "ada");
        assert_eq!(name_from_email(" grace.hopper@navy.mil "), "grace.hopper");
        assert_eq!(name_from_email("no-at-sign"), "no-at-sign");
    }
}
