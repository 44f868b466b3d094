//! Maps storage failures to a small set of user-facing categories.
//! SQLSTATE codes are checked first; diagnostic text is the fallback.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintViolationKind {
    ForeignKey,
    InvalidNumber,
    NotNull,
    Unique,
    Syntax,
    Unexpected,
}

impl ConstraintViolationKind {
    pub fn message(self) -> &'static str {
        match self {
            ConstraintViolationKind::ForeignKey => {
                "The related item does not exist (check the tutor, pet or service)."
            }
            ConstraintViolationKind::InvalidNumber => {
                "A numeric field received text. Enter numbers only."
            }
            ConstraintViolationKind::NotNull => "A required field was not filled in.",
            ConstraintViolationKind::Unique => "A record with this data already exists.",
            ConstraintViolationKind::Syntax => {
                "Syntax error in the request (incorrect field or value)."
            }
            ConstraintViolationKind::Unexpected => {
                "Unexpected server error. Check the data and try again."
            }
        }
    }

    fn from_sqlstate(code: &str) -> Option<Self> {
        Some(match code {
            "23503" => ConstraintViolationKind::ForeignKey,
            "22P02" => ConstraintViolationKind::InvalidNumber,
            "23502" => ConstraintViolationKind::NotNull,
            "23505" => ConstraintViolationKind::Unique,
            "42601" => ConstraintViolationKind::Syntax,
            _ => return None,
        })
    }

    /// First match wins, in this order.
    fn from_text(message: &str) -> Self {
        const PATTERNS: &[(&str, ConstraintViolationKind)] = &[
            ("foreign key constraint", ConstraintViolationKind::ForeignKey),
            ("invalid input syntax for type integer", ConstraintViolationKind::InvalidNumber),
            ("violates not-null constraint", ConstraintViolationKind::NotNull),
            ("unique constraint", ConstraintViolationKind::Unique),
            ("syntax error", ConstraintViolationKind::Syntax),
        ];
        PATTERNS
            .iter()
            .find(|(needle, _)| message.contains(needle))
            .map(|(_, kind)| *kind)
            .unwrap_or(ConstraintViolationKind::Unexpected)
    }
}

/// Classify a storage failure by SQLSTATE when present, else by its message text.
pub fn classify(code: Option<&str>, message: &str) -> ConstraintViolationKind {
    code.and_then(ConstraintViolationKind::from_sqlstate)
        .unwrap_or_else(|| ConstraintViolationKind::from_text(message))
}

/// User-facing message for raw storage error text.
pub fn translate(raw: &str) -> &'static str {
    ConstraintViolationKind::from_text(raw).message()
}
