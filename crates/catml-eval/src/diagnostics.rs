//! Diagnostic types for conversion and evaluation errors.
//!
//! The evaluator never aggregates diagnostics itself; each violation is
//! reported exactly once, at the point of detection, through a
//! caller-supplied [`DiagnosticBuilder`] sink.

use text_size::TextRange;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    /// Error - the catalogue is invalid.
    Error,
    /// Warning - potential issue.
    Warning,
}

/// A diagnostic code identifying the type of diagnostic.
///
/// The string codes are consumed by downstream quick-fix tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // Evaluation errors (E200-E299)
    /// Value not convertible to the target type.
    InvalidConversion,
    /// Operator not defined for the operand kind pair.
    UnsupportedOperator,
    /// Division or remainder by integral zero.
    DivisionByZero,
    /// Literal text encodes a value outside its implied kind's range.
    LiteralOverflow,
    /// Malformed literal token.
    InvalidLiteral,

    // Conformance errors (E300-E399)
    /// Converted value outside the declared minimum/maximum.
    OutOfRange,
    /// Wrong character or string length.
    InvalidLength,
    /// Enumeration literal of a different enumeration.
    InvalidEnumLiteral,
    /// Collection literal supplies more elements than declared.
    ExcessElements,
    /// Designated initializer names the wrong field.
    InvalidFieldName,
    /// Collection literal required but a scalar was supplied.
    ExpectedCollection,
    /// Scalar required but a collection literal was supplied.
    ExpectedScalar,

    // Warnings (W001-W099)
    /// Collection literal supplies fewer elements than declared.
    PartialInitialization,
    /// Integer value silently matched an enumeration literal.
    ImplicitEnumConversion,
}

impl DiagnosticCode {
    /// Returns the string code (e.g., "E301").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            // Evaluation
            Self::InvalidConversion => "E201",
            Self::UnsupportedOperator => "E202",
            Self::DivisionByZero => "E203",
            Self::LiteralOverflow => "E204",
            Self::InvalidLiteral => "E205",
            // Conformance
            Self::OutOfRange => "E301",
            Self::InvalidLength => "E302",
            Self::InvalidEnumLiteral => "E303",
            Self::ExcessElements => "E304",
            Self::InvalidFieldName => "E305",
            Self::ExpectedCollection => "E306",
            Self::ExpectedScalar => "E307",
            // Warnings
            Self::PartialInitialization => "W001",
            Self::ImplicitEnumConversion => "W002",
        }
    }

    /// Returns the default severity for this diagnostic code.
    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            Self::InvalidConversion
            | Self::UnsupportedOperator
            | Self::DivisionByZero
            | Self::LiteralOverflow
            | Self::InvalidLiteral
            | Self::OutOfRange
            | Self::InvalidLength
            | Self::InvalidEnumLiteral
            | Self::ExcessElements
            | Self::InvalidFieldName
            | Self::ExpectedCollection
            | Self::ExpectedScalar => DiagnosticSeverity::Error,

            Self::PartialInitialization | Self::ImplicitEnumConversion => {
                DiagnosticSeverity::Warning
            }
        }
    }
}

/// Related information for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    /// The location of the related information.
    pub range: TextRange,
    /// The message.
    pub message: String,
}

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// The severity level.
    pub severity: DiagnosticSeverity,
    /// The source range where the diagnostic applies.
    pub range: TextRange,
    /// The diagnostic message.
    pub message: String,
    /// Related information (e.g., the violated bound's own position).
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    /// Creates a new diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            range,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            code,
            range,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            code,
            range,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Adds related information to the diagnostic.
    #[must_use]
    pub fn with_related(mut self, range: TextRange, message: impl Into<String>) -> Self {
        self.related.push(RelatedInfo {
            range,
            message: message.into(),
        });
        self
    }

    /// Returns true if this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        write!(
            f,
            "{severity}[{}]: {} (at {}..{})",
            self.code.code(),
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

/// Sink collecting diagnostics during validation.
///
/// Diagnostics are recorded synchronously, never buffered or retried.
#[derive(Debug, Default)]
pub struct DiagnosticBuilder {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBuilder {
    /// Creates a new diagnostic builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Adds an error.
    pub fn error(&mut self, code: DiagnosticCode, range: TextRange, message: impl Into<String>) {
        self.add(Diagnostic::error(code, range, message));
    }

    /// Adds a warning.
    pub fn warning(&mut self, code: DiagnosticCode, range: TextRange, message: impl Into<String>) {
        self.add(Diagnostic::warning(code, range, message));
    }

    /// Returns true if any errors have been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns the recorded diagnostics without consuming the builder.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the builder and returns the diagnostics.
    #[must_use]
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::error(
            DiagnosticCode::OutOfRange,
            TextRange::new(10.into(), 15.into()),
            "value 11 must be less than or equal to 10",
        );

        assert!(diag.is_error());
        assert_eq!(diag.code.code(), "E301");
    }

    #[test]
    fn test_diagnostic_builder() {
        let mut builder = DiagnosticBuilder::new();

        builder.error(
            DiagnosticCode::InvalidConversion,
            TextRange::new(0.into(), 10.into()),
            "cannot convert",
        );

        builder.warning(
            DiagnosticCode::PartialInitialization,
            TextRange::new(20.into(), 25.into()),
            "partial initialization",
        );

        let diagnostics = builder.finish();
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_warning_severity_default() {
        let diag = Diagnostic::new(
            DiagnosticCode::ImplicitEnumConversion,
            TextRange::new(0.into(), 1.into()),
            "use the literal instead",
        );
        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
    }
}
