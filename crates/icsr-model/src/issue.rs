use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How far validation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    /// Type and format checks only; required fields may be absent.
    Structural,
    /// Structural checks, then required fields and conditional rules.
    #[default]
    Business,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Structural => "structural",
            ValidationLevel::Business => "business",
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(ValidationLevel::Structural),
            "business" => Ok(ValidationLevel::Business),
            other => Err(format!("unknown validation level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    StructuralType,
    BusinessRule,
    ReferentialIntegrity,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::StructuralType => "structural_type",
            IssueKind::BusinessRule => "business_rule",
            IssueKind::ReferentialIntegrity => "referential_integrity",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a location path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Field(String),
    Index(usize),
}

/// Path from the ICSR root to the offending field, e.g.
/// `g_k_drug_information[0].g_k_9_i_drug_reaction_matrix[1].g_k_9_i_1_reaction_assessed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Vec<Segment>);

impl Location {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    /// Shorthand for `field(name).index(index)`.
    pub fn item(&self, name: &str, index: usize) -> Self {
        self.field(name).index(index)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Field(name) if position == 0 => write!(f, "{name}")?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub location: Location,
    pub kind: IssueKind,
    pub message: String,
    /// Business rule identifier (e.g. "C.1.11.2"), when a named rule failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

impl ValidationIssue {
    pub fn new(location: Location, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            location,
            kind,
            message: message.into(),
            rule_id: None,
        }
    }

    pub fn structural(location: Location, message: impl Into<String>) -> Self {
        Self::new(location, IssueKind::StructuralType, message)
    }

    pub fn business(location: Location, message: impl Into<String>) -> Self {
        Self::new(location, IssueKind::BusinessRule, message)
    }

    pub fn referential(location: Location, message: impl Into<String>) -> Self {
        Self::new(location, IssueKind::ReferentialIntegrity, message)
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.location, self.kind, self.message)
    }
}

/// Validation outcome for one ICSR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub level: ValidationLevel,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new(level: ValidationLevel) -> Self {
        Self {
            level,
            issues: Vec::new(),
        }
    }

    /// Passed means no issue at the requested level.
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    pub fn structural_count(&self) -> usize {
        self.count(IssueKind::StructuralType)
    }

    pub fn business_count(&self) -> usize {
        self.count(IssueKind::BusinessRule)
    }

    pub fn referential_count(&self) -> usize {
        self.count(IssueKind::ReferentialIntegrity)
    }

    pub fn has_structural_errors(&self) -> bool {
        self.structural_count() > 0
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }
}
