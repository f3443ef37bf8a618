//! Validation check modules.
//!
//! Each module performs one kind of check on a single entity; the visitors
//! below apply them across the whole tree.

mod business;
mod references;
mod required;
mod structural;

use icsr_model::{Icsr, Location, ValidationIssue};

use crate::rules::RuleSet;
use crate::walk::{Visitor, walk};

/// Type and format checks on every field, plus per-entity structural rules.
pub fn run_structural(icsr: &Icsr) -> Vec<ValidationIssue> {
    let mut visitor = StructuralVisitor::default();
    walk(icsr, &mut visitor);
    visitor.issues
}

/// Required fields and conditional business rules.
pub fn run_business(icsr: &Icsr) -> Vec<ValidationIssue> {
    let mut visitor = BusinessVisitor::default();
    walk(icsr, &mut visitor);
    visitor.issues
}

/// Drug-reaction matrix references.
pub fn run_references(icsr: &Icsr) -> Vec<ValidationIssue> {
    references::check(icsr)
}

#[derive(Default)]
struct StructuralVisitor {
    issues: Vec<ValidationIssue>,
}

impl Visitor for StructuralVisitor {
    fn visit<T: RuleSet>(&mut self, entity: &T, location: &Location) {
        // 1. Declared field types (lengths, dates, markers, null flavors)
        for field in entity.fields() {
            self.issues.extend(structural::check(&field, location));
        }

        // 2. Entity-level structural rules
        self.issues
            .extend(business::check(entity, T::STRUCTURAL, location, true));
    }
}

#[derive(Default)]
struct BusinessVisitor {
    issues: Vec<ValidationIssue>,
}

impl Visitor for BusinessVisitor {
    fn visit<T: RuleSet>(&mut self, entity: &T, location: &Location) {
        // 1. Unconditionally required fields
        self.issues
            .extend(required::check(&entity.fields(), location));

        // 2. Conditional requirements between sibling fields
        self.issues
            .extend(business::check(entity, T::RULES, location, false));
    }
}
