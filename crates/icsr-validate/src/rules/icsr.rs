use icsr_model::{Icsr, ReportType};

use super::{Rule, RuleSet};

impl RuleSet for Icsr {
    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "C.2.r.5",
            field: "c_2_r_primary_source_information",
            message: "C.2.r.5 is required for one and only one primary source",
            check: |icsr| {
                icsr.c_2_r_primary_source_information
                    .iter()
                    .filter(|source| source.c_2_r_5_primary_source_regulatory_purposes.is_some())
                    .count()
                    == 1
            },
        },
        Rule {
            id: "C.5.4",
            field: "c_5_study_identification",
            message: "C.5.4 is required if C.1.3 is coded as report from study",
            check: |icsr| {
                let from_study = icsr
                    .c_1_identification_case_safety_report
                    .as_ref()
                    .is_some_and(|c_1| c_1.c_1_3_type_report == Some(ReportType::ReportFromStudy));
                let study_type = icsr
                    .c_5_study_identification
                    .as_ref()
                    .and_then(|c_5| c_5.c_5_4_study_type_reaction);
                !from_study || study_type.is_some()
            },
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsr_model::{
        CaseIdentification, PrimarySource, RegulatoryPurpose, StudyIdentification, StudyType,
    };

    fn failing<T: RuleSet>(entity: &T) -> Vec<&'static str> {
        T::RULES
            .iter()
            .filter(|rule| !rule.holds(entity))
            .map(|rule| rule.id)
            .collect()
    }

    fn source(primary: bool) -> PrimarySource {
        PrimarySource {
            c_2_r_5_primary_source_regulatory_purposes: primary
                .then_some(RegulatoryPurpose::Primary),
            ..Default::default()
        }
    }

    fn icsr_with_sources(sources: Vec<PrimarySource>) -> Icsr {
        Icsr {
            c_2_r_primary_source_information: sources,
            ..Default::default()
        }
    }

    #[test]
    fn test_exactly_one_primary_source() {
        assert_eq!(failing(&icsr_with_sources(Vec::new())), vec!["C.2.r.5"]);
        assert_eq!(
            failing(&icsr_with_sources(vec![source(false), source(false)])),
            vec!["C.2.r.5"]
        );
        assert!(failing(&icsr_with_sources(vec![source(false), source(true)])).is_empty());
        assert_eq!(
            failing(&icsr_with_sources(vec![source(true), source(true)])),
            vec!["C.2.r.5"]
        );
    }

    #[test]
    fn test_study_type_required_for_study_reports() {
        let mut icsr = icsr_with_sources(vec![source(true)]);
        icsr.c_1_identification_case_safety_report = Some(CaseIdentification {
            c_1_3_type_report: Some(ReportType::ReportFromStudy),
            ..Default::default()
        });
        assert_eq!(failing(&icsr), vec!["C.5.4"]);

        icsr.c_5_study_identification = Some(StudyIdentification::default());
        assert_eq!(failing(&icsr), vec!["C.5.4"]);

        icsr.c_5_study_identification = Some(StudyIdentification {
            c_5_4_study_type_reaction: Some(StudyType::ClinicalTrials),
            ..Default::default()
        });
        assert!(failing(&icsr).is_empty());

        // Spontaneous reports need no study section.
        let mut spontaneous = icsr_with_sources(vec![source(true)]);
        spontaneous.c_1_identification_case_safety_report = Some(CaseIdentification {
            c_1_3_type_report: Some(ReportType::Spontaneous),
            ..Default::default()
        });
        assert!(failing(&spontaneous).is_empty());
    }
}
