use icsr_model::ReactionEvent;

use super::{Rule, RuleSet, pair};

impl RuleSet for ReactionEvent {
    const STRUCTURAL: &'static [Rule<Self>] = &[Rule {
        id: "E.i.id",
        field: "uuid",
        message: "Both id and uuid cannot be specified",
        check: |reaction| reaction.id.is_none() || reaction.uuid.is_none(),
    }];

    const RULES: &'static [Rule<Self>] = &[
        Rule {
            id: "E.i.1.1",
            field: "e_i_1_1a_reaction_primary_source_native_language",
            message: "E.i.1.1a and E.i.1.1b must be provided together",
            check: |reaction| {
                pair(
                    &reaction.e_i_1_1a_reaction_primary_source_native_language,
                    &reaction.e_i_1_1b_reaction_primary_source_language,
                )
            },
        },
        Rule {
            id: "E.i.6",
            field: "e_i_6a_duration_reaction_num",
            message: "E.i.6a and E.i.6b must be provided together",
            check: |reaction| {
                pair(
                    &reaction.e_i_6a_duration_reaction_num,
                    &reaction.e_i_6b_duration_reaction_unit,
                )
            },
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn failing<T: RuleSet>(entity: &T) -> Vec<&'static str> {
        T::RULES
            .iter()
            .filter(|rule| !rule.holds(entity))
            .map(|rule| rule.id)
            .collect()
    }

    #[test]
    fn test_id_and_uuid_exclusive() {
        let [rule] = ReactionEvent::STRUCTURAL else {
            panic!("expected one structural rule");
        };
        let mut reaction = ReactionEvent {
            id: Some(1),
            ..Default::default()
        };
        assert!(rule.holds(&reaction));
        reaction.uuid = Some(Uuid::new_v4());
        assert!(!rule.holds(&reaction));
        reaction.id = None;
        assert!(rule.holds(&reaction));
    }

    #[test]
    fn test_native_language_pair() {
        let mut reaction = ReactionEvent {
            e_i_1_1a_reaction_primary_source_native_language: Some("Kopfschmerzen".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&reaction), vec!["E.i.1.1"]);
        reaction.e_i_1_1b_reaction_primary_source_language = Some("de".to_string());
        assert!(failing(&reaction).is_empty());

        let language_only = ReactionEvent {
            e_i_1_1b_reaction_primary_source_language: Some("de".to_string()),
            ..Default::default()
        };
        assert_eq!(failing(&language_only), vec!["E.i.1.1"]);
    }

    #[test]
    fn test_duration_pair() {
        assert!(failing(&ReactionEvent::default()).is_empty());

        let mut reaction = ReactionEvent {
            e_i_6a_duration_reaction_num: Some(3),
            ..Default::default()
        };
        assert_eq!(failing(&reaction), vec!["E.i.6"]);
        reaction.e_i_6b_duration_reaction_unit = Some("d".to_string());
        assert!(failing(&reaction).is_empty());

        reaction.e_i_6a_duration_reaction_num = None;
        assert_eq!(failing(&reaction), vec!["E.i.6"]);
    }
}
