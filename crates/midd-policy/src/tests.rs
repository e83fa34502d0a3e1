//! Tests for policy documents, compilation and the decision point.

use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use midd_core::{MiddError, Variable};
use midd_test::policies::{ADULTS_TOML, ADULTS_YAML, CYCLE_YAML, HOSPITAL_YAML};
use rust_decimal::Decimal;

use super::*;

fn adults() -> Pdp {
    let document = PolicyDocument::from_yaml_str(ADULTS_YAML).unwrap();
    Pdp::from_document(&document, EngineConfig::default()).unwrap()
}

fn hospital() -> Pdp {
    let document = PolicyDocument::from_yaml_str(HOSPITAL_YAML).unwrap();
    Pdp::from_document(&document, EngineConfig::default()).unwrap()
}

fn hospital_request(kind: &str, clearance: i64, hour: i64) -> Request {
    Request::new()
        .with("resource.type", kind)
        .with("subject.clearance", clearance)
        .with("env.hour", hour)
}

fn compile(root: impl Into<PolicyChild>, config: &EngineConfig) -> Result<Pdp> {
    Pdp::new(&root.into(), None, config.clone())
}

// ============================================================================
// Values
// ============================================================================

mod values {
    use super::*;

    #[test]
    fn test_typed_reads_text() {
        let age = Scalar::from("42").typed("age", DataType::Integer).unwrap();
        assert_eq!(age, AttributeValue::Integer(42));

        let flag = Scalar::from("true").typed("flag", DataType::Boolean).unwrap();
        assert_eq!(flag, AttributeValue::Boolean(true));

        let price = Scalar::from("2.50").typed("price", DataType::Decimal).unwrap();
        assert_eq!(price, AttributeValue::Decimal(Decimal::from_str("2.5").unwrap()));
    }

    #[test]
    fn test_numbers_widen_to_decimal() {
        let from_int = Scalar::from(3).typed("x", DataType::Decimal).unwrap();
        assert_eq!(from_int, AttributeValue::Decimal(Decimal::from(3)));

        let from_float = Scalar::from(1.5).natural("x").unwrap();
        assert_eq!(from_float.data_type(), DataType::Decimal);
    }

    #[test]
    fn test_mismatch_names_both_types() {
        let err = Scalar::from(true).typed("age", DataType::Integer).unwrap_err();
        match err {
            PolicyError::TypeMismatch {
                attribute,
                expected,
                found,
            } => {
                assert_eq!(attribute, "age");
                assert_eq!(expected, DataType::Integer);
                assert_eq!(found, DataType::Boolean);
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_text_is_mismatch() {
        assert!(matches!(
            Scalar::from("old").typed("age", DataType::Integer),
            Err(PolicyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_ordering_within_kind() {
        assert!(AttributeValue::Integer(1) < AttributeValue::Integer(2));
        assert!(AttributeValue::from("a") < AttributeValue::from("b"));
    }

    #[test]
    fn test_display() {
        assert_eq!(AttributeValue::from("records").to_string(), "\"records\"");
        assert_eq!(AttributeValue::Integer(7).to_string(), "7");
        assert_eq!(DataType::Decimal.to_string(), "decimal");
    }
}

// ============================================================================
// Attribute mapper
// ============================================================================

mod mapping {
    use super::*;

    #[test]
    fn test_ids_follow_first_declaration() {
        let mut mapper = AttributeMapper::new();
        assert_eq!(mapper.declare("b", DataType::Integer).unwrap(), 0);
        assert_eq!(mapper.declare("a", DataType::String).unwrap(), 1);
        assert_eq!(mapper.declare("b", DataType::Integer).unwrap(), 0);

        assert_eq!(mapper.len(), 2);
        assert_eq!(mapper.attribute(1), Some("a"));
        assert_eq!(mapper.data_type("b"), Some(DataType::Integer));
        assert_eq!(mapper.variable("c"), None);

        let order: Vec<_> = mapper.iter().map(|(_, name, _)| name).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_convert() {
        let mapper = AttributeMapper::with_declarations([("age", DataType::Integer)]).unwrap();

        let present = mapper.convert("age", Some(&Scalar::from(30))).unwrap();
        assert_eq!(present, Variable::new(0, AttributeValue::Integer(30)));

        let missing = mapper.convert("age", None).unwrap();
        assert_eq!(missing, Variable::missing(0));
    }

    #[test]
    fn test_convert_rejects_unknown_and_mistyped() {
        let mapper = AttributeMapper::with_declarations([("age", DataType::Integer)]).unwrap();

        assert!(matches!(
            mapper.convert("height", Some(&Scalar::from(180))),
            Err(PolicyError::UnknownAttribute(name)) if name == "height"
        ));
        assert!(matches!(
            mapper.convert("age", Some(&Scalar::from(true))),
            Err(PolicyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_conflicting_declarations() {
        let result = AttributeMapper::with_declarations([
            ("age", DataType::Integer),
            ("age", DataType::Decimal),
        ]);
        assert!(matches!(result, Err(PolicyError::TypeMismatch { .. })));
    }
}

// ============================================================================
// Documents
// ============================================================================

mod documents {
    use super::*;

    #[test]
    fn test_yaml_and_toml_agree() {
        let yaml = PolicyDocument::from_yaml_str(ADULTS_YAML).unwrap();
        let toml = PolicyDocument::from_toml_str(ADULTS_TOML).unwrap();
        assert_eq!(yaml, toml);
    }

    #[test]
    fn test_adults_shape() {
        let document = PolicyDocument::from_yaml_str(ADULTS_YAML).unwrap();
        let PolicyChild::Policy(policy) = &document.root else {
            panic!("expected a policy at the root");
        };
        assert_eq!(policy.id, "adults");
        assert_eq!(policy.combining, Some(CombiningAlgorithm::FirstApplicable));
        assert_eq!(policy.rules.len(), 2);
        assert_eq!(policy.rules[0].effect, Effect::Permit);
        assert_eq!(
            policy.rules[0].condition,
            Some(Condition::Match(Match::at_least("subject.age", 18)))
        );
        assert!(policy.rules[1].target.is_empty());
        assert!(policy.rules[1].condition.is_none());
    }

    #[test]
    fn test_library_becomes_finder() {
        let document = PolicyDocument::from_yaml_str(HOSPITAL_YAML).unwrap();
        let finder = document.finder();
        assert_eq!(finder.len(), 1);
        assert!(finder.lookup("low-clearance").is_some());
        assert!(finder.lookup("does-not-exist").is_none());
    }

    #[test]
    fn test_declarations_fix_variable_order() {
        let document = PolicyDocument::from_yaml_str(HOSPITAL_YAML).unwrap();
        let mapper = document.mapper().unwrap();
        assert_eq!(mapper.variable("resource.type"), Some(0));
        assert_eq!(mapper.variable("subject.clearance"), Some(1));
        assert_eq!(mapper.variable("env.hour"), Some(2));
    }

    #[test]
    fn test_unknown_algorithm_is_parse_error() {
        let text = ADULTS_YAML.replace("first-applicable", "majority-vote");
        match PolicyDocument::from_yaml_str(&text) {
            Err(PolicyError::Parse(message)) => assert!(message.contains("majority-vote")),
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            PolicyDocument::from_yaml_str("root: [unclosed"),
            Err(PolicyError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            PolicyDocument::from_toml_file("/nonexistent/policy.toml"),
            Err(PolicyError::Io(_))
        ));
    }
}

// ============================================================================
// Compilation
// ============================================================================

mod compilation {
    use super::*;

    fn rule(id: &str, effect: Effect, condition: Option<Condition>) -> Rule {
        Rule {
            id: id.to_string(),
            effect,
            target: Target::default(),
            condition,
        }
    }

    fn policy(id: &str, combining: Option<CombiningAlgorithm>, rules: Vec<Rule>) -> Policy {
        Policy {
            id: id.to_string(),
            target: Target::default(),
            combining,
            rules,
        }
    }

    fn set(id: &str, children: Vec<PolicyChild>) -> PolicySet {
        PolicySet {
            id: id.to_string(),
            target: Target::default(),
            combining: None,
            children,
        }
    }

    fn adults_policy(combining: Option<CombiningAlgorithm>) -> Policy {
        policy(
            "adults",
            combining,
            vec![
                rule(
                    "allow",
                    Effect::Permit,
                    Some(Condition::Match(Match::at_least("age", 18))),
                ),
                rule("deny", Effect::Deny, None),
            ],
        )
    }

    fn decide(pdp: &Pdp, age: i64) -> Decision {
        pdp.evaluate(&Request::new().with("age", age)).decision
    }

    #[test]
    fn test_default_algorithm_applies() {
        let deny_first = compile(adults_policy(None), &EngineConfig::default()).unwrap();
        assert_eq!(decide(&deny_first, 30), Decision::Deny);

        let config = EngineConfig::default()
            .with_default_policy_combining(CombiningAlgorithm::PermitOverrides);
        let permit_first = compile(adults_policy(None), &config).unwrap();
        assert_eq!(decide(&permit_first, 30), Decision::Permit);
        assert_eq!(decide(&permit_first, 10), Decision::Deny);
    }

    #[test]
    fn test_declared_algorithm_wins() {
        let config = EngineConfig::default()
            .with_default_policy_combining(CombiningAlgorithm::DenyOverrides);
        let pdp = compile(
            adults_policy(Some(CombiningAlgorithm::FirstApplicable)),
            &config,
        )
        .unwrap();
        assert_eq!(decide(&pdp, 30), Decision::Permit);
        assert_eq!(decide(&pdp, 17), Decision::Deny);
    }

    #[test]
    fn test_type_taken_from_bounds() {
        let pdp = compile(adults_policy(None), &EngineConfig::default()).unwrap();
        assert_eq!(pdp.mapper().data_type("age"), Some(DataType::Integer));
    }

    #[test]
    fn test_unbounded_match_needs_declaration() {
        let root = policy(
            "p",
            None,
            vec![rule(
                "r",
                Effect::Permit,
                Some(Condition::Match(Match::any("age"))),
            )],
        );

        let err = compile(root.clone(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, PolicyError::Midd(MiddError::MissingType)));

        let mapper = AttributeMapper::with_declarations([("age", DataType::Integer)]).unwrap();
        let pdp = Pdp::with_mapper(&root.into(), None, mapper, EngineConfig::default()).unwrap();
        assert_eq!(decide(&pdp, 5), Decision::Permit);
    }

    #[test]
    fn test_bounds_of_different_kinds() {
        let root = policy(
            "p",
            None,
            vec![rule(
                "r",
                Effect::Permit,
                Some(Condition::Match(Match::between("age", 1, "ten"))),
            )],
        );
        assert!(matches!(
            compile(root, &EngineConfig::default()),
            Err(PolicyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_conflicting_match_types() {
        let root = policy(
            "p",
            None,
            vec![
                rule(
                    "by-name",
                    Effect::Permit,
                    Some(Condition::Match(Match::equals("id", "alice"))),
                ),
                rule(
                    "by-number",
                    Effect::Deny,
                    Some(Condition::Match(Match::at_least("id", 5))),
                ),
            ],
        );
        assert!(matches!(
            compile(root, &EngineConfig::default()),
            Err(PolicyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_never_applicable_rule_is_skipped() {
        let impossible = Condition::All(vec![
            Condition::Match(Match::equals("age", 1)),
            Condition::Match(Match::equals("age", 2)),
        ]);
        let root = policy(
            "p",
            Some(CombiningAlgorithm::FirstApplicable),
            vec![
                rule("impossible", Effect::Deny, Some(impossible)),
                rule(
                    "adult",
                    Effect::Permit,
                    Some(Condition::Match(Match::at_least("age", 18))),
                ),
            ],
        );

        let pdp = compile(root.clone(), &EngineConfig::default()).unwrap();
        assert_eq!(decide(&pdp, 1), Decision::NotApplicable);
        assert_eq!(decide(&pdp, 20), Decision::Permit);

        let strict = EngineConfig::default().with_skip_non_transformable(false);
        let err = compile(root, &strict).unwrap_err();
        assert!(err.is_non_transformable());
    }

    #[test]
    fn test_any_condition() {
        let either = Condition::Any(vec![
            Condition::Match(Match::at_most("age", 12)),
            Condition::Match(Match::at_least("age", 65)),
        ]);
        let root = policy("p", None, vec![rule("discount", Effect::Permit, Some(either))]);
        let pdp = compile(root, &EngineConfig::default()).unwrap();

        assert_eq!(decide(&pdp, 10), Decision::Permit);
        assert_eq!(decide(&pdp, 70), Decision::Permit);
        assert_eq!(decide(&pdp, 30), Decision::NotApplicable);
    }

    #[test]
    fn test_exclusive_bounds() {
        let teens = Match::between("age", 12, 20).exclusive_lower().exclusive_upper();
        let root = policy(
            "p",
            None,
            vec![rule("teen", Effect::Permit, Some(Condition::Match(teens)))],
        );
        let pdp = compile(root, &EngineConfig::default()).unwrap();

        assert_eq!(decide(&pdp, 12), Decision::NotApplicable);
        assert_eq!(decide(&pdp, 13), Decision::Permit);
        assert_eq!(decide(&pdp, 19), Decision::Permit);
        assert_eq!(decide(&pdp, 20), Decision::NotApplicable);
    }

    #[test]
    fn test_target_any_of_all_of() {
        let target = Target {
            any_of: vec![AnyOf {
                all_of: vec![
                    AllOf {
                        matches: vec![Match::equals("role", "doctor")],
                    },
                    AllOf {
                        matches: vec![
                            Match::equals("role", "nurse"),
                            Match::at_least("years", 5),
                        ],
                    },
                ],
            }],
        };
        let root = Policy {
            target,
            ..policy("p", None, vec![rule("allow", Effect::Permit, None)])
        };
        let pdp = compile(root, &EngineConfig::default()).unwrap();

        let ask = |role: &str, years: i64| {
            pdp.evaluate(&Request::new().with("role", role).with("years", years))
                .decision
        };
        assert_eq!(ask("doctor", 0), Decision::Permit);
        assert_eq!(ask("nurse", 6), Decision::Permit);
        assert_eq!(ask("nurse", 2), Decision::NotApplicable);
        assert_eq!(ask("porter", 10), Decision::NotApplicable);
    }

    #[test]
    fn test_never_applicable_target() {
        let root = Policy {
            target: Target::all([Match::equals("age", 1), Match::equals("age", 2)]),
            ..adults_policy(None)
        };
        let err = compile(root, &EngineConfig::default()).unwrap_err();
        assert!(err.is_non_transformable());
    }

    #[test]
    fn test_empty_policy_set() {
        let err = compile(set("empty", vec![]), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, PolicyError::EmptyPolicySet(id) if id == "empty"));
    }

    #[test]
    fn test_reference_without_finder_is_skipped() {
        let root = set(
            "s",
            vec![
                PolicyChild::Reference("elsewhere".to_string()),
                adults_policy(Some(CombiningAlgorithm::FirstApplicable)).into(),
            ],
        );
        let pdp = compile(root, &EngineConfig::default()).unwrap();
        assert_eq!(decide(&pdp, 20), Decision::Permit);
    }

    #[test]
    fn test_only_unresolved_references() {
        let root = set("s", vec![PolicyChild::Reference("elsewhere".to_string())]);
        let err = compile(root, &EngineConfig::default()).unwrap_err();
        assert!(err.is_non_transformable());
    }

    #[test]
    fn test_reference_through_finder() {
        let finder: InMemoryPolicyFinder =
            [PolicyChild::from(adults_policy(Some(CombiningAlgorithm::FirstApplicable)))]
                .into_iter()
                .collect();
        let root = set("s", vec![PolicyChild::Reference("adults".to_string())]);
        let pdp = Pdp::new(&root.into(), Some(&finder), EngineConfig::default()).unwrap();
        assert_eq!(decide(&pdp, 20), Decision::Permit);
        assert_eq!(decide(&pdp, 2), Decision::Deny);
    }

    #[test]
    fn test_reference_cycle() {
        let document = PolicyDocument::from_yaml_str(CYCLE_YAML).unwrap();
        let err = Pdp::from_document(&document, EngineConfig::default()).unwrap_err();
        assert!(matches!(err, PolicyError::Parse(message) if message.contains("loop")));
    }

    #[test]
    fn test_compiler_shares_nodes() {
        let mut mapper = AttributeMapper::new();
        let config = EngineConfig::default();
        let mut compiler = PolicyCompiler::new(&mut mapper, None, &config.compile);

        let first = compiler
            .compile_condition(&Condition::Match(Match::at_least("age", 18)))
            .unwrap();
        let second = compiler
            .compile_target(&Target::all([Match::at_least("age", 18)]))
            .unwrap();
        assert_eq!(first, second);
    }
}

// ============================================================================
// Decision point
// ============================================================================

mod decisions {
    use super::*;

    #[test]
    fn test_adults() {
        let pdp = adults();
        let ask = |age: i64| pdp.evaluate(&Request::new().with("subject.age", age));

        assert_eq!(ask(30), Response::ok(Decision::Permit));
        assert_eq!(ask(18), Response::ok(Decision::Permit));
        assert_eq!(ask(17), Response::ok(Decision::Deny));
    }

    #[test]
    fn test_toml_document_decides_the_same() {
        let document = PolicyDocument::from_toml_str(ADULTS_TOML).unwrap();
        let pdp = Pdp::from_document(&document, EngineConfig::default()).unwrap();
        let yaml = adults();

        for age in [0, 17, 18, 19, 99] {
            let request = Request::new().with("subject.age", age);
            assert_eq!(pdp.evaluate(&request), yaml.evaluate(&request), "age {}", age);
        }
    }

    #[test]
    fn test_text_values_are_converted() {
        let pdp = adults();
        let response = pdp.evaluate(&Request::new().with("subject.age", "30"));
        assert_eq!(response.decision, Decision::Permit);
    }

    #[test]
    fn test_missing_attribute_takes_unbounded_edge() {
        let pdp = adults();
        assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Deny);
        let empty = Request::new().with_missing("subject.age");
        assert_eq!(pdp.evaluate(&empty).decision, Decision::Deny);
    }

    #[test]
    fn test_unknown_attribute_is_processing_error() {
        let pdp = adults();
        let response = pdp.evaluate(&Request::new().with("subject.height", 180));

        assert_eq!(response.decision, Decision::Indeterminate);
        assert!(!response.is_ok());
        let Status::ProcessingError(message) = &response.status else {
            panic!("expected processing error");
        };
        assert!(message.contains("subject.height"));
    }

    #[test]
    fn test_mistyped_value_is_processing_error() {
        let pdp = adults();
        let response = pdp.evaluate(&Request::new().with("subject.age", "old"));
        assert_eq!(response.decision, Decision::Indeterminate);
        assert!(matches!(response.status, Status::ProcessingError(_)));
    }

    #[test]
    fn test_hospital() {
        let pdp = hospital();
        let ask = |kind: &str, clearance: i64, hour: i64| {
            pdp.evaluate(&hospital_request(kind, clearance, hour)).decision
        };

        assert_eq!(ask("records", 5, 10), Decision::Permit);
        assert_eq!(ask("records", 1, 10), Decision::Deny);
        assert_eq!(ask("records", 1, 22), Decision::Deny);
        assert_eq!(ask("records", 5, 18), Decision::NotApplicable);
        assert_eq!(ask("billing", 5, 10), Decision::NotApplicable);
    }

    #[test]
    fn test_hospital_missing_clearance() {
        let pdp = hospital();
        let request = Request::new()
            .with("resource.type", "records")
            .with("env.hour", 10);
        assert_eq!(pdp.evaluate(&request).decision, Decision::Deny);
    }

    #[test]
    fn test_request_from_yaml() {
        let request = Request::from_yaml_str(
            r#"
attributes:
  - id: subject.age
    value: 40
  - id: subject.nickname
"#,
        )
        .unwrap();
        assert_eq!(request.attributes.len(), 2);
        assert_eq!(request.attributes[0].value, Some(Scalar::Integer(40)));
        assert_eq!(request.attributes[1].value, None);
    }

    #[test]
    fn test_display_lists_variables() {
        let text = hospital().to_string();
        assert!(text.starts_with("x0 = resource.type (string)\n"));
        assert!(text.contains("x2 = env.hour (integer)"));
        assert!(text.contains("x0 in "));
        assert!(text.contains("Permit"));
    }

    #[test]
    fn test_count_nodes() {
        let pdp = adults();
        // One node on subject.age and the two decisions it leads to.
        assert_eq!(pdp.count_nodes(), 3);
        assert_eq!(pdp.diagram().depth(), 1);
    }

    fn policy_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("midd-policy-")
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_file() {
        let file = policy_file(ADULTS_YAML);
        let pdp = Pdp::load(file.path(), None).unwrap();

        let response = pdp.evaluate(&Request::new().with("subject.age", 21));
        assert_eq!(response.decision, Decision::Permit);
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let file = policy_file("root: [unclosed");
        assert!(matches!(
            Pdp::load(file.path(), None),
            Err(PolicyError::Parse(_))
        ));
    }
}

// ============================================================================
// Batches and threads
// ============================================================================

mod concurrency {
    use super::*;

    fn batch() -> Vec<Request> {
        (0..200)
            .map(|i| {
                let kind = if i % 7 == 0 { "billing" } else { "records" };
                hospital_request(kind, i % 6, i % 24)
            })
            .collect()
    }

    #[test]
    fn test_batch_keeps_order() {
        let pdp = hospital();
        let requests = batch();
        let expected: Vec<_> = requests.iter().map(|r| pdp.evaluate(r)).collect();

        assert_eq!(pdp.evaluate_batch(&requests), expected);
        assert_eq!(pdp.evaluate_batch(&requests[..10]), expected[..10].to_vec());
    }

    #[test]
    fn test_small_threshold_goes_parallel() {
        let document = PolicyDocument::from_yaml_str(HOSPITAL_YAML).unwrap();
        let config = EngineConfig::default().with_parallel_threshold(1);
        let pdp = Pdp::from_document(&document, config).unwrap();
        let sequential = hospital();

        let requests = batch();
        let expected: Vec<_> = requests.iter().map(|r| sequential.evaluate(r)).collect();
        assert_eq!(pdp.evaluate_batch(&requests), expected);
    }

    #[test]
    fn test_shared_across_threads() {
        let pdp = hospital();
        let permits = AtomicUsize::new(0);

        rayon::scope(|s| {
            for hour in 0..24 {
                let pdp = &pdp;
                let permits = &permits;
                s.spawn(move |_| {
                    let response = pdp.evaluate(&hospital_request("records", 5, hour));
                    if response.decision == Decision::Permit {
                        permits.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        // Hours 8 through 17.
        assert_eq!(permits.load(Ordering::SeqCst), 10);
    }
}
