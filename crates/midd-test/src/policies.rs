//! Policy documents as YAML and TOML text.
//!
//! Kept as plain strings so this crate does not need the policy crate.

/// One policy over `subject.age`: adults are permitted, everyone else is
/// denied.
pub const ADULTS_YAML: &str = r#"
attributes:
  - id: subject.age
    data_type: integer
root:
  policy:
    id: adults
    combining: first-applicable
    rules:
      - id: allow-adults
        effect: permit
        condition:
          match: { attribute: subject.age, lower: 18 }
      - id: deny-rest
        effect: deny
"#;

/// Same as [`ADULTS_YAML`], in TOML.
pub const ADULTS_TOML: &str = r#"
[[attributes]]
id = "subject.age"
data_type = "integer"

[root.policy]
id = "adults"
combining = "first-applicable"

[[root.policy.rules]]
id = "allow-adults"
effect = "permit"

[root.policy.rules.condition.match]
attribute = "subject.age"
lower = 18

[[root.policy.rules]]
id = "deny-rest"
effect = "deny"
"#;

/// A set targeting the `records` resource, with two policies: staff on
/// shift are permitted, and a library policy denies anyone whose clearance
/// is below 3. Deny overrides.
pub const HOSPITAL_YAML: &str = r#"
attributes:
  - id: resource.type
    data_type: string
  - id: subject.clearance
    data_type: integer
  - id: env.hour
    data_type: integer
root:
  policy_set:
    id: hospital
    combining: deny-overrides
    target:
      any_of:
        - all_of:
            - matches:
                - { attribute: resource.type, equals: records }
    children:
      - policy:
          id: on-shift
          combining: permit-overrides
          rules:
            - id: day-shift
              effect: permit
              target:
                any_of:
                  - all_of:
                      - matches:
                          - { attribute: env.hour, lower: 8, upper: 18, upper_inclusive: false }
      - reference: low-clearance
      - reference: does-not-exist
library:
  - policy:
      id: low-clearance
      rules:
        - id: deny-low
          effect: deny
          condition:
            match: { attribute: subject.clearance, upper: 3, upper_inclusive: false }
"#;

/// A policy set that refers to itself.
pub const CYCLE_YAML: &str = r#"
root:
  reference: loop
library:
  - policy_set:
      id: loop
      children:
        - reference: loop
"#;
