use crate::engine::{diagnose, parse_document};
use crate::{Error, MatchResult, Rule, RuleSet, Selection, SymptomToken};

const FLU_CRITICAL: &str = "===\n1. [Fever=t, Critical=Yes]==>[Disease=Flu=t]<conf:(0.9)>\n";

const CLINIC: &str = "\
Attributes:
   Fever=t
   Cough=t
   Headache=t
   Rash=t
   Critical=Yes
   Critical=No
   Disease=Flu
   Disease=Cold
===
Apriori
=======
Best rules found:
===
 1. [Fever=t, Critical=Yes]: 12 ==> [Disease=Flu=t]: 11    <conf:(0.92)>
 2. [Cough=t]: 30 ==> [Disease=Cold=t]: 18    <conf:(0.6)>
 3. [Fever=t, Cough=t]: 20 ==> [Disease=Flu=t]: 12    <conf:(0.6)>
 4. [Headache=t]: 9 ==> [Disease=Migraine=t]: 8    <conf:(0.89)>
 5. [Rash=f]: 4 ==> [Disease=Measles=t]: 3    <conf:(0.75)>
 6. [Fever=t]: 40 ==> [Age=old]: 30    <conf:(0.75)>
";

fn ranked(text: &str, selection: &[&str]) -> Vec<(String, f64)> {
    let doc = parse_document(text);
    diagnose(&doc.rules, &Selection::new(selection.iter().copied()))
        .unwrap()
        .into_iter()
        .map(|MatchResult { diagnosis, confidence }| (diagnosis, confidence))
        .collect()
}

#[test]
fn only_the_last_segment_is_scanned_for_rules() {
    let text = "Attributes:\nFever=t\n===\n1. [Fever=t] ==> [Disease=Flu=t] <conf:(0.8)>\n===\n1. [Fever=t] ==> [Disease=Flu=t]: 10 ==> [Disease=Flu=t]: 8 <conf:(0.8)>\n";
    let doc = parse_document(text);

    assert_eq!(doc.rules.len(), 1);
    let rule = doc.rules.get(0).unwrap();
    assert_eq!(rule.antecedent().iter().map(SymptomToken::as_str).collect::<Vec<_>>(), vec!["Fever"]);
    assert_eq!(rule.consequent(), "Flu");
    assert_eq!(rule.confidence(), 0.8);
}

#[test]
fn critical_scenarios() {
    // (selection, expected ranking)
    let cases: Vec<(&[&str], Vec<(String, f64)>)> = vec![
        (&["Fever=t"][..], vec![]),
        (&["Fever=t", "Critical=Yes"][..], vec![("Flu".to_string(), 0.9)]),
        (&["Fever=t", "Critical=No"][..], vec![]),
        (&["Critical=Yes"][..], vec![]),
    ];

    for (selection, expected) in cases {
        assert_eq!(ranked(FLU_CRITICAL, selection), expected, "selection {:?}", selection);
    }
}

#[test]
fn results_are_ranked_by_confidence() {
    let text = "===\n1. [Cough=t] ==> [Disease=Cold=t] <conf:(0.6)>\n2. [Cough=t] ==> [Disease=Flu=t] <conf:(0.9)>\n";
    assert_eq!(ranked(text, &["Cough=t"]), vec![("Flu".to_string(), 0.9), ("Cold".to_string(), 0.6)]);
}

#[test]
fn empty_selection_returns_no_partial_result() {
    let doc = parse_document(FLU_CRITICAL);
    assert!(matches!(diagnose(&doc.rules, &Selection::default()), Err(Error::EmptySelection)));
}

#[test]
fn clinic_document_end_to_end() {
    let doc = parse_document(CLINIC);

    assert_eq!(doc.catalog.len(), 6);
    assert!(!doc.catalog.contains("Disease=Flu"));
    assert_eq!(doc.rules.len(), 4);
    assert_eq!(doc.metrics.candidates, 6);
    assert_eq!(doc.metrics.empty_antecedent, 1);
    assert_eq!(doc.metrics.missing_consequent, 1);

    let cases: Vec<(&[&str], Vec<(&str, f64)>)> = vec![
        (&["Fever=t", "Cough=t", "Critical=Yes"][..], vec![("Flu", 0.92), ("Cold", 0.6), ("Flu", 0.6)]),
        (&["Fever=t", "Cough=t", "Critical=No"][..], vec![("Cold", 0.6), ("Flu", 0.6)]),
        (&["Headache=t", "Cough=t"][..], vec![("Migraine", 0.89), ("Cold", 0.6)]),
        (&["Rash=t"][..], vec![]),
    ];

    for (selection, expected) in cases {
        let expected: Vec<(String, f64)> = expected.into_iter().map(|(d, c)| (d.to_string(), c)).collect();
        assert_eq!(ranked(CLINIC, selection), expected, "selection {:?}", selection);
    }
}

#[test]
fn parsing_is_deterministic() {
    let first = parse_document(CLINIC);
    let second = parse_document(CLINIC);
    assert_eq!(first.rules, second.rules);
    assert_eq!(first.catalog, second.catalog);
}

#[test]
fn repeated_queries_are_identical() {
    let doc = parse_document(CLINIC);
    let selection = Selection::new(["Fever=t", "Cough=t", "Critical=Yes"]);
    let first = diagnose(&doc.rules, &selection).unwrap();
    let second = diagnose(&doc.rules, &selection).unwrap();
    assert_eq!(format!("{:?}", first), format!("{:?}", second));
}

#[test]
fn widening_the_selection_never_loses_a_symptom_match() {
    let doc = parse_document(CLINIC);
    let symptoms = ["Fever=t", "Cough=t", "Headache=t", "Rash=t", "Critical=Yes"];

    let mut selection = Selection::default();
    let mut previously_matched: Vec<&Rule> = Vec::new();
    for symptom in symptoms {
        selection.insert(symptom);
        let matched: Vec<&Rule> =
            doc.rules.iter().filter(|rule| rule.antecedent().iter().all(|c| selection.satisfies(c))).collect();
        for rule in &previously_matched {
            assert!(matched.contains(rule), "{} stopped matching after adding {}", rule, symptom);
        }
        previously_matched = matched;
    }
    assert_eq!(previously_matched.len(), 4);
}

#[test]
fn equal_confidence_keeps_rule_set_order() {
    let rules: RuleSet = ["A", "B", "C", "D"]
        .into_iter()
        .map(|name| Rule::new([SymptomToken::new("Fever")], name, 0.5).unwrap())
        .chain([Rule::new([SymptomToken::new("Fever")], "Top", 0.7).unwrap()])
        .collect();

    let names: Vec<String> =
        diagnose(&rules, &Selection::new(["Fever=t"])).unwrap().into_iter().map(|r| r.diagnosis).collect();
    assert_eq!(names, vec!["Top", "A", "B", "C", "D"]);
}
