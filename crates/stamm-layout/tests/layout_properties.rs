use stamm_core::graph::{PersonId, ReferenceKind, Relation, RelationshipGraph};
use stamm_layout::{Cell, LayoutError, LayoutWarning, Position, layout};
use std::collections::{BTreeMap, HashSet};

fn s(id: &str) -> PersonId {
    id.to_string()
}

fn rel(parents: &[&str], spouse: Option<&str>) -> Relation {
    Relation::new(parents.iter().map(|p| s(p)).collect(), spouse.map(s))
}

/// Four persons: A and B married, C and D their children.
fn round_trip_family() -> RelationshipGraph {
    RelationshipGraph::new(
        ["A", "B", "C", "D"].map(s),
        [
            (s("C"), rel(&["A", "B"], None)),
            (s("D"), rel(&["A", "B"], None)),
            (s("A"), rel(&[], Some("B"))),
            (s("B"), rel(&[], Some("A"))),
        ],
    )
}

/// A larger acyclic tree with cross-generation marriages and dangling ids.
fn clan() -> (Vec<PersonId>, Vec<(PersonId, Relation)>) {
    let persons = [
        "anna", "bert", "carl", "dora", "emil", "frida", "gustav", "hanna", "ida", "jon",
    ]
    .map(s)
    .to_vec();
    let relations = vec![
        (s("anna"), rel(&[], Some("bert"))),
        (s("bert"), rel(&[], Some("anna"))),
        (s("carl"), rel(&["anna", "bert"], Some("dora"))),
        (s("dora"), rel(&["ghost"], Some("carl"))),
        (s("emil"), rel(&["carl", "dora"], Some("frida"))),
        (s("frida"), rel(&[], None)),
        (s("gustav"), rel(&["emil", "frida"], None)),
        (s("hanna"), rel(&["emil", "frida"], Some("anna"))),
        (s("ida"), rel(&["carl"], None)),
        (s("jon"), rel(&["ida", "nobody"], None)),
    ];
    (persons, relations)
}

#[test]
fn test_round_trip_scenario() {
    let result = layout(&round_trip_family()).unwrap();

    let expected: BTreeMap<PersonId, usize> =
        [(s("A"), 0), (s("B"), 0), (s("C"), 1), (s("D"), 1)].into();
    assert_eq!(result.levels, expected);

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0].cells, vec![Cell::Pair(s("A"), s("B"))]);
    assert_eq!(
        result.rows[1].cells,
        vec![Cell::Single(s("C")), Cell::Single(s("D"))]
    );

    let parent_pairs: Vec<(&str, &str)> = result
        .edges
        .parent_edges
        .iter()
        .map(|e| (e.from_id.as_str(), e.to_id.as_str()))
        .collect();
    assert_eq!(
        parent_pairs,
        vec![("A", "C"), ("B", "C"), ("A", "D"), ("B", "D")]
    );

    assert_eq!(result.edges.spouse_edges.len(), 1);
    let spouse = &result.edges.spouse_edges[0];
    assert_eq!((spouse.from, spouse.to), (Position::new(0, 0), Position::new(0, 1)));
    assert!(result.warnings.is_empty());
}

#[test]
fn test_three_generation_chain() {
    let graph = RelationshipGraph::new(
        ["A", "B", "C"].map(s),
        [(s("B"), rel(&["A"], None)), (s("C"), rel(&["B"], None))],
    );
    let result = layout(&graph).unwrap();
    assert_eq!(result.levels["A"], 0);
    assert_eq!(result.levels["B"], 1);
    assert_eq!(result.levels["C"], 2);
    assert_eq!(result.generations(), 3);
}

#[test]
fn test_asymmetric_spouse_scenario() {
    let graph = RelationshipGraph::new(["A", "B"].map(s), [(s("A"), rel(&[], Some("B")))]);
    let result = layout(&graph).unwrap();

    assert_eq!(result.edges.spouse_edges.len(), 1);
    assert_eq!(result.edges.spouse_edges[0].from_id, "A");
    assert_eq!(result.edges.spouse_edges[0].to_id, "B");
    assert_eq!(result.rows[0].cells, vec![Cell::Pair(s("A"), s("B"))]);
    let a = result.position("A").unwrap();
    let b = result.position("B").unwrap();
    assert_eq!(a.level, b.level);
    assert_eq!(b.slot, a.slot + 1);
}

#[test]
fn test_two_person_cycle_is_reported() {
    let graph = RelationshipGraph::new(
        ["A", "B"].map(s),
        [(s("A"), rel(&["B"], None)), (s("B"), rel(&["A"], None))],
    );
    let err = layout(&graph).unwrap_err();
    let LayoutError::CyclicAncestry { person, cycle } = &err;
    assert!(person == "A" || person == "B");
    assert_eq!(cycle.len(), 3);
    assert!(err.to_string().contains("cyclic ancestry"));
}

#[test]
fn test_dangling_parent_gets_level_zero_and_is_reported() {
    let graph = RelationshipGraph::new(["C"].map(s), [(s("C"), rel(&["ghost"], None))]);
    let result = layout(&graph).unwrap();
    assert_eq!(result.levels["C"], 0);
    assert!(result.edges.parent_edges.is_empty());
    assert_eq!(result.warnings.len(), 1);
    let LayoutWarning::DanglingReference(dangling) = &result.warnings[0] else {
        panic!("expected a dangling reference warning");
    };
    assert_eq!(dangling.person, "C");
    assert_eq!(dangling.reference, "ghost");
    assert_eq!(dangling.kind, ReferenceKind::Parent);
}

#[test]
fn test_self_spouse_is_warned() {
    let graph = RelationshipGraph::new(["A"].map(s), [(s("A"), rel(&[], Some("A")))]);
    let result = layout(&graph).unwrap();
    assert_eq!(
        result.warnings,
        vec![LayoutWarning::SelfSpouse { person: s("A") }]
    );
    assert!(result.edges.spouse_edges.is_empty());
}

#[test]
fn test_level_monotonicity_on_clan() {
    let (persons, relations) = clan();
    let graph = RelationshipGraph::new(persons, relations);
    let result = layout(&graph).unwrap();

    for (child, relation) in graph.relations() {
        for parent in &relation.parents {
            if graph.contains(parent) {
                assert!(
                    result.levels[child] > result.levels[parent],
                    "{child} must sit below {parent}"
                );
            }
        }
    }
    assert_eq!(result.levels["jon"], 3);
}

#[test]
fn test_slot_uniqueness_on_clan() {
    let (persons, relations) = clan();
    let result = layout(&RelationshipGraph::new(persons, relations)).unwrap();

    let mut seen = HashSet::new();
    for position in result.positions.values() {
        assert!(seen.insert(*position), "slot {position:?} used twice");
    }
    for row in &result.rows {
        let mut slots: Vec<usize> = result
            .positions
            .values()
            .filter(|p| p.level == row.level)
            .map(|p| p.slot)
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..row.width()).collect::<Vec<_>>());
    }
}

#[test]
fn test_mutual_spouses_in_same_row_are_adjacent() {
    let (persons, relations) = clan();
    let graph = RelationshipGraph::new(persons, relations);
    let result = layout(&graph).unwrap();

    for person in graph.persons() {
        let Some(spouse) = graph.spouse_of(person) else {
            continue;
        };
        if graph.spouse_of(spouse) != Some(person) {
            continue;
        }
        let (a, b) = (result.positions[person], result.positions[spouse]);
        if a.level == b.level {
            assert_eq!(a.slot.abs_diff(b.slot), 1, "{person} and {spouse}");
        }
    }
}

#[test]
fn test_earlier_one_sided_claim_keeps_couple_adjacent() {
    let graph = RelationshipGraph::new(
        ["a", "c", "m", "z"].map(s),
        [
            (s("a"), rel(&[], Some("c"))),
            (s("c"), rel(&[], Some("z"))),
            (s("z"), rel(&[], Some("c"))),
        ],
    );
    let result = layout(&graph).unwrap();
    let (c, z) = (result.positions["c"], result.positions["z"]);
    assert_eq!(c.slot.abs_diff(z.slot), 1);
    assert_eq!(result.rows[0].cells[0], Cell::Single(s("a")));
}

#[test]
fn test_clan_reports_every_dangling_reference() {
    let (persons, relations) = clan();
    let result = layout(&RelationshipGraph::new(persons, relations)).unwrap();
    let references: Vec<&str> = result
        .warnings
        .iter()
        .filter_map(|w| match w {
            LayoutWarning::DanglingReference(d) => Some(d.reference.as_str()),
            LayoutWarning::SelfSpouse { .. } => None,
        })
        .collect();
    assert_eq!(references, vec!["ghost", "nobody"]);
}

#[test]
fn test_layout_is_independent_of_input_order() {
    let (persons, relations) = clan();
    let forward = layout(&RelationshipGraph::new(persons.clone(), relations.clone())).unwrap();

    let mut persons_rev = persons;
    persons_rev.reverse();
    let mut relations_rev = relations;
    relations_rev.reverse();
    let backward = layout(&RelationshipGraph::new(persons_rev, relations_rev)).unwrap();

    assert_eq!(forward, backward);
}

#[test]
fn test_layout_serializes_to_json() {
    let result = layout(&round_trip_family()).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["levels"]["C"], 1);
    assert_eq!(json["positions"]["B"]["slot"], 1);
    assert_eq!(json["parent_edges"].as_array().unwrap().len(), 4);
    assert_eq!(json["spouse_edges"].as_array().unwrap().len(), 1);
    assert_eq!(json["rows"][0]["cells"][0]["pair"][1], "B");
}
