// File: crates/storyline-core/tests/narrative_toml.rs
// Purpose: Narrative files: index normalization, validation errors, anchor/option parsing, name resolution.

use storyline_core::narratives;
use storyline_core::{Anchor, ChartKind, Narrative, NarrativeError};

const ONE_BASED: &str = r#"
title = "Two steps"

[[scene]]
index = 2
title = "Second"
description = "later"
chart = "multi_line"
dataset = { id = "growth_trends" }

[[scene]]
index = 1
title = "First"
chart = "categorical_bar"
dataset = { id = "renewables_2020", columns = ["solar"], take = 5 }
options = { unit = " GW", sort_descending = true, highlight = ["China"] }

[[scene.annotation]]
text = "China leads"
anchor = { kind = "category", name = "China" }

[[scene.annotation]]
text = "Top left"
anchor = { kind = "relative", x = 0.1, y = 0.1 }
style = { color = "#e11d48", dx = 12.0 }
"#;

#[test]
fn one_based_indices_normalize_and_sort() {
    let n = Narrative::from_toml_str(ONE_BASED).unwrap();
    assert_eq!(n.title(), "Two steps");
    assert_eq!(n.len(), 2);
    let first = &n.scenes()[0];
    assert_eq!((first.index, first.title.as_str(), first.chart), (0, "First", ChartKind::CategoricalBar));
    assert_eq!(first.dataset.columns, vec!["solar".to_string()]);
    assert_eq!(first.dataset.take, Some(5));
    assert!(first.options.sort_descending);
    assert_eq!(first.options.unit, " GW");
    assert_eq!(n.scenes()[1].index, 1);
    assert_eq!(n.scenes()[1].description, "later");
}

#[test]
fn annotations_parse_tagged_anchors() {
    let n = Narrative::from_toml_str(ONE_BASED).unwrap();
    let anns = &n.scenes()[0].annotations;
    assert_eq!(anns[0].anchor, Anchor::Category { name: "China".into(), value: None });
    assert_eq!(anns[0].style.dy, -30.0);
    assert_eq!(anns[1].anchor, Anchor::Relative { x: 0.1, y: 0.1 });
    assert_eq!(anns[1].style.color.as_deref(), Some("#e11d48"));
    assert_eq!(anns[1].style.dx, 12.0);
}

#[test]
fn omitted_indices_follow_file_order() {
    let n = Narrative::from_toml_str(
        r#"
        [[scene]]
        title = "a"
        chart = "pie"
        dataset = { id = "co2_shares" }
        [[scene]]
        title = "b"
        chart = "single_line"
        dataset = { id = "temperature_anomaly", window = { start = "1940-01-01", end = "1980-12-31" } }
        "#,
    )
    .unwrap();
    let idx: Vec<usize> = n.scenes().iter().map(|s| s.index).collect();
    assert_eq!(idx, vec![0, 1]);
    assert!(n.scenes()[1].dataset.window.is_some());
}

#[test]
fn malformed_index_sets_are_rejected() {
    let mixed = r#"
        [[scene]]
        index = 0
        title = "a"
        chart = "pie"
        dataset = { id = "co2_shares" }
        [[scene]]
        title = "b"
        chart = "pie"
        dataset = { id = "co2_shares" }
    "#;
    assert!(matches!(Narrative::from_toml_str(mixed), Err(NarrativeError::MixedIndices)));

    let gap = r#"
        [[scene]]
        index = 0
        title = "a"
        chart = "pie"
        dataset = { id = "co2_shares" }
        [[scene]]
        index = 2
        title = "b"
        chart = "pie"
        dataset = { id = "co2_shares" }
    "#;
    assert!(matches!(Narrative::from_toml_str(gap), Err(NarrativeError::NonContiguous { .. })));

    assert!(matches!(Narrative::from_toml_str("title = \"nothing\""), Err(NarrativeError::Empty)));
    assert!(matches!(Narrative::from_toml_str("[[scene]]\ntitle = 3"), Err(NarrativeError::Toml(_))));
}

#[test]
fn programmatic_narratives_validate_too() {
    assert!(matches!(Narrative::new("none", vec![]), Err(NarrativeError::Empty)));
}

#[test]
fn names_resolve_to_builtins_and_files() {
    for name in narratives::names() {
        let n = Narrative::resolve(name).unwrap();
        assert!(!n.is_empty());
    }
    assert_eq!(narratives::renewables().unwrap().len(), 3);
    assert_eq!(narratives::outlook().unwrap().len(), 4);
    assert!(matches!(Narrative::resolve("nope"), Err(NarrativeError::UnknownBuiltin(_))));
    assert!(matches!(Narrative::resolve("missing/story.toml"), Err(NarrativeError::Io { .. })));

    let dir = std::path::PathBuf::from("target/test_out");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("two_steps.toml");
    std::fs::write(&path, ONE_BASED).unwrap();
    let n = Narrative::resolve(path.to_str().unwrap()).unwrap();
    assert_eq!(n.scenes()[0].title, "First");
}
