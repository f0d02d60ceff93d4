//! End-to-end flows over a small three-page layout fixture.

use layout_model::{BookmarkEntry, BookmarkSpec, FieldRef, ModelError, Report, Visual};
use serde_json::{json, Value};

fn visual_container(id: &str, kind: &str) -> Value {
    let config = format!(
        r#"{{"name":"{id}","layouts":[{{"id":0,"position":{{"x":1.0,"y":2.0,"z":0,"width":100.0,"height":50.0}}}}],"singleVisual":{{"visualType":"{kind}"}}}}"#
    );
    json!({"x": 1.0, "y": 2.0, "config": config, "filters": "[]"})
}

fn layout() -> Value {
    json!({
        "id": 0,
        "config": r#"{"version":"5.43"}"#,
        "sections": [
            {
                "name": "sectionCover",
                "displayName": "Cover",
                "ordinal": 0,
                "visualContainers": []
            },
            {
                "name": "sectionOverview",
                "displayName": "Overview",
                "ordinal": 2,
                "visualContainers": [
                    visual_container("v1", "card"),
                    visual_container("v2", "clusteredColumnChart")
                ]
            },
            {
                "name": "sectionDetail",
                "displayName": "Detail",
                "ordinal": 3,
                "visualContainers": [visual_container("v3", "slicer")]
            }
        ]
    })
}

#[test]
fn card_measure_assignment_lands_in_every_form() {
    let mut report = Report::from_layout_value(layout()).unwrap();
    let card = Visual::from_template("card").unwrap();
    let id = report.insert_visual("Overview", card).unwrap();

    let card = report.visual_by_id_mut(&id).unwrap();
    card.set("measure", FieldRef::new("Sales", "Total")).unwrap();

    let record = card.export().current;
    let single = &record["config"]["singleVisual"];
    assert_eq!(single["prototypeQuery"]["Select"][0]["Name"], json!("'Sales'[Total]"));
    assert_eq!(single["prototypeQuery"]["Select"][0]["Measure"]["Property"], json!("Total"));
    assert_eq!(single["prototypeQuery"]["From"][0]["Entity"], json!("Sales"));
    assert_eq!(single["projections"]["Values"][0]["queryRef"], json!("Sales.Total"));
}

#[test]
fn bookmark_on_one_page_targets_both_visuals() {
    let report = Report::from_layout_value(layout()).unwrap();
    let bookmark = report.build_bookmark("Show V1", &["v1"], &["v2"]).unwrap();

    assert_eq!(bookmark.page_id(), Some("sectionOverview"));
    assert_eq!(bookmark.target_ids(), ["v1".to_string(), "v2".to_string()]);
}

#[test]
fn cross_page_bookmark_is_rejected() {
    let report = Report::from_layout_value(layout()).unwrap();
    let err = report.build_bookmark("Bad", &["v1"], &["v3"]).unwrap_err();
    assert!(matches!(err, ModelError::AmbiguousPage));
}

#[test]
fn group_derives_page_and_concatenated_targets() {
    let report = Report::from_layout_value(layout()).unwrap();
    let specs = vec![
        BookmarkSpec {
            name: "Show V1".into(),
            show: vec!["v1".into()],
            hide: vec!["v2".into()],
        },
        BookmarkSpec {
            name: "Show V2".into(),
            show: vec!["v2".into()],
            hide: vec!["v1".into()],
        },
    ];
    let group = report.build_bookmark_group("Toggle", &specs).unwrap();

    assert_eq!(group.page_id().unwrap(), Some("sectionOverview".to_string()));
    // Concatenation of both children's target lists, duplicates kept.
    assert_eq!(
        group.target_visual_ids(),
        ["v1", "v2", "v2", "v1"].map(String::from)
    );
}

#[test]
fn duplicating_a_page_shifts_ordinals_and_refreshes_ids() {
    let mut report = Report::from_layout_value(layout()).unwrap();
    let new_page_id = report.duplicate_page("Overview").unwrap();

    assert_ne!(new_page_id, "sectionOverview");

    let summaries = report.page_summaries();
    let ordinal_of = |name: &str| {
        summaries
            .iter()
            .find(|p| p.display_name == name)
            .map(|p| p.ordinal)
            .unwrap()
    };
    assert_eq!(ordinal_of("Cover"), 0);
    assert_eq!(ordinal_of("Overview"), 2);
    assert_eq!(ordinal_of("Overview copy"), 3);
    // The page after the source shifted by one.
    assert_eq!(ordinal_of("Detail"), 4);

    let copies = report.visuals_on_page("Overview copy").unwrap();
    assert_eq!(copies.len(), 2);
    for copy in copies {
        assert!(!copy.id().is_empty());
        assert_ne!(copy.id(), "v1");
        assert_ne!(copy.id(), "v2");
    }
}

#[test]
fn unknown_visual_id_is_a_lookup_failure() {
    let report = Report::from_layout_value(layout()).unwrap();
    let err = report.visual_by_id("does-not-exist").unwrap_err();
    assert!(matches!(err, ModelError::VisualNotFound(id) if id == "does-not-exist"));
}

#[test]
fn duplicate_ids_are_tolerated_and_first_match_wins() {
    // The collection does not police id uniqueness; lookups return the
    // first match in document order.
    let mut doc = layout();
    let clash = visual_container("v1", "slicer");
    doc["sections"][2]["visualContainers"]
        .as_array_mut()
        .unwrap()
        .push(clash);

    let report = Report::from_layout_value(doc).unwrap();
    let hit = report.visual_by_id("v1").unwrap();
    assert_eq!(hit.kind(), "card");
    assert_eq!(hit.page_name(), Some("Overview"));
}

#[test]
fn full_persist_reload_cycle() {
    let mut report = Report::from_layout_value(layout()).unwrap();

    let slicer = Visual::from_template("dropdown-slicer").unwrap();
    let slicer_id = report.insert_visual("Detail", slicer).unwrap();
    report
        .visual_by_id_mut(&slicer_id)
        .unwrap()
        .set("field", FieldRef::new("Products", "Region"))
        .unwrap();

    let bookmark = report.build_bookmark("Focus V1", &["v1"], &["v2"]).unwrap();
    let bookmark_id = bookmark.id().to_string();
    report.insert_bookmark(&bookmark);

    let text = report.persist().unwrap();
    let reloaded = Report::from_layout_str(&text).unwrap();

    assert_eq!(reloaded.pages().len(), 3);
    assert_eq!(reloaded.visuals().len(), 4);
    let slicer = reloaded.visual_by_id(&slicer_id).unwrap();
    assert_eq!(slicer.get("field"), Some(&json!("Products.Region")));

    let entries = reloaded.bookmarks().unwrap();
    assert_eq!(entries.len(), 1);
    match &entries[0] {
        BookmarkEntry::Single(b) => {
            assert_eq!(b.id(), bookmark_id);
            assert_eq!(b.page_id(), Some("sectionOverview"));
        }
        BookmarkEntry::Group(_) => panic!("expected a leaf bookmark"),
    }
}

#[test]
fn stale_bookmark_reference_fails_on_parse_not_on_load() {
    let mut doc = layout();
    doc["config"] = json!(
        r#"{"version":"5.43","bookmarks":[{"displayName":"Stale","name":"Bookmark00","explorationState":{"version":"1.3","activeSection":"sectionOverview","sections":{}},"options":{"targetVisualNames":["gone"]}}]}"#
    );
    let report = Report::from_layout_value(doc).unwrap();
    // Summaries read the raw aggregate and still work.
    assert_eq!(report.bookmark_summaries().len(), 1);
    // Typed parsing resolves references and surfaces the miss.
    let err = report.bookmarks().unwrap_err();
    assert!(matches!(err, ModelError::VisualNotFound(id) if id == "gone"));
}

#[test]
fn visual_summaries_cover_pages_and_modes() {
    let mut report = Report::from_layout_value(layout()).unwrap();
    let all = report.visual_summaries(None).unwrap();
    assert_eq!(all.len(), 3);

    let overview = report.visual_summaries(Some("Overview")).unwrap();
    assert_eq!(overview.len(), 2);
    assert_eq!(overview[0].id, "v1");
    assert_eq!(overview[0].display_mode, "show");
    assert_eq!(overview[0].page_id, Some("sectionOverview".to_string()));
}
