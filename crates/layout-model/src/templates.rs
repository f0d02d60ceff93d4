//! Canned visual records, ready to clone.
//!
//! Each template is a complete record in its wire shape: layered fields hold
//! JSON text, exactly as they would after loading a document. Instantiation
//! clones the template and stamps a fresh identifier; the placeholder query
//! references (`Metrics.Value` and friends) are meant to be overwritten
//! through the field-reference attributes.

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::error::ModelError;

/// Clone the canned record registered under `name`.
pub fn template(name: &str) -> Result<Value, ModelError> {
    templates()
        .get(name)
        .cloned()
        .ok_or_else(|| ModelError::TemplateNotFound(name.to_string()))
}

/// The names the template table is keyed by.
pub fn template_names() -> impl Iterator<Item = &'static str> {
    templates().keys().copied()
}

fn templates() -> &'static IndexMap<&'static str, Value> {
    static TEMPLATES: OnceLock<IndexMap<&'static str, Value>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        let mut t = IndexMap::new();
        t.insert("card", card());
        t.insert("list-slicer", slicer("'Basic'"));
        t.insert("dropdown-slicer", slicer("'Dropdown'"));
        t.insert("clustered-column", clustered_column());
        t.insert("bookmark-navigator", bookmark_navigator());
        t
    })
}

/// Serialize a structured value into its layered text form.
fn text(value: Value) -> Value {
    Value::String(serde_json::to_string(&value).unwrap())
}

fn card() -> Value {
    let config = json!({
        "name": "9fd11a99fdd4d2e146d5",
        "layouts": [{
            "id": 0,
            "position": {"x": 164.0, "y": 234.0, "z": 0, "width": 172.0, "height": 69.0, "tabOrder": 0}
        }],
        "singleVisual": {
            "visualType": "card",
            "projections": {"Values": [{"queryRef": "Metrics.Value"}]},
            "prototypeQuery": {
                "Version": 2,
                "From": [{"Name": "m", "Entity": "Metrics", "Type": 0}],
                "Select": [{
                    "Measure": {"Expression": {"SourceRef": {"Source": "m"}}, "Property": "Value"},
                    "Name": "Metrics.Value",
                    "NativeReferenceName": "Value"
                }]
            },
            "drillFilterOtherVisuals": true,
            "objects": {
                "labels": [{"properties": {"fontSize": {"expr": {"Literal": {"Value": "30D"}}}}}],
                "categoryLabels": [{"properties": {"show": {"expr": {"Literal": {"Value": "false"}}}}}]
            },
            "vcObjects": {
                "title": [{"properties": {
                    "show": {"expr": {"Literal": {"Value": "true"}}},
                    "text": {"expr": {"Literal": {"Value": "'Card title'"}}},
                    "alignment": {"expr": {"Literal": {"Value": "'center'"}}},
                    "fontSize": {"expr": {"Literal": {"Value": "10D"}}}
                }}]
            }
        }
    });
    let query = json!({
        "Commands": [{
            "SemanticQueryDataShapeCommand": {
                "Query": {
                    "Version": 2,
                    "From": [{"Name": "m", "Entity": "Metrics", "Type": 0}],
                    "Select": [{
                        "Measure": {"Expression": {"SourceRef": {"Source": "m"}}, "Property": "Value"},
                        "Name": "Metrics.Value",
                        "NativeReferenceName": "Value"
                    }]
                },
                "Binding": {
                    "Primary": {"Groupings": [{"Projections": [0]}]},
                    "DataReduction": {"DataVolume": 3, "Primary": {"Top": {}}},
                    "Version": 1
                },
                "ExecutionMetricsKind": 1
            }
        }]
    });
    let data_transforms = json!({
        "objects": {
            "labels": [{"properties": {"fontSize": {"expr": {"Literal": {"Value": "30D"}}}}}]
        },
        "projectionOrdering": {"Values": [0]},
        "queryMetadata": {
            "Select": [{"Restatement": "Value", "Name": "Metrics.Value", "Type": 1}]
        },
        "visualElements": [{"DataRoles": [{"Name": "Values", "Projection": 0, "isActive": false}]}],
        "selects": [{
            "displayName": "Value",
            "queryName": "Metrics.Value",
            "roles": {"Values": true},
            "type": {"category": null, "underlyingType": 259},
            "expr": {"Measure": {"Expression": {"SourceRef": {"Entity": "Metrics"}}, "Property": "Value"}}
        }]
    });
    json!({
        "x": 164.0, "y": 234.0, "z": 0, "width": 172.0, "height": 69.0,
        "config": text(config),
        "filters": "[]",
        "query": text(query),
        "dataTransforms": text(data_transforms)
    })
}

fn slicer(mode: &str) -> Value {
    let config = json!({
        "name": "0e27638a82c2796f899a",
        "layouts": [{
            "id": 0,
            "position": {"x": 440.0, "y": 151.0, "z": 1, "width": 216.0, "height": 127.0}
        }],
        "singleVisual": {
            "visualType": "slicer",
            "projections": {"Values": [{"queryRef": "Products.Category", "active": true}]},
            "prototypeQuery": {
                "Version": 2,
                "From": [{"Name": "p", "Entity": "Products", "Type": 0}],
                "Select": [{
                    "Column": {"Expression": {"SourceRef": {"Source": "p"}}, "Property": "Category"},
                    "Name": "Products.Category",
                    "NativeReferenceName": "Category"
                }]
            },
            "drillFilterOtherVisuals": true,
            "objects": {
                "data": [{"properties": {"mode": {"expr": {"Literal": {"Value": mode}}}}}],
                "header": [{"properties": {"show": {"expr": {"Literal": {"Value": "false"}}}}}]
            },
            "vcObjects": {
                "title": [{"properties": {
                    "show": {"expr": {"Literal": {"Value": "true"}}},
                    "text": {"expr": {"Literal": {"Value": "'Slicer title'"}}}
                }}]
            }
        }
    });
    let query = json!({
        "Commands": [{
            "SemanticQueryDataShapeCommand": {
                "Query": {
                    "Version": 2,
                    "From": [{"Name": "p", "Entity": "Products", "Type": 0}],
                    "Select": [{
                        "Column": {"Expression": {"SourceRef": {"Source": "p"}}, "Property": "Category"},
                        "Name": "Products.Category",
                        "NativeReferenceName": "Category"
                    }]
                },
                "Binding": {
                    "Primary": {"Groupings": [{"Projections": [0]}]},
                    "DataReduction": {"DataVolume": 3, "Primary": {"Window": {}}},
                    "IncludeEmptyGroups": true,
                    "Version": 1
                },
                "ExecutionMetricsKind": 1
            }
        }]
    });
    let data_transforms = json!({
        "objects": {
            "data": [{"properties": {"mode": {"expr": {"Literal": {"Value": mode}}}}}]
        },
        "projectionOrdering": {"Values": [0]},
        "projectionActiveItems": {
            "Values": [{"queryRef": "Products.Category", "suppressConcat": false}]
        },
        "queryMetadata": {
            "Select": [{"Restatement": "Category", "Name": "Products.Category", "Type": 2048}]
        },
        "visualElements": [{"DataRoles": [{"Name": "Values", "Projection": 0, "isActive": true}]}],
        "selects": [{
            "displayName": "Category",
            "queryName": "Products.Category",
            "roles": {"Values": true},
            "type": {"category": null, "underlyingType": 1},
            "expr": {"Column": {"Expression": {"SourceRef": {"Entity": "Products"}}, "Property": "Category"}}
        }]
    });
    json!({
        "x": 440.0, "y": 151.0, "z": 1, "width": 216.0, "height": 127.0,
        "config": text(config),
        "filters": "[]",
        "query": text(query),
        "dataTransforms": text(data_transforms)
    })
}

fn clustered_column() -> Value {
    let config = json!({
        "name": "733f05ad4b953004ae44",
        "layouts": [{
            "id": 0,
            "position": {"x": 698.0, "y": 145.0, "z": 3, "width": 531.0, "height": 288.0}
        }],
        "singleVisual": {
            "visualType": "clusteredColumnChart",
            "projections": {
                "Category": [{"queryRef": "Calendar.Year", "active": true}],
                "Y": [{"queryRef": "Metrics.Value"}]
            },
            "prototypeQuery": {
                "Version": 2,
                "From": [
                    {"Name": "c", "Entity": "Calendar", "Type": 0},
                    {"Name": "m", "Entity": "Metrics", "Type": 0}
                ],
                "Select": [
                    {
                        "Column": {"Expression": {"SourceRef": {"Source": "c"}}, "Property": "Year"},
                        "Name": "Calendar.Year",
                        "NativeReferenceName": "Year"
                    },
                    {
                        "Measure": {"Expression": {"SourceRef": {"Source": "m"}}, "Property": "Value"},
                        "Name": "Metrics.Value",
                        "NativeReferenceName": "Value"
                    }
                ]
            },
            "drillFilterOtherVisuals": true,
            "objects": {
                "valueAxis": [{"properties": {"show": {"expr": {"Literal": {"Value": "false"}}}}}]
            },
            "vcObjects": {
                "title": [{"properties": {"text": {"expr": {"Literal": {"Value": "'Column title'"}}}}}]
            }
        }
    });
    let query = json!({
        "Commands": [{
            "SemanticQueryDataShapeCommand": {
                "Query": {
                    "Version": 2,
                    "From": [
                        {"Name": "c", "Entity": "Calendar", "Type": 0},
                        {"Name": "m", "Entity": "Metrics", "Type": 0}
                    ],
                    "Select": [
                        {
                            "Column": {"Expression": {"SourceRef": {"Source": "c"}}, "Property": "Year"},
                            "Name": "Calendar.Year",
                            "NativeReferenceName": "Year"
                        },
                        {
                            "Measure": {"Expression": {"SourceRef": {"Source": "m"}}, "Property": "Value"},
                            "Name": "Metrics.Value",
                            "NativeReferenceName": "Value"
                        }
                    ]
                },
                "Binding": {
                    "Primary": {"Groupings": [{"Projections": [0, 1]}]},
                    "DataReduction": {"DataVolume": 4, "Primary": {"Window": {"Count": 1000}}},
                    "Version": 1
                },
                "ExecutionMetricsKind": 1
            }
        }]
    });
    let data_transforms = json!({
        "objects": {
            "valueAxis": [{"properties": {"show": {"expr": {"Literal": {"Value": "false"}}}}}]
        },
        "projectionOrdering": {"Category": [0], "Y": [1]},
        "projectionActiveItems": {
            "Category": [{"queryRef": "Calendar.Year", "suppressConcat": false}]
        },
        "queryMetadata": {
            "Select": [
                {"Restatement": "Year", "Name": "Calendar.Year", "Type": 2048},
                {"Restatement": "Value", "Name": "Metrics.Value", "Type": 1}
            ]
        },
        "visualElements": [{"DataRoles": [
            {"Name": "Category", "Projection": 0, "isActive": true},
            {"Name": "Y", "Projection": 1, "isActive": false}
        ]}],
        "selects": [
            {
                "displayName": "Year",
                "queryName": "Calendar.Year",
                "roles": {"Category": true},
                "type": {"category": null, "underlyingType": 1},
                "expr": {"Column": {"Expression": {"SourceRef": {"Entity": "Calendar"}}, "Property": "Year"}}
            },
            {
                "displayName": "Value",
                "queryName": "Metrics.Value",
                "roles": {"Y": true},
                "type": {"category": null, "underlyingType": 259},
                "expr": {"Measure": {"Expression": {"SourceRef": {"Entity": "Metrics"}}, "Property": "Value"}}
            }
        ]
    });
    json!({
        "x": 698.0, "y": 145.0, "z": 3, "width": 531.0, "height": 288.0,
        "config": text(config),
        "filters": "[]",
        "query": text(query),
        "dataTransforms": text(data_transforms)
    })
}

fn bookmark_navigator() -> Value {
    let config = json!({
        "name": "07788b861426e801f4c7",
        "layouts": [{
            "id": 0,
            "position": {"x": 494.0, "y": 118.0, "z": 3000, "width": 260.0, "height": 49.0, "tabOrder": 11000}
        }],
        "singleVisual": {
            "visualType": "bookmarkNavigator",
            "drillFilterOtherVisuals": false,
            "objects": {
                "bookmarks": [{"properties": {
                    "bookmarkGroup": {"expr": {"Literal": {"Value": ""}}},
                    "selectedBookmark": {"expr": {"Literal": {"Value": ""}}}
                }}]
            }
        }
    });
    json!({
        "x": 494.0, "y": 118.0, "z": 3000, "width": 260.0, "height": 49.0,
        "tabOrder": 11000,
        "config": text(config),
        "filters": "[]"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layered;

    #[test]
    fn all_templates_have_textual_layers() {
        for name in template_names() {
            let record = template(name).unwrap();
            let map = record.as_object().unwrap();
            for field in layered::LAYERED_FIELDS {
                if let Some(value) = map.get(field) {
                    assert!(value.is_string(), "{name}.{field} should be wire text");
                }
            }
        }
    }

    #[test]
    fn templates_decode_cleanly() {
        for name in template_names() {
            let mut record = template(name).unwrap();
            layered::decode_record(&mut record).unwrap();
            assert!(record["config"]["name"].is_string(), "{name} config has no id");
        }
    }

    #[test]
    fn unknown_template_errors() {
        assert!(matches!(
            template("gauge"),
            Err(ModelError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn slicer_modes_differ() {
        let mut list = template("list-slicer").unwrap();
        let mut drop = template("dropdown-slicer").unwrap();
        layered::decode_record(&mut list).unwrap();
        layered::decode_record(&mut drop).unwrap();
        let mode = |v: &Value| {
            v["config"]["singleVisual"]["objects"]["data"][0]["properties"]["mode"]["expr"]
                ["Literal"]["Value"]
                .clone()
        };
        assert_eq!(mode(&list), serde_json::json!("'Basic'"));
        assert_eq!(mode(&drop), serde_json::json!("'Dropdown'"));
    }
}
