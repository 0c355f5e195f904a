use serde_json::json;
use tasklet_core::{NewTodo, Todo, TodoDraft, TodoPatch, TodoValidationError};
use uuid::Uuid;

#[test]
fn new_todo_defaults_to_incomplete_without_description() {
    let input = NewTodo::new("Buy milk");

    assert_eq!(input.title, "Buy milk");
    assert_eq!(input.description, None);
    assert!(!input.completed);
}

#[test]
fn into_draft_trims_fields_and_assigns_fresh_ids() {
    let first = NewTodo::new("  Buy milk  ")
        .with_description("  2 liters ")
        .with_completed(true)
        .into_draft()
        .unwrap();
    let second = NewTodo::new("Buy milk").into_draft().unwrap();

    assert_eq!(first.title, "Buy milk");
    assert_eq!(first.description.as_deref(), Some("2 liters"));
    assert!(first.completed);
    assert!(!first.id.is_nil());
    assert_ne!(first.id, second.id);
}

#[test]
fn into_draft_rejects_blank_title() {
    let err = NewTodo::new(" \t ").into_draft().unwrap_err();
    assert_eq!(err, TodoValidationError::EmptyTitle);
}

#[test]
fn todo_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let todo = Todo {
        id,
        title: "Buy milk".to_string(),
        description: None,
        completed: true,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_360_000,
    };

    let value = serde_json::to_value(&todo).unwrap();
    assert_eq!(value["id"], id.to_string());
    assert_eq!(value["title"], "Buy milk");
    assert!(value["description"].is_null());
    assert_eq!(value["completed"], true);
    assert_eq!(value["created_at"], 1_700_000_000_000_i64);
    assert_eq!(value["updated_at"], 1_700_000_360_000_i64);

    let decoded: Todo = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, todo);
}

#[test]
fn deserialize_rejects_out_of_bounds_title() {
    let value = json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "x".repeat(201),
        "description": null,
        "completed": false,
        "created_at": 1,
        "updated_at": 1
    });

    let err = serde_json::from_value::<Todo>(value).unwrap_err();
    assert!(
        err.to_string().contains("title is 201 characters"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_nil_id() {
    let value = json!({
        "id": Uuid::nil(),
        "title": "ok",
        "completed": false,
        "created_at": 1,
        "updated_at": 1
    });

    assert!(serde_json::from_value::<Todo>(value).is_err());
}

#[test]
fn record_and_draft_apply_identical_field_rules() {
    let cases = [
        (Uuid::nil(), "ok".to_string(), None, TodoValidationError::NilId),
        (Uuid::new_v4(), "   ".to_string(), None, TodoValidationError::EmptyTitle),
        (
            Uuid::new_v4(),
            "ok".to_string(),
            Some("d".repeat(1001)),
            TodoValidationError::DescriptionTooLong {
                length: 1001,
                max: 1000,
            },
        ),
    ];

    for (id, title, description, expected) in cases {
        let draft = TodoDraft {
            id,
            title: title.clone(),
            description: description.clone(),
            completed: false,
        };
        let todo = Todo {
            id,
            title,
            description,
            completed: false,
            created_at: 1,
            updated_at: 1,
        };
        assert_eq!(draft.validate().unwrap_err(), expected);
        assert_eq!(todo.validate().unwrap_err(), expected);
    }

    let valid = NewTodo::new("fine").into_draft().unwrap();
    assert!(valid.validate().is_ok());
}

#[test]
fn patch_distinguishes_missing_and_null_description() {
    let untouched: TodoPatch = serde_json::from_value(json!({ "completed": true })).unwrap();
    assert_eq!(untouched.description, None);
    assert_eq!(untouched.completed, Some(true));
    assert_eq!(untouched.title, None);

    let cleared: TodoPatch = serde_json::from_value(json!({ "description": null })).unwrap();
    assert_eq!(cleared.description, Some(None));

    let replaced: TodoPatch = serde_json::from_value(json!({ "description": "notes" })).unwrap();
    assert_eq!(replaced.description, Some(Some("notes".to_string())));
}

#[test]
fn patch_rejects_explicit_null_title() {
    let result = serde_json::from_value::<TodoPatch>(json!({ "title": null }));
    assert!(result.is_err());
}

#[test]
fn empty_patch_is_empty() {
    assert!(TodoPatch::default().is_empty());
    assert!(!TodoPatch::default().clear_description().is_empty());
}

#[test]
fn normalized_patch_trims_and_validates_supplied_fields_only() {
    let patch = TodoPatch::default()
        .with_title("  Walk dog ")
        .with_description(" around the park ");
    let normalized = patch.normalized().unwrap();
    assert_eq!(normalized.title.as_deref(), Some("Walk dog"));
    assert_eq!(
        normalized.description,
        Some(Some("around the park".to_string()))
    );
    assert_eq!(normalized.completed, None);

    let err = TodoPatch::default().with_title("").normalized().unwrap_err();
    assert_eq!(err, TodoValidationError::EmptyTitle);
}
