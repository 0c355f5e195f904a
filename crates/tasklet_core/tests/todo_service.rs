use std::collections::HashSet;
use tasklet_core::db::open_db_in_memory;
use tasklet_core::{
    NewTodo, SqliteTodoRepository, TodoErrorKind, TodoListQuery, TodoPatch, TodoService,
    TodoServiceError, TodoValidationError,
};
use uuid::Uuid;

#[test]
fn create_returns_trimmed_persisted_record() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created = service
        .create_todo(NewTodo::new("  Buy milk ").with_description("\n2 liters\t"))
        .unwrap();

    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.description.as_deref(), Some("2 liters"));
    assert!(!created.completed);
    assert!(created.created_at > 0);
    assert_eq!(service.get_todo(created.id).unwrap(), Some(created));
}

#[test]
fn create_accepts_valid_boundary_inputs() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let title = "t".repeat(200);
    let description = format!(" {} ", "d".repeat(1000));
    let created = service
        .create_todo(
            NewTodo::new(title.as_str())
                .with_description(description.as_str())
                .with_completed(true),
        )
        .unwrap();

    assert_eq!(created.title, title);
    assert_eq!(created.description.as_deref(), Some(description.trim()));
    assert!(created.completed);

    let single = service.create_todo(NewTodo::new("x")).unwrap();
    assert_eq!(single.title, "x");
}

#[test]
fn create_rejects_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let blank = service.create_todo(NewTodo::new("   ")).unwrap_err();
    assert!(matches!(
        blank,
        TodoServiceError::InvalidInput(TodoValidationError::EmptyTitle)
    ));
    assert_eq!(blank.kind(), TodoErrorKind::InvalidInput);

    let too_long = service
        .create_todo(NewTodo::new("t".repeat(201)))
        .unwrap_err();
    assert_eq!(too_long.kind(), TodoErrorKind::InvalidInput);

    let long_description = service
        .create_todo(NewTodo::new("ok").with_description("d".repeat(1001)))
        .unwrap_err();
    assert_eq!(long_description.kind(), TodoErrorKind::InvalidInput);

    assert!(service
        .list_todos(&TodoListQuery::default())
        .unwrap()
        .is_empty());
}

#[test]
fn list_is_strictly_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let created: Vec<_> = (0..5)
        .map(|index| service.create_todo(NewTodo::new(format!("todo {index}"))).unwrap())
        .collect();

    let listed = service.list_todos(&TodoListQuery::default()).unwrap();
    let expected: Vec<_> = created.iter().rev().map(|todo| todo.id).collect();
    let actual: Vec<_> = listed.iter().map(|todo| todo.id).collect();
    assert_eq!(actual, expected);
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[test]
fn completed_filter_returns_subset_of_full_list() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    for index in 0..6 {
        service
            .create_todo(NewTodo::new(format!("todo {index}")).with_completed(index % 2 == 0))
            .unwrap();
    }

    let all: HashSet<_> = service
        .list_todos(&TodoListQuery::default())
        .unwrap()
        .into_iter()
        .map(|todo| todo.id)
        .collect();
    let done = service
        .list_todos(&TodoListQuery {
            completed: Some(true),
            limit: None,
        })
        .unwrap();

    assert_eq!(all.len(), 6);
    assert_eq!(done.len(), 3);
    assert!(done.iter().all(|todo| todo.completed));
    assert!(done.iter().all(|todo| all.contains(&todo.id)));
}

#[test]
fn get_unknown_id_is_absent_not_error() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    assert_eq!(service.get_todo(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn update_unknown_id_fails_and_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let existing = service.create_todo(NewTodo::new("keep")).unwrap();

    let missing = Uuid::new_v4();
    let err = service
        .update_todo(missing, &TodoPatch::default().with_title("new"))
        .unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(id) if id == missing));
    assert_eq!(err.kind(), TodoErrorKind::NotFound);

    let listed = service.list_todos(&TodoListQuery::default()).unwrap();
    assert_eq!(listed, vec![existing]);
}

#[test]
fn update_with_empty_title_is_rejected_and_title_kept() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service.create_todo(NewTodo::new("original")).unwrap();

    let err = service
        .update_todo(created.id, &TodoPatch::default().with_title(""))
        .unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::InvalidInput(TodoValidationError::EmptyTitle)
    ));

    let stored = service.get_todo(created.id).unwrap().unwrap();
    assert_eq!(stored.title, "original");
}

#[test]
fn update_is_partial_and_returns_updated_record() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service
        .create_todo(NewTodo::new("Plan trip").with_description("book hotel"))
        .unwrap();

    let updated = service
        .update_todo(created.id, &TodoPatch::default().with_title(" Plan holiday "))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.title, "Plan holiday");
    assert_eq!(updated.description.as_deref(), Some("book hotel"));
    assert!(!updated.completed);

    let cleared = service
        .update_todo(created.id, &TodoPatch::default().clear_description())
        .unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.title, "Plan holiday");
}

#[test]
fn empty_update_returns_current_record() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service.create_todo(NewTodo::new("same")).unwrap();

    let unchanged = service
        .update_todo(created.id, &TodoPatch::default())
        .unwrap();
    assert_eq!(unchanged, created);
}

#[test]
fn toggle_twice_restores_original_flag() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service
        .create_todo(NewTodo::new("flip").with_completed(true))
        .unwrap();

    let first = service.toggle_completed(created.id).unwrap();
    assert!(!first.completed);
    let second = service.toggle_completed(created.id).unwrap();
    assert_eq!(second.completed, created.completed);

    let err = service.toggle_completed(Uuid::new_v4()).unwrap_err();
    assert_eq!(err.kind(), TodoErrorKind::NotFound);
}

#[test]
fn delete_then_get_is_absent_and_second_delete_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service.create_todo(NewTodo::new("temporary")).unwrap();

    service.delete_todo(created.id).unwrap();
    assert_eq!(service.get_todo(created.id).unwrap(), None);

    let err = service.delete_todo(created.id).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(id) if id == created.id));
}

#[test]
fn buy_milk_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    service.create_todo(NewTodo::new("Older item")).unwrap();

    let record = service
        .create_todo(NewTodo::new("Buy milk").with_completed(false))
        .unwrap();
    assert_eq!(record.title, "Buy milk");

    let listed = service.list_todos(&TodoListQuery::default()).unwrap();
    assert_eq!(listed[0], record);

    let toggled = service.toggle_completed(record.id).unwrap();
    assert!(toggled.completed);

    service.delete_todo(record.id).unwrap();
    assert_eq!(service.get_todo(record.id).unwrap(), None);
}

#[test]
fn storage_faults_surface_as_persistence_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let created = service.create_todo(NewTodo::new("soon broken")).unwrap();

    conn.execute_batch("DROP TABLE todos;").unwrap();

    let err = service.get_todo(created.id).unwrap_err();
    assert_eq!(err.kind(), TodoErrorKind::Persistence);
    assert!(matches!(err, TodoServiceError::Persistence(_)));
}
