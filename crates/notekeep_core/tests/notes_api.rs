use notekeep_core::api::{note_path, note_stats_path, NOTES_PATH};
use notekeep_core::db::open_db_in_memory;
use notekeep_core::{ListParams, NoteRequest, NoteService, NotesApi, SqliteNoteRepository};
use rusqlite::Connection;
use serde_json::Value;

fn notes_api(conn: &mut Connection) -> NotesApi<SqliteNoteRepository<'_>> {
    let repo = SqliteNoteRepository::try_new(conn).unwrap();
    NotesApi::new(NoteService::new(repo))
}

fn note_request(title: &str, text: &str, tags: &[&str]) -> NoteRequest {
    NoteRequest {
        id: None,
        title: Some(title.to_string()),
        text: Some(text.to_string()),
        tags: Some(tags.iter().map(|tag| tag.to_string()).collect()),
    }
}

#[test]
fn save_rejects_blank_fields_with_joined_message() {
    let mut conn = open_db_in_memory().unwrap();
    let mut api = notes_api(&mut conn);

    let err = api
        .save(NoteRequest {
            title: Some("   ".to_string()),
            ..NoteRequest::default()
        })
        .unwrap_err();
    assert_eq!(err.status, 400);
    assert_eq!(err.error, "Bad Request");
    assert_eq!(err.message, "title: must not be blank; text: must not be blank");
    assert_eq!(err.path, NOTES_PATH);
}

#[test]
fn save_validates_before_resolving_the_id() {
    let mut conn = open_db_in_memory().unwrap();
    let mut api = notes_api(&mut conn);

    let mut request = note_request("", "body", &[]);
    request.id = Some("not-a-uuid".to_string());
    let err = api.save(request).unwrap_err();
    assert_eq!(err.status, 400);
}

#[test]
fn save_with_unknown_or_malformed_id_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut api = notes_api(&mut conn);

    let mut malformed = note_request("Title", "body", &[]);
    malformed.id = Some("abc".to_string());
    let err = api.save(malformed).unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(err.message, "Note with id abc not found");

    let missing = uuid::Uuid::new_v4().to_string();
    let mut unknown = note_request("Title", "body", &[]);
    unknown.id = Some(missing.clone());
    let err = api.save(unknown).unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(err.message, format!("Note with id {missing} not found"));
}

#[test]
fn get_delete_and_stats_report_not_found_with_request_path() {
    let mut conn = open_db_in_memory().unwrap();
    let api = notes_api(&mut conn);
    let missing = uuid::Uuid::new_v4().to_string();

    let err = api.get(&missing).unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(err.path, note_path(&missing));

    let err = api.delete(&missing).unwrap_err();
    assert_eq!(err.status, 404);

    let err = api.stats(&missing).unwrap_err();
    assert_eq!(err.status, 404);
    assert_eq!(err.path, note_stats_path(&missing));
    assert_eq!(err.error, "Not Found");
}

#[test]
fn full_lifecycle_through_the_boundary() {
    let mut conn = open_db_in_memory().unwrap();
    let mut api = notes_api(&mut conn);

    let created = api
        .save(note_request("Plan", "ship it, ship it now", &["business", "IMPORTANT"]))
        .unwrap();
    let id = created.id.to_string();

    let loaded = api.get(&id).unwrap();
    assert_eq!(loaded, created);

    let stats = api.stats(&id).unwrap();
    assert_eq!(stats.pairs(), vec![("it", 2), ("ship", 2), ("now", 1)]);

    let mut update = note_request("Plan v2", "shipped", &[]);
    update.id = Some(id.clone());
    update.tags = None;
    let updated = api.save(update).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.tags.is_empty());

    api.delete(&id).unwrap();
    assert_eq!(api.get(&id).unwrap_err().status, 404);
}

#[test]
fn list_applies_defaults_and_tag_filter() {
    let mut conn = open_db_in_memory().unwrap();
    let mut api = notes_api(&mut conn);
    api.save(note_request("home", "x", &["PERSONAL"])).unwrap();
    api.save(note_request("work", "y", &["BUSINESS"])).unwrap();

    let all = api.list(&ListParams::default()).unwrap();
    assert_eq!(all.total_elements, 2);
    assert_eq!(all.size, 20);
    assert_eq!(all.page, 0);

    let personal = api
        .list(&ListParams {
            tags: vec!["personal".to_string()],
            ..ListParams::default()
        })
        .unwrap();
    assert_eq!(personal.total_elements, 1);
    assert_eq!(personal.content[0].title, "home");

    let err = api
        .list(&ListParams {
            size: Some(0),
            ..ListParams::default()
        })
        .unwrap_err();
    assert_eq!(err.status, 400);
    assert_eq!(err.message, "size: must be greater than 0");
}

#[test]
fn responses_serialize_to_external_shapes() {
    let mut conn = open_db_in_memory().unwrap();
    let mut api = notes_api(&mut conn);
    let created = api
        .save(note_request("Shape", "b a b", &["IMPORTANT"]))
        .unwrap();

    let details: Value = serde_json::to_value(&created).unwrap();
    assert_eq!(details["title"], "Shape");
    assert_eq!(details["tags"], serde_json::json!(["IMPORTANT"]));
    assert!(details["createdDate"].is_i64());
    assert!(details["id"].is_string());

    let page: Value = serde_json::to_value(api.list(&ListParams::default()).unwrap()).unwrap();
    assert_eq!(page["totalElements"], 1);
    assert_eq!(
        page["content"][0],
        serde_json::json!({
            "title": "Shape",
            "createdDate": created.created_at,
        })
    );

    // Entry order is part of the stats contract, so compare the raw text.
    let stats = serde_json::to_string(&api.stats(&created.id.to_string()).unwrap()).unwrap();
    assert_eq!(stats, r#"{"wordStats":{"b":2,"a":1}}"#);

    let err = serde_json::to_value(api.get("nope").unwrap_err()).unwrap();
    assert_eq!(err["status"], 404);
    assert_eq!(err["error"], "Not Found");
    assert_eq!(err["path"], "/api/notes/nope");
    assert!(err["timestamp"].is_i64());
}
