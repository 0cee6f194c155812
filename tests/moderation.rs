//! Moderation Integration Tests
//!
//! Tests for filing requests/issues, approval, task counters and what
//! happens to logs when accounts go away.

use lesspy::domain::{
    ContentKind, ContentRef, NewFunction, NewLibrary, NewRequest, ProfileId, RequestFilter,
    RequestType,
};
use lesspy::{Function, Store, StoreError};

struct Fixture {
    store: Store,
    u1: ProfileId,
    u2: ProfileId,
    library: i64,
    function: Function,
}

/// os / os.path.join created by u1; u2 is a second user
fn fixture() -> Fixture {
    let mut store = Store::open_in_memory().unwrap();
    let a1 = store.create_account("u1").unwrap();
    let u1 = store.create_profile(a1.id, "One").unwrap().id;
    let a2 = store.create_account("u2").unwrap();
    let u2 = store.create_profile(a2.id, "Two").unwrap().id;

    let library = store
        .create_library(
            NewLibrary {
                name: "os".to_string(),
                description: "Miscellaneous operating system interfaces".to_string(),
            },
            u1,
        )
        .unwrap()
        .id;
    let function = store
        .create_function(
            NewFunction {
                library,
                name: "os.path.join".to_string(),
                description: "Join one or more path segments".to_string(),
                example: String::new(),
                instance: "os.path.join(path, *paths)".to_string(),
                tag: None,
            },
            u1,
        )
        .unwrap();

    Fixture {
        store,
        u1,
        u2,
        library,
        function,
    }
}

fn issue(target: ContentRef, subject: &str) -> NewRequest {
    NewRequest {
        target,
        request_type: RequestType::Issue,
        subject: subject.to_string(),
        solution: "use pathlib instead".to_string(),
        note: String::new(),
    }
}

#[test]
fn test_function_request_approval_flow() {
    let mut f = fixture();
    let target = ContentRef::function(f.function.id);

    let log = f.store.file_request(issue(target, "bug"), f.u2).unwrap();
    assert!(!log.confirmed);
    assert_eq!(log.approver, None);
    assert_eq!(log.creator, Some(f.u2));
    assert_eq!(log.target, target);
    assert_eq!(log.request_type, RequestType::Issue);

    let approved = f.store.approve(log.id, f.u1).unwrap();
    assert!(approved.confirmed);
    assert_eq!(approved.approver, Some(f.u1));
    assert_eq!(approved.subject, "bug");

    // Function unaffected
    let function: Function = f.store.get(f.function.id).unwrap();
    assert_eq!(function, f.function);
}

#[test]
fn test_reapprove_by_same_approver_is_noop() {
    let mut f = fixture();
    let log = f
        .store
        .file_request(issue(ContentRef::library(f.library), "typo"), f.u2)
        .unwrap();

    let first = f.store.approve(log.id, f.u1).unwrap();
    let second = f.store.approve(log.id, f.u1).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_reapprove_by_other_approver_rejected() {
    let mut f = fixture();
    let log = f
        .store
        .file_request(issue(ContentRef::library(f.library), "typo"), f.u2)
        .unwrap();
    f.store.approve(log.id, f.u1).unwrap();

    let err = f.store.approve(log.id, f.u2).unwrap_err();
    assert!(matches!(
        err,
        StoreError::AlreadyConfirmed { id, approver } if id == log.id && approver == Some(f.u1)
    ));

    // Approver stays the first one
    assert_eq!(f.store.get_request(log.id).unwrap().approver, Some(f.u1));
}

#[test]
fn test_approve_missing_request() {
    let mut f = fixture();
    let err = f.store.approve(404, f.u1).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_request_against_missing_target_rejected() {
    let mut f = fixture();
    let err = f
        .store
        .file_request(issue(ContentRef::function(999), "bug"), f.u2)
        .unwrap_err();
    assert!(err.field_errors().unwrap().contains("function"));
}

#[test]
fn test_subject_is_bounded() {
    let mut f = fixture();
    let target = ContentRef::library(f.library);

    let err = f
        .store
        .file_request(issue(target, &"x".repeat(41)), f.u2)
        .unwrap_err();
    assert!(err.field_errors().unwrap().contains("subject"));

    let err = f.store.file_request(issue(target, ""), f.u2).unwrap_err();
    assert!(err.field_errors().unwrap().contains("subject"));

    assert!(f.store.file_request(issue(target, &"x".repeat(40)), f.u2).is_ok());
}

#[test]
fn test_task_counter_follows_requests() {
    let mut f = fixture();
    let target = ContentRef::function(f.function.id);
    assert!(!f.store.has_task(f.u1).unwrap());

    let first = f.store.file_request(issue(target, "one"), f.u2).unwrap();
    let second = f.store.file_request(issue(target, "two"), f.u2).unwrap();
    assert_eq!(f.store.profile(f.u1).unwrap().task, 2);

    f.store.approve(first.id, f.u1).unwrap();
    // A repeated approval does not decrement again
    f.store.approve(first.id, f.u1).unwrap();
    assert_eq!(f.store.profile(f.u1).unwrap().task, 1);

    f.store.approve(second.id, f.u1).unwrap();
    assert!(!f.store.has_task(f.u1).unwrap());
}

#[test]
fn test_deleting_content_releases_pending_tasks() {
    let mut f = fixture();
    let library = ContentRef::library(f.library);
    let function = ContentRef::function(f.function.id);

    let approved = f.store.file_request(issue(function, "one"), f.u2).unwrap();
    f.store.file_request(issue(function, "two"), f.u2).unwrap();
    f.store.file_request(issue(library, "three"), f.u2).unwrap();
    f.store.approve(approved.id, f.u1).unwrap();
    assert_eq!(f.store.profile(f.u1).unwrap().task, 2);

    let report = f.store.delete(library).unwrap();
    assert_eq!(report.requests, 3);
    assert_eq!(f.store.profile(f.u1).unwrap().task, 0);
    assert!(!f.store.has_task(f.u1).unwrap());
}

#[test]
fn test_deleting_child_releases_only_its_tasks() {
    let mut f = fixture();
    f.store
        .file_request(issue(ContentRef::function(f.function.id), "one"), f.u2)
        .unwrap();
    f.store
        .file_request(issue(ContentRef::library(f.library), "two"), f.u2)
        .unwrap();

    f.store.delete(ContentRef::function(f.function.id)).unwrap();
    assert_eq!(f.store.profile(f.u1).unwrap().task, 1);
}

#[test]
fn test_list_requests_filters() {
    let mut f = fixture();
    let lib = f
        .store
        .file_request(issue(ContentRef::library(f.library), "lib"), f.u2)
        .unwrap();
    let func = f
        .store
        .file_request(issue(ContentRef::function(f.function.id), "func"), f.u2)
        .unwrap();
    f.store.approve(lib.id, f.u1).unwrap();

    let pending = f.store.list_requests(&RequestFilter::pending()).unwrap();
    assert_eq!(pending.iter().map(|l| l.id).collect::<Vec<_>>(), vec![func.id]);

    let by_kind = f
        .store
        .list_requests(&RequestFilter {
            kind: Some(ContentKind::Library),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_kind.len(), 1);
    assert!(by_kind[0].confirmed);

    let for_function = f
        .store
        .list_requests(&RequestFilter::for_target(ContentRef::function(f.function.id)))
        .unwrap();
    assert_eq!(for_function.len(), 1);
    assert_eq!(for_function[0].subject, "func");
}

#[test]
fn test_account_deletion_nulls_creator_and_approver() {
    let mut f = fixture();
    let log = f
        .store
        .file_request(issue(ContentRef::function(f.function.id), "bug"), f.u2)
        .unwrap();
    f.store.approve(log.id, f.u1).unwrap();

    let a1 = f.store.account_by_username("u1").unwrap();
    let a2 = f.store.account_by_username("u2").unwrap();
    f.store.delete_account(a1.id).unwrap();
    f.store.delete_account(a2.id).unwrap();

    let kept = f.store.get_request(log.id).unwrap();
    assert!(kept.confirmed);
    assert_eq!(kept.creator, None);
    assert_eq!(kept.approver, None);

    let function: Function = f.store.get(f.function.id).unwrap();
    assert_eq!(function.creator, None);
}

#[test]
fn test_note_is_optional_and_stored() {
    let mut f = fixture();
    let mut new = issue(ContentRef::library(f.library), "docs");
    new.request_type = RequestType::Request;
    new.note = "see PEP 519".to_string();

    let log = f.store.file_request(new, f.u2).unwrap();
    assert_eq!(f.store.get_request(log.id).unwrap().note, "see PEP 519");
    assert_eq!(log.request_type, RequestType::Request);
}
