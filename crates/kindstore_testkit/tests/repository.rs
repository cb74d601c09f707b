//! Repository CRUD, queries, and transaction guard behavior.

use kindstore_core::{CoreError, Datastore, Order, PageRequest, Repository};
use kindstore_storage::InMemoryDatastore;
use kindstore_testkit::{test_repository, Person, Task};
use std::sync::Arc;

fn store() -> Arc<dyn Datastore> {
    Arc::new(InMemoryDatastore::new())
}

fn task(title: &str, priority: i64, notes: Option<&str>) -> Task {
    Task {
        id: None,
        title: title.into(),
        priority,
        notes: notes.map(Into::into),
        ..Task::default()
    }
}

#[test]
fn save_assigns_identity_and_get_returns_field_equal_object() {
    let people: Repository<Person> = test_repository(store());

    let mut person = Person {
        name: "Ann".into(),
        email: "ann@example.com".into(),
        bio: Some("likes maps".into()),
        rating: Some("4.5".into()),
        ..Person::default()
    };
    assert_eq!(person.id, None);
    people.save(&mut person).unwrap();
    assert!(person.id.is_some());

    let found = people.get(person.id.unwrap()).unwrap().unwrap();
    assert_eq!(found, person);
}

#[test]
fn ordered_scan_translates_domain_field_to_storage_name() {
    let people: Repository<Person> = test_repository(store());
    for email in ["c@x.io", "a@x.io", "b@x.io"] {
        let mut person = Person {
            name: "p".into(),
            email: email.into(),
            ..Person::default()
        };
        people.save(&mut person).unwrap();
    }

    // "email" is stored under "email_address"; ordering by the domain
    // name must still work.
    let sorted = people.find_all_ordered(&Order::asc("email")).unwrap();
    let emails: Vec<_> = sorted.iter().map(|p| p.email.as_str()).collect();
    assert_eq!(emails, vec!["a@x.io", "b@x.io", "c@x.io"]);
}

#[test]
fn unindexed_field_is_invisible_to_sorted_scans() {
    let repo: Repository<Task> = test_repository(store());
    repo.save(&mut task("a", 2, Some("beta"))).unwrap();
    repo.save(&mut task("b", 1, Some("alpha"))).unwrap();

    // Sorting by an indexed field sees every task.
    let by_priority = repo.find_all_ordered(&Order::asc("priority")).unwrap();
    assert_eq!(by_priority.len(), 2);
    assert_eq!(by_priority[0].title, "b");

    // The same data sorted by the unindexed notes field matches nothing.
    let by_notes = repo.find_all_ordered(&Order::asc("notes")).unwrap();
    assert!(by_notes.is_empty());

    // The values themselves still round-trip.
    assert_eq!(by_priority[0].notes.as_deref(), Some("alpha"));
}

#[test]
fn iter_all_streams_the_scan() {
    let repo: Repository<Task> = test_repository(store());
    for n in 0..4 {
        repo.save(&mut task("t", n, None)).unwrap();
    }

    let mut count = 0;
    for item in repo.iter_all().unwrap() {
        item.unwrap();
        count += 1;
    }
    assert_eq!(count, 4);
}

#[test]
fn paged_scan_partitions_without_overlap() {
    let repo: Repository<Task> = test_repository(store());
    for n in 0..10 {
        repo.save(&mut task("t", n, None)).unwrap();
    }

    let first = repo
        .find_page(&PageRequest::of(4).with_order(Order::asc("priority")))
        .unwrap();
    assert_eq!(first.items().len(), 4);
    let cursor = first.cursor().unwrap().to_string();

    let second = repo
        .find_page(
            &PageRequest::of(4)
                .with_order(Order::asc("priority"))
                .with_cursor(cursor),
        )
        .unwrap();
    let third = repo
        .find_page(
            &PageRequest::of(4)
                .with_order(Order::asc("priority"))
                .with_cursor(second.cursor().unwrap()),
        )
        .unwrap();

    assert_eq!(third.items().len(), 2);
    assert!(third.cursor().is_none());

    let mut priorities: Vec<i64> = first
        .items()
        .iter()
        .chain(second.items())
        .chain(third.items())
        .map(|t| t.priority)
        .collect();
    priorities.dedup();
    assert_eq!(priorities, (0..10).collect::<Vec<i64>>());
}

#[test]
fn delete_variants() {
    let repo: Repository<Task> = test_repository(store());

    let mut keep = task("keep", 0, None);
    let mut drop1 = task("drop1", 1, None);
    let mut drop2 = task("drop2", 2, None);
    for t in [&mut keep, &mut drop1, &mut drop2] {
        repo.save(t).unwrap();
    }

    repo.delete_object(&drop1).unwrap();
    repo.delete_all(&[drop2.id.unwrap()]).unwrap();

    let left = repo.find_all().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].title, "keep");

    // Deleting something already gone is not an error.
    repo.delete(drop1.id.unwrap()).unwrap();
}

#[test]
fn begin_twice_without_close_is_a_state_error() {
    let repo: Repository<Task> = test_repository(store());
    let txns = repo.transactions();

    txns.begin().unwrap();
    assert!(matches!(txns.begin(), Err(CoreError::TransactionOpen)));

    txns.rollback().unwrap();
    txns.begin().unwrap();
    txns.commit().unwrap();
}

#[test]
fn idle_commit_and_rollback_are_noops() {
    let repo: Repository<Task> = test_repository(store());
    repo.transactions().commit().unwrap();
    repo.transactions().rollback().unwrap();
    assert!(!repo.transactions().is_active());
}

#[test]
fn transactional_save_and_delete_apply_at_commit() {
    let repo: Repository<Task> = test_repository(store());

    let mut existing = task("old", 0, None);
    repo.save(&mut existing).unwrap();

    let txn = repo.transactions().begin().unwrap();
    let mut fresh = task("new", 1, None);
    repo.save_in(txn, &mut fresh).unwrap();
    repo.delete_in(txn, existing.id.unwrap()).unwrap();

    // Identity assigned immediately, visibility deferred.
    assert!(fresh.id.is_some());
    let titles: Vec<String> = repo.find_all().unwrap().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["old".to_string()]);

    repo.transactions().commit().unwrap();
    let titles: Vec<String> = repo.find_all().unwrap().into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["new".to_string()]);
}
