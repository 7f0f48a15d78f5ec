use std::collections::BTreeSet;
use std::thread;

use pushkind_common::repository::errors::RepositoryError;
use pushkind_logistics::repository::OrderNumbering;

mod common;

#[test]
fn test_counter_is_created_on_first_use() {
    let test_db = common::TestDb::new("test_counter_is_created_on_first_use.db");
    let repo = test_db.repo();
    let project = test_db.add_project("ACME", "ACME", None);

    assert!(repo.get_order_counter(project.id).unwrap().is_none());

    assert_eq!(repo.get_next_number(project.id).unwrap(), 1);
    assert_eq!(repo.get_next_number(project.id).unwrap(), 2);

    let counter = repo.get_order_counter(project.id).unwrap().unwrap();
    assert_eq!(counter.project_id, project.id);
    assert_eq!(counter.last_number, 2);
}

#[test]
fn test_generate_order_code_uses_project_prefix() {
    let test_db = common::TestDb::new("test_generate_order_code_uses_project_prefix.db");
    let repo = test_db.repo();
    let acme = test_db.add_project("ACME", "ACME", None);
    let globex = test_db.add_project("GLOBEX", "GLX", None);

    assert_eq!(repo.generate_order_code(acme.id).unwrap(), "ACME-000001");
    assert_eq!(repo.generate_order_code(acme.id).unwrap(), "ACME-000002");
    assert_eq!(repo.generate_order_code(globex.id).unwrap(), "GLX-000001");
}

#[test]
fn test_generate_order_code_for_unknown_project() {
    let test_db = common::TestDb::new("test_generate_order_code_for_unknown_project.db");
    let repo = test_db.repo();

    let err = repo
        .generate_order_code(404)
        .expect_err("expected missing project to fail");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[test]
fn test_concurrent_numbering_hands_out_each_number_once() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 10;

    let test_db = common::TestDb::new("test_concurrent_numbering_hands_out_each_number_once.db");
    let project = test_db.add_project("ACME", "ACME", None);

    let numbers: Vec<i32> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let repo = test_db.repo();
                scope.spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| repo.get_next_number(project.id).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });

    let total = (THREADS * PER_THREAD) as i32;
    let unique: BTreeSet<i32> = numbers.iter().copied().collect();

    assert_eq!(numbers.len(), unique.len());
    assert_eq!(unique, (1..=total).collect::<BTreeSet<_>>());

    let repo = test_db.repo();
    let counter = repo.get_order_counter(project.id).unwrap().unwrap();
    assert_eq!(counter.last_number, total);
}
