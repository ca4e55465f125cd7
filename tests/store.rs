mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{program, Scripted};
use progtrack::view::{FormView, ListView, Submitted};
use progtrack::{
    Column, EditTarget, FileStorage, MemoryStorage, Program, Storage, Store, StoreError, STORAGE_KEY,
};

fn memory_store(answers: &[bool]) -> Store {
    Store::open(
        Box::new(MemoryStorage::default()),
        Box::new(Scripted::new(answers)),
    )
    .unwrap()
}

#[test]
fn export_then_import_round_trips() {
    let mut source = memory_store(&[]);
    let mut legacy = program("Legacy");
    legacy.is_paid = progtrack::Paid::Text("evet".to_owned());
    legacy.card_number = None;
    legacy.period = None;
    for p in vec![program("Netflix"), legacy, program("Spotify")] {
        source.add(p).unwrap();
    }
    let bytes = source.export_snapshot().unwrap();

    let mut target = memory_store(&[]);
    target.add(program("Stale")).unwrap();
    target.import_snapshot(&bytes).unwrap();
    assert_eq!(target.programs(), source.programs());
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = Store::open(
            Box::new(FileStorage::new(dir.path())),
            Box::new(Scripted::new(&[true])),
        )
        .unwrap();
        store.add(program("A")).unwrap();
        store.add(program("B")).unwrap();
        store.add(program("C")).unwrap();
        store.delete(0).unwrap();
    }
    let store = Store::open(
        Box::new(FileStorage::new(dir.path())),
        Box::new(Scripted::new(&[])),
    )
    .unwrap();
    let names: Vec<_> = store.programs().iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["B", "C"]);
    assert!(dir.path().join("programlar.json").exists());
}

#[test]
fn persist_happens_before_notification() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(
        Box::new(FileStorage::new(dir.path())),
        Box::new(Scripted::new(&[])),
    )
    .unwrap();
    let reader = FileStorage::new(dir.path());
    let persisted_at_notify = Rc::new(RefCell::new(vec![]));
    let sink = persisted_at_notify.clone();
    let _sub = store.subscribe_records(move |list| {
        let on_disk = reader
            .read(STORAGE_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str::<Vec<Program>>(&raw).unwrap())
            .unwrap_or_default();
        sink.borrow_mut().push(on_disk == *list);
    });
    store.add(program("A")).unwrap();
    assert_eq!(*persisted_at_notify.borrow(), vec![true, true]);
}

#[test]
fn stale_edit_after_delete_is_refused() {
    let mut store = memory_store(&[true]);
    store.add(program("A")).unwrap();
    store.add(program("B")).unwrap();
    let list = ListView::attach(&store);
    let form = FormView::attach(&store);

    list.edit(&mut store, 1).unwrap();
    assert_eq!(form.edit_index(), Some(1));
    store.delete(0).unwrap();

    form.fill(|f| f.name = "B2".to_owned());
    match form.submit(&mut store) {
        Err(progtrack::view::FormError::Store(StoreError::IndexOutOfRange { index: 1, len: 1 })) => {}
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(store.programs()[0].name, "B");
    assert_eq!(form.form().name, "B2");
}

#[test]
fn list_view_follows_store_changes() {
    let mut store = memory_store(&[]);
    let list = ListView::attach(&store);
    list.search("net");
    store.add(program("Netflix")).unwrap();
    store.add(program("Spotify")).unwrap();
    let rows = list.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].program.name, "Netflix");

    list.search("");
    list.sort_by(Column::Name);
    list.sort_by(Column::Name);
    let names: Vec<_> = list.rows().into_iter().map(|r| r.program.name).collect();
    assert_eq!(names, vec!["Spotify", "Netflix"]);
    assert_eq!(list.rows()[0].index, 1);
}

#[test]
fn form_adds_then_edits_through_the_edit_target() {
    let mut store = memory_store(&[]);
    let list = ListView::attach(&store);
    let form = FormView::attach(&store);

    form.fill(|f| {
        f.name = "Gym".to_owned();
        f.link = "https://gym.example".to_owned();
        f.email = "me@example.com".to_owned();
        f.secret = "pw".to_owned();
        f.is_paid = false;
        f.card_number = "4111".to_owned();
        f.period = Some(progtrack::Period::Monthly);
    });
    assert_eq!(form.submit(&mut store).unwrap(), Submitted::Added);
    assert_eq!(store.programs()[0].card_number.as_deref(), Some(""));
    assert_eq!(form.edit_index(), None);

    list.edit(&mut store, 0).unwrap();
    assert_eq!(form.form().name, "Gym");
    form.fill(|f| {
        f.is_paid = true;
        f.card_number = "5555".to_owned();
    });
    assert_eq!(form.submit(&mut store).unwrap(), Submitted::Updated(0));
    assert_eq!(store.len(), 1);
    assert_eq!(store.programs()[0].card_number.as_deref(), Some("5555"));
    assert_eq!(store.edit_target(), None);
}

#[test]
fn cancel_clears_edit_mode() {
    let mut store = memory_store(&[]);
    store.add(program("A")).unwrap();
    let list = ListView::attach(&store);
    let form = FormView::attach(&store);
    list.edit(&mut store, 0).unwrap();
    form.cancel(&mut store);
    assert_eq!(form.edit_index(), None);
    assert_eq!(store.edit_target(), None);
}

#[test]
fn delete_asks_once_per_call() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::open(
        Box::new(FileStorage::new(dir.path())),
        Box::new(Scripted::new(&[false, true])),
    )
    .unwrap();
    store.add(program("A")).unwrap();
    assert_eq!(store.delete(0).unwrap(), progtrack::Deletion::Cancelled);
    assert_eq!(store.len(), 1);
    assert!(matches!(store.delete(0).unwrap(), progtrack::Deletion::Deleted(_)));
    assert!(store.is_empty());
}

#[test]
fn form_attached_after_edit_target_is_prefilled() {
    let mut store = memory_store(&[]);
    store.add(program("A")).unwrap();
    store.add(program("Netflix")).unwrap();
    let pending = store.programs()[1].clone();
    store.set_edit_target(Some(EditTarget {
        index: 1,
        program: pending,
    }));

    let form = FormView::attach(&store);
    assert_eq!(form.edit_index(), Some(1));
    assert_eq!(form.form().name, "Netflix");
    assert_eq!(form.form().email, "netflix@example.com");
    assert_eq!(form.form().expiry_date, "2027-02-01");

    form.fill(|f| f.secret = "new".to_owned());
    assert_eq!(form.submit(&mut store).unwrap(), Submitted::Updated(1));
    assert_eq!(store.programs()[1].secret, "new");
    assert_eq!(store.programs()[0].name, "A");
}
