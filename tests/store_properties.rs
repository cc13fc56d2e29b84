use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use kennel::{Dog, Lookup, Owner, OwnershipLink, RelationalStore, SeedSet, StoreOptions};

fn seeded_store() -> RelationalStore {
    let store = RelationalStore::open_in_memory().unwrap();
    SeedSet::demo().apply(&store).unwrap();
    store
}

#[test]
fn round_trip_single_owner() {
    let store = RelationalStore::open_in_memory().unwrap();
    store.insert_owner(&Owner::new(1, "Alice")).unwrap();

    let views = store.get_owner_with_dogs(1).unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].owner, Owner::new(1, "Alice"));
}

#[test]
fn join_resolves_both_directions() {
    let store = seeded_store();

    let alice = store.get_owner_with_dogs(1).unwrap();
    assert_eq!(alice[0].dogs, vec![Dog::new(1, "Rex"), Dog::new(2, "Buddy")]);

    let rex = store.get_dog_with_owners(1).unwrap();
    assert_eq!(rex[0].owners, vec![Owner::new(1, "Alice"), Owner::new(2, "Bob")]);
}

#[test]
fn unknown_ids_give_empty_results() {
    let store = seeded_store();
    assert!(store.get_owner_with_dogs(999).unwrap().is_empty());
    assert!(store.get_dog_with_owners(999).unwrap().is_empty());

    let lookup = Lookup::new(&store);
    assert!(lookup.owner_with_dogs("not a number").unwrap().is_empty());
}

#[test]
fn replace_overwrites_name() {
    let store = seeded_store();
    store.insert_owner(&Owner::new(1, "Alicia")).unwrap();
    assert_eq!(store.get_owner_with_dogs(1).unwrap()[0].owner.name, "Alicia");
}

#[test]
fn repeated_link_and_seed_are_idempotent() {
    let store = seeded_store();
    store.insert_ownership_link(&OwnershipLink::new(1, 1)).unwrap();
    store.insert_ownership_link(&OwnershipLink::new(1, 1)).unwrap();
    SeedSet::demo().apply(&store).unwrap();

    let links = store.list_links().unwrap();
    assert_eq!(links.iter().filter(|l| **l == OwnershipLink::new(1, 1)).count(), 1);
    assert_eq!(links.len(), 3);
}

#[test]
fn shared_handle_reads_see_whole_links() {
    let store = Arc::new(RelationalStore::open_in_memory().unwrap());
    store.insert_owner(&Owner::new(1, "Alice")).unwrap();
    store.insert_dog(&Dog::new(1, "Rex")).unwrap();
    store.insert_dog(&Dog::new(2, "Buddy")).unwrap();
    store.insert_ownership_link(&OwnershipLink::new(1, 1)).unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut reads = 0;
                while !done.load(Ordering::Acquire) || reads == 0 {
                    let views = store.get_owner_with_dogs(1).unwrap();
                    assert_eq!(views.len(), 1);
                    let names = views[0].dog_names();
                    assert!(
                        names == vec!["Rex"] || names == vec!["Rex", "Buddy"],
                        "partial join observed: {:?}",
                        names
                    );
                    reads += 1;
                }
            })
        })
        .collect();

    store.insert_ownership_link(&OwnershipLink::new(1, 2)).unwrap();
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(store.get_owner_with_dogs(1).unwrap()[0].dog_names(), vec!["Rex", "Buddy"]);
}

#[test]
fn separate_handles_on_one_file_stay_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kennel.db");
    let options = StoreOptions::default();

    let writer = RelationalStore::open(&path, &options).unwrap();
    writer.insert_owner(&Owner::new(1, "Alice")).unwrap();
    writer.insert_dog(&Dog::new(1, "Rex")).unwrap();
    writer.insert_ownership_link(&OwnershipLink::new(1, 1)).unwrap();

    let reader = RelationalStore::open(&path, &options).unwrap();
    let handle = thread::spawn(move || {
        for _ in 0..200 {
            let views = reader.get_dog_with_owners(1).unwrap();
            let names = views[0].owner_names();
            assert!(
                names == vec!["Alice"] || names == vec!["Alice", "Bob"],
                "partial join observed: {:?}",
                names
            );
        }
    });

    for id in 2..50 {
        writer.insert_dog(&Dog::new(id, format!("Pup {}", id))).unwrap();
    }
    writer.insert_owner(&Owner::new(2, "Bob")).unwrap();
    writer.insert_ownership_link(&OwnershipLink::new(2, 1)).unwrap();
    handle.join().unwrap();

    let rex = writer.get_dog_with_owners(1).unwrap();
    assert_eq!(rex[0].owner_names(), vec!["Alice", "Bob"]);
}
