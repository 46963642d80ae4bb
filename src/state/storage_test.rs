use super::*;

#[test]
fn take_url_is_one_shot() {
    let storage = StateStorage::new();
    storage.store_url("/dashboard/alerts");
    assert_eq!(storage.take_url().as_deref(), Some("/dashboard/alerts"));
    assert_eq!(storage.take_url(), None);
}

#[test]
fn store_url_overwrites_previous_value() {
    let storage = StateStorage::new();
    storage.store_url("/first");
    storage.store_url("/second");
    assert_eq!(storage.take_url().as_deref(), Some("/second"));
}

#[test]
fn clear_url_empties_the_slot() {
    let storage = StateStorage::new();
    storage.store_url("/anywhere");
    storage.clear_url();
    assert_eq!(storage.take_url(), None);
}

#[test]
fn empty_storage_yields_nothing() {
    let storage = StateStorage::new();
    assert_eq!(storage.take_url(), None);
}
