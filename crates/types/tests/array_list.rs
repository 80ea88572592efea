use types::{ArrayList, DEFAULT_CAPACITY};

#[test]
fn add_past_default_capacity_keeps_insertion_order() {
    let mut list = ArrayList::new();
    assert_eq!(list.capacity(), DEFAULT_CAPACITY);

    for i in 0..1025u64 {
        list.add(i);
    }

    assert_eq!(list.len(), 1025);
    assert_eq!(list.capacity(), DEFAULT_CAPACITY * 2);
    for i in 0..1025usize {
        assert_eq!(list.get(i), Some(&(i as u64)));
    }
    assert_eq!(list.get(1025), None);
}

#[test]
fn remove_at_shifts_down_without_shrinking() {
    let mut list = ArrayList::with_capacity(2);
    for i in 0..5u32 {
        list.add(i);
    }
    let cap = list.capacity();
    assert_eq!(cap, 8);

    assert_eq!(list.remove_at(1), Some(1));
    assert_eq!(list.as_slice(), &[0, 2, 3, 4]);
    assert_eq!(list.remove_at(10), None);

    while list.remove_at(0).is_some() {}
    assert!(list.is_empty());
    assert_eq!(list.capacity(), cap);
}

#[test]
fn remove_by_value_drops_first_match_only() {
    let mut list = ArrayList::new();
    for v in [7, 3, 7, 9] {
        list.add(v);
    }
    assert!(list.remove(&7));
    assert_eq!(list.as_slice(), &[3, 7, 9]);
    assert!(!list.remove(&42));
}

#[test]
fn set_insert_and_index() {
    let mut list = ArrayList::new();
    list.add("a");
    list.add("c");
    list.insert(1, "b");
    assert_eq!(list.as_slice(), &["a", "b", "c"]);

    list.set(2, "z");
    assert_eq!(list[2], "z");
    list[0] = "y";
    assert_eq!(list.last(), Some(&"z"));
    assert_eq!(list.pop(), Some("z"));
    assert_eq!(list.as_slice(), &["y", "b"]);
}

#[test]
#[should_panic]
fn set_out_of_range_is_a_contract_violation() {
    let mut list: ArrayList<u8> = ArrayList::new();
    list.set(0, 1);
}

#[test]
fn retain_mut_visits_in_order_and_preserves_survivors() {
    let mut list = ArrayList::new();
    for i in 0..6u32 {
        list.add(i);
    }
    let mut visited = Vec::new();
    list.retain_mut(|v| {
        visited.push(*v);
        *v *= 10;
        *v % 20 != 0
    });
    assert_eq!(visited, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(list.as_slice(), &[10, 30, 50]);
}

#[test]
fn dispose_releases_everything_and_list_stays_usable() {
    let mut list = ArrayList::new();
    list.add(1u64);
    list.dispose();
    assert_eq!(list.len(), 0);
    assert_eq!(list.capacity(), 0);

    list.add(2);
    assert_eq!(list.capacity(), DEFAULT_CAPACITY);
    assert_eq!(list[0], 2);
}
