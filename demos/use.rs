use avl_arena::{AvlTreeMap, AvlTreeSet, Error};

fn main() {
    let mut map = AvlTreeMap::new();
    map.add(0, "zero");
    map.add(1, "one");
    map.add(2, "two");
    map.add(2, "two");
    map.add(3, "three");
    map.add(4, "four");
    map.add(5, "five");
    assert_eq!(map.get(&1), Some(&"one"));
    map.remove(&1);
    assert!(map.get(&1).is_none());
    assert_eq!(map.set(&1, "uno"), Err(Error::KeyNotFound));
    assert_eq!(map.set(&2, "dos"), Ok("two"));

    println!("{:?}", map);

    let mut set = AvlTreeSet::new();
    for x in 0..5 {
        set.insert(x);
    }
    assert!(set.contains(&1));
    set.remove(&1);
    assert!(!set.contains(&1));

    print!("{{ ");
    for x in set.in_order() {
        print!("{x}, ");
    }
    println!("}}");
}
