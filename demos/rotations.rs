use avl_arena::{AvlTreeMap, BstMap};

fn main() {
    let mut avl = AvlTreeMap::new();
    let mut bst = BstMap::new();
    for key in 1..=64 {
        avl.add(key, ());
        bst.add(key, ());
    }

    println!("Ascending insert of 64 keys:");
    println!("  AVL tree height: {}", avl.height());
    println!("  unbalanced tree height: {}", bst.height());

    for key in (1..=64).filter(|key| key % 2 == 0) {
        avl.remove(&key);
    }
    println!("After removing every even key:");
    println!("  AVL tree height: {}, balanced: {}", avl.height(), avl.is_balanced());
}
