use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use quickcheck_macros::quickcheck;
use threaded_avl::{InsertError, Tree};

use crate::check;

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::ordered();
    for x in &xs {
        let _ = tree.insert(*x);
        check(&tree, i8::cmp);
    }

    xs.iter().all(|x| tree.get(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::ordered();
    for x in &xs {
        let _ = tree.insert(*x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn duplicates_come_back(xs: Vec<u8>) -> bool {
    let mut tree = Tree::ordered();
    let mut seen = HashSet::new();

    xs.into_iter().all(|x| match tree.insert(x) {
        Ok(_) => seen.insert(x),
        Err(InsertError::DuplicateKey(back)) => back == x && seen.contains(&x),
        Err(InsertError::AllocationFailure(_)) => false,
    }) && tree.count() == seen.len()
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let released = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&released);
    let mut tree = Tree::new(i8::cmp, move |x| sink.borrow_mut().push(x));

    let mut inserted = 0;
    for x in &xs {
        if tree.insert(*x).is_ok() {
            inserted += 1;
        }
    }
    let mut deleted = 0;
    for delete in &deletes {
        if tree.delete(delete) {
            deleted += 1;
        }
        check(&tree, i8::cmp);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    let counted = tree.count() == inserted - deleted && released.borrow().len() == deleted;
    let found = deletes.iter().all(|x| tree.search(x).is_none())
        && still_present.iter().all(|x| tree.search(x).is_some());
    drop(tree);

    counted && found && released.borrow().len() == inserted
}

#[quickcheck]
fn handles_survive_other_deletions(xs: Vec<i16>, deletes: Vec<i16>) -> bool {
    let mut tree = Tree::ordered();
    let handles: Vec<_> = xs
        .iter()
        .filter_map(|x| tree.insert(*x).ok().map(|h| (*x, h)))
        .collect();
    for delete in &deletes {
        tree.delete(delete);
    }

    handles.iter().all(|(x, h)| match tree.node(*h) {
        Some(node) => node.item() == x && !deletes.contains(x),
        None => deletes.contains(x),
    })
}
