#![cfg(test)]

use bolero::generator::{gen, gen_with};
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::*;

/// Turns random bytes into a thread shape: comment `i` replies to comment
/// `shape[i] % (i + 1)`, or is top-level when that equals `i` or when the
/// parent already sits at the deepest allowed level
fn parents(shape: &[u8]) -> Vec<Option<usize>> {
    let mut depths = Vec::with_capacity(shape.len());
    let mut parents = Vec::with_capacity(shape.len());
    for (i, b) in shape.iter().enumerate() {
        let parent = match *b as usize % (i + 1) {
            p if p == i => None,
            p if depths[p] >= MAX_REPLY_DEPTH => None,
            p => Some(p),
        };
        depths.push(parent.map(|p| depths[p] + 1).unwrap_or(1));
        parents.push(parent);
    }
    parents
}

fn rows_for(parents: &[Option<usize>]) -> Vec<CommentRow> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let id = |i: usize| CommentId(Uuid::from_u128(i as u128 + 1));
    parents
        .iter()
        .enumerate()
        .map(|(i, p)| CommentRow {
            id: id(i),
            parent_id: p.map(id),
            author: UserRef::new(UserId::stub(), format!("user{}", i % 5), Role::Reader),
            content: format!("comment {i}"),
            reply_to: None,
            created_at: start + Duration::seconds(i as i64),
            likes: None,
        })
        // database order is arbitrary
        .rev()
        .collect()
}

fn depth_of(parents: &[Option<usize>], mut i: usize) -> usize {
    let mut depth = 1;
    while let Some(p) = parents[i] {
        depth += 1;
        i = p;
    }
    depth
}

fn recursive_count(comments: &[Comment]) -> usize {
    comments
        .iter()
        .map(|c| 1 + recursive_count(&c.replies))
        .sum()
}

#[test]
fn fuzz_count_matches_tree_size() {
    bolero::check!()
        .with_generator(gen_with::<Vec<u8>>().len(0..200usize))
        .cloned()
        .for_each(|shape| {
            let parents = parents(&shape);
            let thread = Thread::from_rows(Discussion::Post(PostId::stub()), rows_for(&parents))
                .expect("generated rows always form a tree");

            let total = thread.total_comments();
            assert_eq!(total, shape.len());
            assert_eq!(total, recursive_count(&thread.comments));
            assert_eq!(total, thread.walk().count());
            assert_eq!(total, thread.total_comments());
            assert_eq!(
                total,
                thread
                    .comments
                    .iter()
                    .map(|c| 1 + count_total_comments(&c.replies))
                    .sum::<usize>(),
            );

            let expected_depth = (0..parents.len())
                .map(|i| depth_of(&parents, i))
                .max()
                .unwrap_or(0);
            assert_eq!(thread.max_depth(), expected_depth);

            let mut previous_depth = 0;
            for (depth, _) in thread.walk() {
                // pre-order never skips a level on the way down
                assert!(depth <= previous_depth + 1);
                previous_depth = depth;
            }
        })
}

#[test]
fn fuzz_remove_takes_whole_subtree() {
    bolero::check!()
        .with_generator((gen_with::<Vec<u8>>().len(1..200usize), gen::<u8>()))
        .cloned()
        .for_each(|(shape, pick)| {
            let parents = parents(&shape);
            let mut thread =
                Thread::from_rows(Discussion::Post(PostId::stub()), rows_for(&parents))
                    .expect("generated rows always form a tree");
            let target = CommentId(Uuid::from_u128(pick as u128 % shape.len() as u128 + 1));

            let before = thread.total_comments();
            let removed = remove(&mut thread.comments, &target).expect("target is in the thread");
            let removed_size = count_total_comments(std::slice::from_ref(&removed));
            assert_eq!(removed.id, target);
            assert_eq!(thread.total_comments() + removed_size, before);
            assert!(find(&thread.comments, &target).is_none());

            let parent = parents[target.0.as_u128() as usize - 1]
                .map(|p| CommentId(Uuid::from_u128(p as u128 + 1)));
            match parent {
                None => thread.comments.push(removed),
                Some(p) => add_reply(&mut thread.comments, &p, removed)
                    .expect("parent of a removed comment stays in the thread"),
            }
            assert_eq!(thread.total_comments(), before);
        })
}
