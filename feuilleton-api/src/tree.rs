//! Operations over a sequence of top-level comments and all their replies
//!
//! Nesting depth is chosen by whoever writes replies, so nothing here
//! recurses: every traversal keeps its own stack.

use crate::{Comment, CommentId, Error};

/// Number of comments in the thread, replies at every depth included
pub fn count_total_comments(comments: &[Comment]) -> usize {
    let mut total = 0;
    let mut pending = vec![comments];
    while let Some(level) = pending.pop() {
        total += level.len();
        pending.extend(
            level
                .iter()
                .map(|c| c.replies.as_slice())
                .filter(|r| !r.is_empty()),
        );
    }
    total
}

/// Pre-order walk over the thread, yielding each comment with its depth
/// (0 for top-level comments)
pub fn walk(comments: &[Comment]) -> Walk<'_> {
    Walk {
        stack: vec![(0, comments.iter())],
    }
}

pub struct Walk<'a> {
    stack: Vec<(usize, std::slice::Iter<'a, Comment>)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Comment);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (depth, level) = self.stack.last_mut()?;
            let depth = *depth;
            match level.next() {
                Some(c) => {
                    if !c.replies.is_empty() {
                        self.stack.push((depth + 1, c.replies.iter()));
                    }
                    return Some((depth, c));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Deepest reply level a thread may have, top-level comments being level 1
///
/// Keeps exported threads within the nesting serde_json accepts on decode.
pub const MAX_REPLY_DEPTH: usize = 60;

/// Number of levels in the thread: 0 when empty, 1 when nobody replied
pub fn max_depth(comments: &[Comment]) -> usize {
    walk(comments).map(|(d, _)| d + 1).max().unwrap_or(0)
}

pub fn check_depth(comments: &[Comment]) -> Result<(), Error> {
    let depth = max_depth(comments);
    if depth > MAX_REPLY_DEPTH {
        return Err(Error::TooDeep {
            depth,
            max: MAX_REPLY_DEPTH,
        });
    }
    Ok(())
}

/// Indices leading to the first comment `id` in pre-order, the same one
/// [`walk`] reaches first
fn path_to(comments: &[Comment], id: &CommentId) -> Option<Vec<usize>> {
    let mut stack: Vec<(&[Comment], usize)> = vec![(comments, 0)];
    while let Some(&(level, i)) = stack.last() {
        let Some(c) = level.get(i) else {
            stack.pop();
            continue;
        };
        let top = stack.len() - 1;
        stack[top].1 += 1;
        if c.id == *id {
            return Some(stack.iter().map(|&(_, next)| next - 1).collect());
        }
        if !c.replies.is_empty() {
            stack.push((&c.replies, 0));
        }
    }
    None
}

pub fn find<'a>(comments: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
    walk(comments).map(|(_, c)| c).find(|c| c.id == *id)
}

pub fn find_mut<'a>(comments: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
    let path = path_to(comments, id)?;
    let (&first, rest) = path.split_first()?;
    let mut c = &mut comments[first];
    for &i in rest {
        c = &mut c.replies[i];
    }
    Some(c)
}

/// Appends `reply` at the end of the replies of comment `parent`
pub fn add_reply(
    comments: &mut [Comment],
    parent: &CommentId,
    reply: Comment,
) -> Result<(), Error> {
    let parent = find_mut(comments, parent).ok_or(Error::UnknownComment(*parent))?;
    parent.replies.push(reply);
    Ok(())
}

/// Removes comment `id` from the sequence it belongs to, and returns it
/// along with all of its replies
pub fn remove(comments: &mut Vec<Comment>, id: &CommentId) -> Option<Comment> {
    let path = path_to(comments, id)?;
    let (&last, parents) = path.split_last()?;
    let mut level = comments;
    for &i in parents {
        level = &mut level[i].replies;
    }
    Some(level.remove(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, UserId, UserRef};
    use uuid::Uuid;

    fn leaf(id: u128) -> Comment {
        let mut c = Comment::new(
            UserRef::new(UserId::stub(), String::from("tester"), Role::Reader),
            format!("comment {id}"),
        );
        c.id = CommentId(Uuid::from_u128(id));
        c
    }

    fn node(id: u128, replies: Vec<Comment>) -> Comment {
        let mut c = leaf(id);
        c.replies = replies;
        c
    }

    fn id(id: u128) -> CommentId {
        CommentId(Uuid::from_u128(id))
    }

    // a: [b, c: [d]]
    fn example_thread() -> Vec<Comment> {
        vec![node(0xa, vec![leaf(0xb), node(0xc, vec![leaf(0xd)])])]
    }

    #[test]
    fn count_empty() {
        assert_eq!(count_total_comments(&[]), 0);
    }

    #[test]
    fn count_flat() {
        let comments = (0..7).map(leaf).collect::<Vec<_>>();
        assert_eq!(count_total_comments(&comments), 7);
    }

    #[test]
    fn count_direct_replies() {
        let comments = vec![node(0, (1..=5).map(leaf).collect())];
        assert_eq!(count_total_comments(&comments), 6);
    }

    #[test]
    fn count_chain() {
        let comments = vec![node(1, vec![node(2, vec![leaf(3)])])];
        assert_eq!(count_total_comments(&comments), 3);
    }

    #[test]
    fn count_example() {
        let comments = example_thread();
        assert_eq!(count_total_comments(&comments), 4);
        // counting only reads
        assert_eq!(count_total_comments(&comments), 4);
    }

    #[test]
    fn count_deep_chain() {
        let mut chain = leaf(0);
        for i in 1..200_000 {
            chain = node(i, vec![chain]);
        }
        let comments = vec![chain];
        assert_eq!(count_total_comments(&comments), 200_000);
        assert_eq!(max_depth(&comments), 200_000);
    }

    #[test]
    fn walk_is_preorder() {
        let comments = example_thread();
        let seen = walk(&comments).map(|(d, c)| (d, c.id)).collect::<Vec<_>>();
        assert_eq!(
            seen,
            vec![(0, id(0xa)), (1, id(0xb)), (1, id(0xc)), (2, id(0xd))],
        );
    }

    #[test]
    fn depths() {
        assert_eq!(max_depth(&[]), 0);
        assert_eq!(max_depth(&[leaf(1), leaf(2)]), 1);
        assert_eq!(max_depth(&example_thread()), 3);
    }

    #[test]
    fn finding() {
        let mut comments = example_thread();
        assert_eq!(find(&comments, &id(0xd)).map(|c| c.id), Some(id(0xd)));
        assert!(find(&comments, &id(0xe)).is_none());

        find_mut(&mut comments, &id(0xb)).expect("b is in the thread").content =
            String::from("edited");
        assert_eq!(find(&comments, &id(0xb)).unwrap().content, "edited");
        assert!(find_mut(&mut comments, &id(0xe)).is_none());
    }

    #[test]
    fn replying() {
        let mut comments = example_thread();
        add_reply(&mut comments, &id(0xd), leaf(0xe)).unwrap();
        add_reply(&mut comments, &id(0xa), leaf(0xf)).unwrap();
        assert_eq!(count_total_comments(&comments), 6);
        assert_eq!(max_depth(&comments), 4);
        assert_eq!(comments[0].replies.last().unwrap().id, id(0xf));

        assert_eq!(
            add_reply(&mut comments, &id(0x42), leaf(0x43)),
            Err(Error::UnknownComment(id(0x42))),
        );
        assert_eq!(count_total_comments(&comments), 6);
    }

    #[test]
    fn removing() {
        let mut comments = example_thread();
        let removed = remove(&mut comments, &id(0xc)).expect("c is in the thread");
        assert_eq!(count_total_comments(std::slice::from_ref(&removed)), 2);
        assert_eq!(count_total_comments(&comments), 2);
        assert!(find(&comments, &id(0xd)).is_none());

        assert!(remove(&mut comments, &id(0xc)).is_none());

        let removed = remove(&mut comments, &id(0xa)).expect("a is in the thread");
        assert_eq!(removed.replies.len(), 1);
        assert!(comments.is_empty());
    }

    #[test]
    fn duplicate_ids_resolve_to_the_same_comment() {
        // a: [x], x; where both x share an id
        let mut nested = leaf(0x9);
        nested.content = String::from("nested");
        let mut top = leaf(0x9);
        top.content = String::from("top");
        let mut comments = vec![node(0xa, vec![nested]), top];

        assert_eq!(find(&comments, &id(0x9)).unwrap().content, "nested");
        assert_eq!(find_mut(&mut comments, &id(0x9)).unwrap().content, "nested");

        add_reply(&mut comments, &id(0x9), leaf(0xb)).unwrap();
        assert_eq!(comments[0].replies[0].replies.len(), 1);
        assert!(comments[1].replies.is_empty());

        let removed = remove(&mut comments, &id(0x9)).unwrap();
        assert_eq!(removed.content, "nested");
        assert_eq!(find(&comments, &id(0x9)).unwrap().content, "top");
        assert_eq!(remove(&mut comments, &id(0x9)).unwrap().content, "top");
        assert_eq!(count_total_comments(&comments), 1);
    }

    #[test]
    fn depth_cap() {
        let mut chain = leaf(0);
        for i in 1..MAX_REPLY_DEPTH as u128 {
            chain = node(i, vec![chain]);
        }
        let mut comments = vec![chain];
        assert_eq!(check_depth(&comments), Ok(()));

        let deepest = CommentId(Uuid::from_u128(0));
        add_reply(&mut comments, &deepest, leaf(0x1000)).unwrap();
        assert_eq!(
            check_depth(&comments),
            Err(Error::TooDeep {
                depth: MAX_REPLY_DEPTH + 1,
                max: MAX_REPLY_DEPTH,
            }),
        );
    }
}
