use crate::CommentId;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown comment {0:?}")]
    UnknownComment(CommentId),

    #[error("Comment id used twice in the same thread {0:?}")]
    DuplicateComment(CommentId),

    #[error("Comment {comment:?} replies to unknown comment {parent:?}")]
    UnknownParent {
        comment: CommentId,
        parent: CommentId,
    },

    #[error("Comments never reach the top of the thread (reply cycle?) {0:?}")]
    DetachedComments(Vec<CommentId>),

    #[error("Thread is {depth} replies deep, at most {max} are supported")]
    TooDeep { depth: usize, max: usize },

    #[error("Invalid discussion reference {0:?}")]
    InvalidDiscussion(String),
}
