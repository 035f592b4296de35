use chrono::Utc;
use uuid::Uuid;

use crate::{Likes, ReplyTarget, Time, UserRef, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,

    pub author: UserRef,

    /// Body as submitted, markup included
    pub content: String,

    /// Set only on comments written in response to another comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyTarget>,

    /// Child comments, oldest first
    ///
    /// A document without `replies` decodes to an empty list.
    #[serde(default)]
    pub replies: Vec<Comment>,

    pub created_at: Time,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<Likes>,
}

impl Comment {
    pub fn new(author: UserRef, content: String) -> Comment {
        Comment {
            id: CommentId(Uuid::new_v4()),
            author,
            content,
            reply_to: None,
            replies: Vec::new(),
            created_at: Utc::now(),
            likes: None,
        }
    }

    /// Builds a reply to this comment, addressed to its author
    ///
    /// The reply is not attached: push it to `self.replies` or go through
    /// [`crate::add_reply`].
    pub fn reply(&self, author: UserRef, content: String) -> Comment {
        let mut reply = Comment::new(author, content);
        reply.reply_to = Some(self.author.as_reply_target());
        reply
    }

    pub fn like_count(&self) -> u64 {
        self.likes.as_ref().map(|l| l.count).unwrap_or(0)
    }
}

// Reply chains are user-controlled, so the default recursive drop could
// exhaust the stack.
impl Drop for Comment {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut c) = pending.pop() {
            pending.append(&mut c.replies);
        }
    }
}
