use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use uuid::Uuid;

use crate::{
    tree, Comment, CommentId, Error, Likes, ReplyTarget, Time, UserRef, MAX_REPLY_DEPTH, STUB_UUID,
};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct PostId(pub Uuid);

impl PostId {
    pub fn stub() -> PostId {
        PostId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct NovelId(pub Uuid);

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ChapterId(pub Uuid);

/// What a thread is attached to
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Discussion {
    Post(PostId),
    Novel(NovelId),
    Chapter(ChapterId),
}

impl fmt::Display for Discussion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discussion::Post(PostId(id)) => write!(f, "post:{id}"),
            Discussion::Novel(NovelId(id)) => write!(f, "novel:{id}"),
            Discussion::Chapter(ChapterId(id)) => write!(f, "chapter:{id}"),
        }
    }
}

impl FromStr for Discussion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Discussion, Error> {
        let invalid = || Error::InvalidDiscussion(String::from(s));
        let (kind, id) = s.split_once(':').ok_or_else(invalid)?;
        let id = Uuid::try_parse(id).map_err(|_| invalid())?;
        match kind {
            "post" => Ok(Discussion::Post(PostId(id))),
            "novel" => Ok(Discussion::Novel(NovelId(id))),
            "chapter" => Ok(Discussion::Chapter(ChapterId(id))),
            _ => Err(invalid()),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Thread {
    pub discussion: Discussion,
    pub comments: Vec<Comment>,
}

/// A comment as the database stores it: flat, pointing to its parent
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    pub id: CommentId,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    pub author: UserRef,
    pub content: String,
    #[serde(default)]
    pub reply_to: Option<ReplyTarget>,
    pub created_at: Time,
    #[serde(default)]
    pub likes: Option<Likes>,
}

impl CommentRow {
    fn into_comment(self, replies: Vec<Comment>) -> Comment {
        Comment {
            id: self.id,
            author: self.author,
            content: self.content,
            reply_to: self.reply_to,
            replies,
            created_at: self.created_at,
            likes: self.likes,
        }
    }
}

impl Thread {
    pub fn new(discussion: Discussion) -> Thread {
        Thread {
            discussion,
            comments: Vec::new(),
        }
    }

    /// Nests flat rows into a thread
    ///
    /// Replies are ordered by creation date, ties keeping the row order.
    /// Threads deeper than [`MAX_REPLY_DEPTH`] are refused.
    pub fn from_rows(discussion: Discussion, rows: Vec<CommentRow>) -> Result<Thread, Error> {
        let total = rows.len();

        let mut known = HashSet::with_capacity(total);
        for r in &rows {
            if !known.insert(r.id) {
                return Err(Error::DuplicateComment(r.id));
            }
        }
        for r in &rows {
            if let Some(parent) = r.parent_id {
                if !known.contains(&parent) {
                    return Err(Error::UnknownParent {
                        comment: r.id,
                        parent,
                    });
                }
            }
        }

        let mut siblings: HashMap<Option<CommentId>, Vec<CommentRow>> = HashMap::new();
        for r in rows {
            siblings.entry(r.parent_id).or_default().push(r);
        }
        for s in siblings.values_mut() {
            s.sort_by_key(|r| r.created_at);
        }

        // every row lands after its parent
        let mut ordered = siblings.remove(&None).unwrap_or_default();
        let mut depths = vec![1; ordered.len()];
        let mut next = 0;
        while next < ordered.len() {
            if let Some(replies) = siblings.remove(&Some(ordered[next].id)) {
                depths.resize(depths.len() + replies.len(), depths[next] + 1);
                ordered.extend(replies);
            }
            next += 1;
        }
        if ordered.len() != total {
            let mut detached = siblings
                .into_values()
                .flatten()
                .map(|r| r.id)
                .collect::<Vec<_>>();
            detached.sort();
            return Err(Error::DetachedComments(detached));
        }
        let depth = depths.into_iter().max().unwrap_or(0);
        if depth > MAX_REPLY_DEPTH {
            return Err(Error::TooDeep {
                depth,
                max: MAX_REPLY_DEPTH,
            });
        }

        // build bottom-up, so that each row's replies are complete when it is reached
        let mut built: HashMap<Option<CommentId>, Vec<Comment>> = HashMap::new();
        for r in ordered.into_iter().rev() {
            let mut replies = built.remove(&Some(r.id)).unwrap_or_default();
            replies.reverse();
            let parent = r.parent_id;
            built.entry(parent).or_default().push(r.into_comment(replies));
        }
        let mut comments = built.remove(&None).unwrap_or_default();
        comments.reverse();

        tracing::debug!(
            %discussion,
            rows = total,
            top_level = comments.len(),
            "nested comment rows into thread"
        );
        Ok(Thread {
            discussion,
            comments,
        })
    }

    pub fn total_comments(&self) -> usize {
        tree::count_total_comments(&self.comments)
    }

    pub fn walk(&self) -> tree::Walk<'_> {
        tree::walk(&self.comments)
    }

    pub fn max_depth(&self) -> usize {
        tree::max_depth(&self.comments)
    }

    pub fn count_label(&self) -> String {
        count_label(self.total_comments())
    }
}

/// Display form of a comment total, eg. "42 comments"
pub fn count_label(total: usize) -> String {
    match total {
        0 => String::from("no comments"),
        1 => String::from("1 comment"),
        n => format!("{n} comments"),
    }
}
