use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

mod comment;
mod error;
mod fuzz;
mod likes;
mod thread;
mod tree;
mod user;

pub use comment::{Comment, CommentId};
pub use error::Error;
pub use likes::Likes;
pub use thread::{count_label, ChapterId, CommentRow, Discussion, NovelId, PostId, Thread};
pub use tree::{
    add_reply, check_depth, count_total_comments, find, find_mut, max_depth, remove, walk, Walk,
    MAX_REPLY_DEPTH,
};
pub use user::{Avatar, ReplyTarget, Role, UserId, UserRef};
