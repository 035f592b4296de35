use std::collections::BTreeSet;

use crate::UserId;

/// Engagement counter of a comment
///
/// `count` may be higher than `users.len()`: likes recorded before likers
/// were tracked only bumped the counter. It is never lower.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(from = "RawLikes")]
pub struct Likes {
    pub count: u64,
    pub users: BTreeSet<UserId>,
}

#[derive(serde::Deserialize)]
struct RawLikes {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    users: BTreeSet<UserId>,
}

impl From<RawLikes> for Likes {
    fn from(raw: RawLikes) -> Likes {
        let tracked = raw.users.len() as u64;
        let count = if raw.count < tracked {
            tracing::warn!(
                count = raw.count,
                tracked,
                "like counter lower than its set of likers, repairing"
            );
            tracked
        } else {
            raw.count
        };
        Likes {
            count,
            users: raw.users,
        }
    }
}

impl Likes {
    /// Returns whether `user` did not already like this
    pub fn like(&mut self, user: UserId) -> bool {
        let added = self.users.insert(user);
        if added {
            self.count += 1;
        }
        added
    }

    /// Returns whether `user` had liked this
    pub fn unlike(&mut self, user: &UserId) -> bool {
        let removed = self.users.remove(user);
        if removed {
            self.count = self.count.saturating_sub(1);
        }
        removed
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.users.contains(user)
    }
}
