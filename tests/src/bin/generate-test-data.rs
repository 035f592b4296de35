use anyhow::Context;
use chrono::{Duration, Utc};
use feuilleton_api::{
    Avatar, CommentId, CommentRow, Discussion, Likes, PostId, Role, Thread, UserId, UserRef, Uuid,
};
use rand::{seq::SliceRandom, Rng};

const USER_NAMES: &[&str] = &[
    "mio", "ritsu", "yui", "azusa", "tsumugi", "nodoka", "sawako", "ui", "jun",
];

const NUM_TOP_LEVEL: usize = 20;
const NUM_REPLIES: usize = 180;

const COMMENT_MIN_WORDS: usize = 3;
const COMMENT_MAX_WORDS: usize = 60;

// reply to the latest comments more often than to old ones, to get long chains
const RECENT_WINDOW: usize = 8;
const RECENT_CHANCE: f64 = 0.6;

// stays well under the nesting serde_json accepts when reading the output back
const MAX_DEPTH: usize = 24;

const MAX_LIKES: usize = 6;

fn gen_user(rng: &mut impl Rng, i: usize) -> UserRef {
    let role = *[Role::Reader, Role::Reader, Role::Reader, Role::Author, Role::Moderator]
        .choose(rng)
        .unwrap_or(&Role::Reader);
    let mut user = UserRef::new(UserId(Uuid::new_v4()), String::from(USER_NAMES[i]), role);
    if rng.gen_bool(0.5) {
        user.avatar = Some(Avatar(format!("avatar-{}", rng.gen_range(1..=12))));
    }
    user
}

fn gen_likes(rng: &mut impl Rng, users: &[UserRef]) -> Option<Likes> {
    if rng.gen_bool(0.3) {
        return None;
    }
    let mut likes = Likes::default();
    let count = rng.gen_range(0..=MAX_LIKES);
    for u in users.choose_multiple(rng, count) {
        likes.like(u.id);
    }
    Some(likes)
}

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();

    let users = (0..USER_NAMES.len())
        .map(|i| gen_user(&mut rng, i))
        .collect::<Vec<_>>();

    let start = Utc::now() - Duration::days(30);
    let mut rows: Vec<CommentRow> = Vec::with_capacity(NUM_TOP_LEVEL + NUM_REPLIES);
    let mut depths: Vec<usize> = Vec::with_capacity(NUM_TOP_LEVEL + NUM_REPLIES);
    for i in 0..NUM_TOP_LEVEL + NUM_REPLIES {
        let parent = match i < NUM_TOP_LEVEL {
            true => None,
            false if rng.gen_bool(RECENT_CHANCE) => {
                Some(rng.gen_range(i.saturating_sub(RECENT_WINDOW)..i))
            }
            false => Some(rng.gen_range(0..i)),
        };
        let parent = match parent {
            Some(p) if depths[p] >= MAX_DEPTH => Some(rng.gen_range(0..NUM_TOP_LEVEL)),
            p => p,
        };
        depths.push(parent.map(|p| depths[p] + 1).unwrap_or(1));
        let author = users.choose(&mut rng).context("no users generated")?.clone();
        let parent_id = parent.map(|p| rows[p].id);
        let reply_to = parent.map(|p| rows[p].author.as_reply_target());
        rows.push(CommentRow {
            id: CommentId(Uuid::new_v4()),
            parent_id,
            reply_to,
            author,
            content: lipsum::lipsum_words(rng.gen_range(COMMENT_MIN_WORDS..=COMMENT_MAX_WORDS)),
            created_at: start + Duration::minutes(i as i64 * 7),
            likes: gen_likes(&mut rng, &users),
        });
    }
    rows.shuffle(&mut rng);

    let thread = Thread::from_rows(Discussion::Post(PostId(Uuid::new_v4())), rows)
        .context("nesting generated rows")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&thread).context("serializing generated thread")?
    );
    Ok(())
}
