use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use feuilleton_api::{Comment, CommentRow, Discussion, Thread};
use tracing_subscriber::EnvFilter;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Layout of JSON output: `compact` or `pretty`
    #[structopt(long, env = "FEUILLETON_JSON_STYLE", default_value = "compact")]
    json_style: JsonStyle,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Count all comments of a thread, replies included
    Count {
        /// Thread export (`-` for stdin)
        file: PathBuf,
    },

    /// Print a thread as an indented outline
    Tree {
        /// Thread export (`-` for stdin)
        file: PathBuf,
    },

    /// Nest flat comment rows into a thread
    Nest {
        /// What the comments belong to, eg. `post:<uuid>`
        #[structopt(short, long)]
        discussion: Discussion,

        /// JSON array of comment rows (`-` for stdin)
        file: PathBuf,
    },
}

#[derive(Clone, Copy)]
enum JsonStyle {
    Compact,
    Pretty,
}

impl FromStr for JsonStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<JsonStyle> {
        match s {
            "compact" => Ok(JsonStyle::Compact),
            "pretty" => Ok(JsonStyle::Pretty),
            _ => Err(anyhow::anyhow!("unknown json style {:?}", s)),
        }
    }
}

/// Thread exports come either whole or as the bare list of top-level comments
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ThreadFile {
    Thread(Thread),
    Comments(Vec<Comment>),
}

impl ThreadFile {
    fn into_comments(self) -> Vec<Comment> {
        match self {
            ThreadFile::Thread(t) => t.comments,
            ThreadFile::Comments(c) => c,
        }
    }
}

fn read_input(path: &Path, mut stdin: impl Read) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        stdin
            .read_to_string(&mut input)
            .context("reading standard input")?;
        Ok(input)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }
}

fn read_comments(path: &Path, stdin: impl Read) -> anyhow::Result<Vec<Comment>> {
    let input = read_input(path, stdin)?;
    let file: ThreadFile = serde_json::from_str(&input)
        .with_context(|| format!("parsing thread from {:?}", path))?;
    let comments = file.into_comments();
    feuilleton_api::check_depth(&comments)
        .with_context(|| format!("checking thread from {:?}", path))?;
    tracing::debug!(top_level = comments.len(), "loaded thread");
    Ok(comments)
}

fn outline_line(depth: usize, c: &Comment) -> String {
    let mut line = format!(
        "{}- {} ({})",
        "  ".repeat(depth),
        c.author.name,
        c.author.role.label()
    );
    if let Some(target) = &c.reply_to {
        line.push_str(&format!(" @{}", target.name));
    }
    let likes = c.like_count();
    if likes > 0 {
        line.push_str(&format!(" [{likes} likes]"));
    }
    line.push_str(": ");
    line.push_str(c.content.lines().next().unwrap_or(""));
    line
}

fn count(file: &Path, stdin: impl Read, out: &mut impl Write) -> anyhow::Result<()> {
    let comments = read_comments(file, stdin)?;
    let total = feuilleton_api::count_total_comments(&comments);
    writeln!(out, "{total}\t{}", feuilleton_api::count_label(total)).context("writing count")
}

fn tree(file: &Path, stdin: impl Read, out: &mut impl Write) -> anyhow::Result<()> {
    let comments = read_comments(file, stdin)?;
    for (depth, c) in feuilleton_api::walk(&comments) {
        writeln!(out, "{}", outline_line(depth, c)).context("writing outline")?;
    }
    Ok(())
}

fn nest(
    discussion: Discussion,
    file: &Path,
    style: JsonStyle,
    stdin: impl Read,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let input = read_input(file, stdin)?;
    let rows: Vec<CommentRow> = serde_json::from_str(&input)
        .with_context(|| format!("parsing comment rows from {:?}", file))?;
    // bounded depth from here on, so serializing cannot run out of stack
    let thread = Thread::from_rows(discussion, rows)
        .with_context(|| format!("nesting comment rows for {}", discussion))?;
    tracing::info!(
        %discussion,
        total = thread.total_comments(),
        depth = thread.max_depth(),
        "nested thread"
    );
    let json = match style {
        JsonStyle::Compact => serde_json::to_string(&thread),
        JsonStyle::Pretty => serde_json::to_string_pretty(&thread),
    }
    .context("serializing thread")?;
    writeln!(out, "{json}").context("writing thread")
}

fn run(opt: Opt, stdin: impl Read, out: &mut impl Write) -> anyhow::Result<()> {
    match opt.cmd {
        Command::Count { file } => count(&file, stdin, out),
        Command::Tree { file } => tree(&file, stdin, out),
        Command::Nest { discussion, file } => nest(discussion, &file, opt.json_style, stdin, out),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    run(opt, io::stdin().lock(), &mut io::stdout().lock())
}
