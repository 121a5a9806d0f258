//! CLI binary for bloggen.
//!
//! A thin shim over the library crate: flags map onto `ClientConfig`, the
//! input drives one `GenerationForm`, and the result goes to stdout or a
//! file.

use anyhow::{Context, Result};
use bloggen::config::{DEFAULT_API_URL, ENV_API_URL, ENV_TIMEOUT_SECS};
use bloggen::{
    transform, write_markdown, write_markdown_in, Blog, ClientConfig, GenerationCallback,
    GenerationForm, GenerationState, HttpBlogService, LanguageCode, RenderNode, SourceKind, Toast,
    ToastKind,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Spinner callback ─────────────────────────────────────────────────────────

/// Shows a spinner while the service is working. A generation is a single
/// opaque call, so there is no count to report, only elapsed time.
struct SpinnerCallback {
    bar: ProgressBar,
}

impl SpinnerCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        Arc::new(Self { bar })
    }
}

impl GenerationCallback for SpinnerCallback {
    fn on_generation_start(&self, kind: SourceKind, input: &str) {
        self.bar.set_prefix("Generating");
        self.bar.set_message(match kind {
            SourceKind::Topic => format!("blog on “{input}”"),
            SourceKind::Video => format!("blog from {input}"),
        });
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_generation_complete(&self, _kind: SourceKind, blog: &Blog, elapsed_ms: u64) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}  {}",
            cyan("◆"),
            bold(&blog.title),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        );
    }

    fn on_generation_error(&self, _kind: SourceKind, _message: &str) {
        self.bar.finish_and_clear();
    }
}

// ── Arguments ────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Blog on a topic (stdout)
  bloggen "The Future of AI"

  # From a YouTube video, in French, to a file
  bloggen https://youtu.be/dQw4w9WgXcQ --language french -o post.md

  # Save into a directory under a name derived from the title
  bloggen "Rust ownership" -o drafts/

  # Structured output: the blog plus its render blocks
  bloggen "Async Rust" --json --render

  # Is the service up?
  bloggen --check

LANGUAGES:
  english (default), hindi, french, telugu, tamil, malayalam, japanese, chinese

ENVIRONMENT VARIABLES:
  BLOGGEN_API_URL        Service base URL (default http://localhost:8000)
  BLOGGEN_TIMEOUT_SECS   Request timeout in seconds (default 120)
  RUST_LOG               Overrides the log filter set by -v / -q
"#;

/// Generate blog posts from a topic or a YouTube video.
#[derive(Parser, Debug)]
#[command(
    name = "bloggen",
    version,
    about = "Generate blog posts from a topic or a YouTube video",
    long_about = "Send a topic or a YouTube URL to a blog generation service and print the \
resulting Markdown post. Use --render to see how the post breaks into text, code, table and \
image blocks.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Topic text or YouTube URL.
    #[arg(required_unless_present = "check")]
    input: Option<String>,

    /// How to read INPUT. `auto` treats anything starting with http(s):// as a video URL.
    #[arg(long, env = "BLOGGEN_SOURCE", value_enum, default_value = "auto")]
    source: SourceArg,

    /// Output language.
    #[arg(short, long, env = "BLOGGEN_LANGUAGE", default_value = "english",
          value_parser = LanguageCode::from_str)]
    language: LanguageCode,

    /// Generation service base URL.
    #[arg(long, env = ENV_API_URL, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = ENV_TIMEOUT_SECS, default_value_t = 120)]
    timeout: u64,

    /// Write Markdown to this file (or into this directory) instead of stdout.
    #[arg(short, long, env = "BLOGGEN_OUTPUT")]
    output: Option<PathBuf>,

    /// Print JSON instead of Markdown.
    #[arg(long, env = "BLOGGEN_JSON")]
    json: bool,

    /// Print the post as render blocks.
    #[arg(long, env = "BLOGGEN_RENDER")]
    render: bool,

    /// Query the service health endpoint and exit.
    #[arg(long)]
    check: bool,

    /// Disable the spinner.
    #[arg(long, env = "BLOGGEN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BLOGGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BLOGGEN_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SourceArg {
    Auto,
    Topic,
    Youtube,
}

impl SourceArg {
    fn resolve(self, input: &str) -> SourceKind {
        match self {
            SourceArg::Topic => SourceKind::Topic,
            SourceArg::Youtube => SourceKind::Video,
            SourceArg::Auto => {
                let s = input.trim_start();
                if s.starts_with("https://") || s.starts_with("http://") {
                    SourceKind::Video
                } else {
                    SourceKind::Topic
                }
            }
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    blog: &'a Blog,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<Vec<RenderNode>>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers what INFO would say; keep stderr clean while it runs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.check;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = ClientConfig::builder()
        .api_url(cli.api_url.as_str())
        .timeout_secs(cli.timeout)
        .build()
        .context("Invalid configuration")?;
    let service = HttpBlogService::new(config.clone()).context("Failed to start HTTP client")?;

    // ── Health check ─────────────────────────────────────────────────────
    if cli.check {
        let health = service
            .health()
            .await
            .with_context(|| format!("Health check against {} failed", config.api_url))?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&health).context("Failed to serialise health")?
            );
        } else {
            println!("Service:  {}", config.api_url);
            println!("Status:   {}", health.status);
            for route in &health.routes {
                println!("Route:    {route}");
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    // ── Generate ─────────────────────────────────────────────────────────
    let input = cli.input.clone().unwrap_or_default();
    let kind = cli.source.resolve(&input);

    let mut form = GenerationForm::new(kind);
    if show_progress {
        form = form.with_callback(SpinnerCallback::new());
    }
    form.set_language(cli.language);
    form.set_input(input);

    let state = form
        .submit(&service)
        .await
        .context("Generation could not start")?
        .clone();

    if !cli.quiet || matches!(state, GenerationState::Failed(_)) {
        if let Some(toast) = Toast::for_state(&state, Instant::now(), config.toast_duration()) {
            match toast.kind {
                ToastKind::Success => eprintln!("{} {}", green("✔"), toast.message),
                ToastKind::Error => eprintln!("{} {}", red("✘"), red(&toast.message)),
            }
        }
    }

    let GenerationState::Succeeded(blog) = state else {
        return Ok(ExitCode::FAILURE);
    };

    // ── Output ───────────────────────────────────────────────────────────
    if let Some(ref path) = cli.output {
        let written = if path.is_dir() {
            write_markdown_in(&blog, path).await
        } else {
            write_markdown(&blog, path).await.map(|_| path.clone())
        }
        .context("Failed to save blog")?;
        if !cli.quiet {
            eprintln!("   {}  {}", dim("→"), bold(&written.display().to_string()));
        }
    }

    if cli.json {
        let out = JsonOutput {
            blog: &blog,
            nodes: cli.render.then(|| transform(&blog.content)),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("Failed to serialise output")?
        );
    } else if cli.render {
        print_blocks(&blog).context("Failed to write to stdout")?;
    } else if cli.output.is_none() {
        let markdown = blog.to_markdown();
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet {
        if let Some(url) = blog.watch_url() {
            eprintln!("   {}  {}", dim("video"), url);
        }
        if let Some(thumb) = blog.thumbnail_url() {
            eprintln!("   {}  {}", dim("thumbnail"), thumb);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Terminal rendering of the post's blocks.
fn print_blocks(blog: &Blog) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}\n", bold(&blog.title))?;

    for node in transform(&blog.content) {
        match node {
            RenderNode::Text(text) => writeln!(out, "{text}\n")?,
            RenderNode::CodeBlock { language, code } => {
                writeln!(out, "{}", dim(&format!("```{}", language.unwrap_or_default())))?;
                writeln!(out, "{code}")?;
                writeln!(out, "{}\n", dim("```"))?;
            }
            RenderNode::Table { header_cells, rows } => {
                writeln!(out, "| {} |", bold(&header_cells.join(" | ")))?;
                writeln!(out, "|{}", "---|".repeat(header_cells.len()))?;
                for row in rows {
                    writeln!(out, "| {} |", row.join(" | "))?;
                }
                writeln!(out)?;
            }
            RenderNode::Image { src, alt, .. } => {
                writeln!(out, "{} {}\n", cyan(&format!("[image: {alt}]")), dim(&src))?;
            }
        }
    }
    Ok(())
}
