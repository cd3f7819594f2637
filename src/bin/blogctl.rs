//! A terminal front end for the blog, built on the same view-model a browser front end would use.
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use cryptoblog::client::{
    view::byline, Backend, BlogView, CategoryFilter, DraftField, HttpBackend,
};
use cryptoblog::datastore::Post;
use std::fmt::Display;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "blogctl")]
#[command(about = "Read and write posts on a cryptoblog server", long_about = None)]
struct Cli {
    /// Where the blog API is served, e.g. http://127.0.0.1:8080
    base_url: Url,

    /// Log remote calls and their failures to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Ask whether the store is up
    Health,

    /// Show posts, oldest first
    List {
        /// Only show this exact category ("all" shows everything)
        category: Option<String>,
    },

    /// Publish a post
    Create {
        title: String,
        author: String,
        category: String,
        body: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Failures are printed once by `run`; the view-model's own logs are only for --verbose.
    let max_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();

    let backend = match HttpBackend::new(cli.base_url.as_str()) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(2);
        }
    };
    let outcome = actix_rt::System::new().block_on(run(
        backend,
        cli.command,
        &mut io::stdout(),
        &mut io::stderr(),
    ));
    outcome.unwrap_or_else(|e| {
        eprintln!("{}", e);
        ExitCode::FAILURE
    })
}

async fn run<B, O, E>(backend: B, command: Command, out: &mut O, err: &mut E) -> io::Result<ExitCode>
where
    B: Backend,
    O: Write,
    E: Write,
{
    match command {
        Command::Health => match backend.health_check().await {
            Ok(status) => {
                writeln!(out, "{}", status)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                writeln!(err, "{:#}", e)?;
                Ok(ExitCode::FAILURE)
            }
        },
        Command::List { category } => {
            let mut view = BlogView::mount(backend).await;
            if let Some(e) = view.last_error() {
                writeln!(err, "{}", e)?;
                return Ok(ExitCode::FAILURE);
            }
            if let Some(category) = category {
                view.select_category(category.as_str().into());
            }
            render(out, &view.visible_posts(), view.category(), &Local)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Create {
            title,
            author,
            category,
            body,
        } => {
            let mut view = BlogView::mount(backend).await;
            view.open_dialog();
            view.edit(DraftField::Title, title);
            view.edit(DraftField::Author, author);
            view.edit(DraftField::Category, category);
            view.edit(DraftField::Body, body);
            match view.submit().await {
                Some(id) => {
                    writeln!(out, "created post {} ({} posts now)", id, view.posts().len())?;
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    writeln!(err, "{}", view.last_error().unwrap_or("couldn't create post"))?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn render<W, Tz>(out: &mut W, posts: &[&Post], category: &CategoryFilter, tz: &Tz) -> io::Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if posts.is_empty() {
        return writeln!(out, "No posts in {}.", category);
    }
    for post in posts {
        writeln!(out, "#{} {} [{}]", post.id, post.title, post.category)?;
        writeln!(out, "{}", byline(post, tz))?;
        writeln!(out, "{}\n", post.body)?;
    }
    Ok(())
}
