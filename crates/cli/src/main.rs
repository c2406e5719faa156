use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use libris_app::{search, Book, BookPatch, BookStatus, Library, NewBook, SearchQuery};
use libris_events::{Notification, NotificationLog, Severity};
use libris_kernel::{CoreResult, Settings};
use time::OffsetDateTime;

#[derive(Parser)]
#[command(name = "libris", version, about = "Browse and manage the library catalogue")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List, search, and change books
    Books {
        #[command(subcommand)]
        command: BooksCommand,
    },
    /// Show borrow records
    Records {
        /// Only records for this book
        #[arg(long)]
        book: Option<String>,
    },
    /// Sign in by email
    Login {
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        name: String,
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
enum BooksCommand {
    List,
    Search(SearchArgs),
    /// Genres and years available as search filters
    Facets,
    Add(AddArgs),
    Edit {
        id: String,
        #[command(flatten)]
        changes: EditArgs,
    },
    Delete {
        id: String,
    },
    /// Borrow an available book or return a borrowed one
    Toggle {
        id: String,
    },
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    author: String,
    #[arg(long, default_value = "")]
    year: String,
    #[arg(long, default_value = "")]
    genre: String,
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long, allow_negative_numbers = true)]
    year: i32,
    #[arg(long)]
    genre: String,
    #[arg(long, default_value_t = BookStatus::Returned)]
    status: BookStatus,
}

#[derive(Args)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    year: Option<i32>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    status: Option<BookStatus>,
}

impl From<EditArgs> for BookPatch {
    fn from(args: EditArgs) -> Self {
        BookPatch {
            title: args.title,
            author: args.author,
            year: args.year,
            genre: args.genre,
            status: args.status,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    tracing::debug!(env = ?settings.environment, "libris bootstrap starting");

    let log = Arc::new(NotificationLog::new());
    let storage = libris_db::from_settings(&settings.session);
    let mut library = Library::init(&settings, log.clone(), storage)?;

    let outcome = run(cli.command, &mut library);

    let notifications = log.drain();
    for notification in &notifications {
        print_notification(notification);
    }

    if let Err(err) = outcome {
        if notifications.is_empty() {
            print_notification(&Notification::from_error(&err));
        }
        return Err(err).with_context(|| "command failed");
    }

    library.shutdown()
}

fn run(command: Command, library: &mut Library) -> CoreResult<()> {
    match command {
        Command::Books { command } => run_books(command, library),
        Command::Records { book } => {
            let records = match book {
                Some(book_id) => library.books().records_for_book(&book_id),
                None => library.books().borrow_records(),
            };
            for record in records {
                let returned = record
                    .return_date
                    .map_or_else(|| "outstanding".to_string(), |date| date.to_string());
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    record.id, record.book_id, record.user_id, record.borrow_date, returned
                );
            }
            Ok(())
        }
        Command::Login { email, password } => {
            library.session_mut().login(&email, &password)?;
            Ok(())
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            library.session_mut().signup(&name, &email, &password)?;
            Ok(())
        }
        Command::Logout => {
            library.session_mut().logout();
            Ok(())
        }
        Command::Whoami => {
            match library.session().current_user() {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.id),
                None => println!("not signed in"),
            }
            Ok(())
        }
    }
}

fn run_books(command: BooksCommand, library: &mut Library) -> CoreResult<()> {
    match command {
        BooksCommand::List => print_books(&library.books().list_books()),
        BooksCommand::Search(args) => {
            let query = SearchQuery::from_form(&args.title, &args.author, &args.year, &args.genre)?;
            print_books(&library.books().search(&query));
        }
        BooksCommand::Facets => {
            let books = library.books().list_books();
            println!("genres: {}", search::genres(&books).join(", "));
            let years: Vec<String> = search::years(&books).iter().map(i32::to_string).collect();
            println!("years: {}", years.join(", "));
        }
        BooksCommand::Add(args) => {
            library.session().require_user()?;
            let data = NewBook::new(args.title, args.author, args.year, args.genre)
                .with_status(args.status);
            let book = library.books_mut().add_book(data)?;
            print_books(&[book]);
        }
        BooksCommand::Edit { id, changes } => {
            library.session().require_user()?;
            let book = library.books_mut().edit_book(&id, changes.into())?;
            print_books(&[book]);
        }
        BooksCommand::Delete { id } => {
            library.session().require_user()?;
            library.books_mut().delete_book(&id)?;
        }
        BooksCommand::Toggle { id } => {
            let user_id = library.session().require_user()?.id.clone();
            let book = library.books_mut().toggle_book_status(&id)?;
            let today = OffsetDateTime::now_utc().date();

            match book.status {
                BookStatus::Borrowed => {
                    library.books_mut().record_borrow(&book.id, &user_id, today)?;
                }
                BookStatus::Returned => {
                    let open = library
                        .books()
                        .records_for_book(&book.id)
                        .into_iter()
                        .find(|record| record.is_outstanding());
                    if let Some(record) = open {
                        library.books_mut().record_return(&record.id, today)?;
                    }
                }
            }
            print_books(&[book]);
        }
    }
    Ok(())
}

fn print_books(books: &[Book]) {
    for book in books {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            book.id,
            book.title,
            book.author,
            book.year,
            book.genre,
            book.status.display_label()
        );
    }
}

fn print_notification(notification: &Notification) {
    let marker = match notification.severity {
        Severity::Success => "ok",
        Severity::Destructive => "!!",
    };
    println!("[{marker}] {}: {}", notification.title, notification.description);
}
