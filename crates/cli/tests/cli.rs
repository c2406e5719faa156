use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

fn libris(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("libris").unwrap();
    cmd.env("LIBRIS_ENV", "local")
        .env("LIBRIS_CONFIG_DIR", dir)
        .env("LIBRIS_SESSION__BACKEND", "file")
        .env("LIBRIS_SESSION__PATH", dir.join("session.json"))
        .env("RUST_LOG", "off")
        .current_dir(dir);
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn failure(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn lists_seeded_books() {
    let dir = TempDir::new().unwrap();
    let out = stdout(libris(dir.path()).args(["books", "list"]));

    assert_eq!(out.lines().count(), 6);
    assert!(out.starts_with("b1\tTo Kill a Mockingbird\tHarper Lee\t1960\tFiction\tavailable"));
    assert!(out.contains("b2\t1984\tGeorge Orwell\t1949\tDystopian\tborrowed"));
}

#[test]
fn search_combines_filters() {
    let dir = TempDir::new().unwrap();

    let fiction = stdout(libris(dir.path()).args(["books", "search", "--genre", "fiction"]));
    let ids: Vec<_> = fiction.lines().map(|l| l.split('\t').next().unwrap()).collect();
    assert_eq!(ids, vec!["b1", "b3", "b5"]);

    let mismatch = ["books", "search", "--title", "1984", "--year", "1950"];
    let none = stdout(libris(dir.path()).args(mismatch));
    assert!(none.is_empty());
}

#[test]
fn search_rejects_non_numeric_year() {
    let dir = TempDir::new().unwrap();
    let out = failure(libris(dir.path()).args(["books", "search", "--year", "soon"]));
    assert!(out.contains("[!!] Invalid input"));
}

#[test]
fn facets_list_genres_and_years() {
    let dir = TempDir::new().unwrap();
    let out = stdout(libris(dir.path()).args(["books", "facets"]));
    assert!(out.contains("genres: Fiction, Dystopian, Romance"));
    assert!(out.contains("years: 1960, 1951, 1949, 1932, 1925, 1813"));
}

#[test]
fn session_survives_between_runs() {
    let dir = TempDir::new().unwrap();

    let login = stdout(libris(dir.path()).args(["login", "jane@example.com"]));
    assert!(login.contains("Welcome back, Jane Smith!"));

    let whoami = stdout(libris(dir.path()).arg("whoami"));
    assert_eq!(whoami.trim(), "Jane Smith <jane@example.com> (u2)");

    let logout = stdout(libris(dir.path()).arg("logout"));
    assert!(logout.contains("Logged out"));
    assert_eq!(stdout(libris(dir.path()).arg("whoami")).trim(), "not signed in");
}

#[test]
fn unknown_login_fails() {
    let dir = TempDir::new().unwrap();
    let out = failure(libris(dir.path()).args(["login", "nobody@x.com", "--password", "pw"]));
    assert!(out.contains("[!!] Login failed: Invalid email or password"));
    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn duplicate_signup_fails() {
    let dir = TempDir::new().unwrap();
    let out = failure(libris(dir.path()).args(["signup", "Johnny", "john@example.com"]));
    assert!(out.contains("Email already in use"));
}

const ADD_DUNE: [&str; 10] = [
    "books",
    "add",
    "--title",
    "Dune",
    "--author",
    "Frank Herbert",
    "--year",
    "1965",
    "--genre",
    "Science Fiction",
];

#[test]
fn mutations_require_sign_in() {
    let dir = TempDir::new().unwrap();
    let out = failure(libris(dir.path()).args(ADD_DUNE));
    assert!(out.contains("Sign in required"));
}

#[test]
fn signed_in_user_can_change_books() {
    let dir = TempDir::new().unwrap();
    stdout(libris(dir.path()).args(["signup", "Ada", "ada@x.com"]));

    let added = stdout(libris(dir.path()).args(ADD_DUNE));
    assert!(added.contains("b7\tDune\tFrank Herbert\t1965\tScience Fiction\tavailable"));
    assert!(added.contains("\"Dune\" has been added to the library"));

    let toggled = stdout(libris(dir.path()).args(["books", "toggle", "b1"]));
    assert!(toggled.contains("Book borrowed"));
    assert!(toggled.contains("b1\tTo Kill a Mockingbird\tHarper Lee\t1960\tFiction\tborrowed"));

    let deleted = stdout(libris(dir.path()).args(["books", "delete", "b2"]));
    assert!(deleted.contains("\"1984\" has been removed from the library"));

    let missing = failure(libris(dir.path()).args(["books", "edit", "b99", "--title", "Ghost"]));
    assert!(missing.contains("No book with id \"b99\""));
}

#[test]
fn records_filter_by_book() {
    let dir = TempDir::new().unwrap();

    let all = stdout(libris(dir.path()).arg("records"));
    assert_eq!(all.lines().count(), 3);

    let b1 = stdout(libris(dir.path()).args(["records", "--book", "b1"]));
    assert_eq!(b1.trim(), "br3\tb1\tu1\t2023-03-20\t2023-04-05");
}
