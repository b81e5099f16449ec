//! # Seed Data Generator
//!
//! Populates the database with books and customers for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 books and 50 customers (default)
//! cargo run -p bookstore-db --bin seed
//!
//! # Generate a custom number of books
//! cargo run -p bookstore-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p bookstore-db --bin seed -- --db ./data/bookstore.db
//! ```
//!
//! ## Generated Data
//! - Books cycle through a catalog of real titles; repeats get an edition
//!   suffix and a distinct ISBN-13 (`979` prefix, not checksum-valid)
//! - Prices $4.99 - $39.99, stock 0 - 40
//! - One customer per four books

use bookstore_core::validation::{validate_book, validate_customer};
use bookstore_core::{BookInput, CustomerInput};
use bookstore_db::{Database, DbConfig};
use chrono::NaiveDate;
use std::env;

/// (title, author, category, publisher)
const CATALOG: &[(&str, &str, &str, &str)] = &[
    ("Pride and Prejudice", "Jane Austen", "Classics", "T. Egerton"),
    ("Emma", "Jane Austen", "Classics", "John Murray"),
    ("Moby-Dick", "Herman Melville", "Classics", "Harper & Brothers"),
    ("Dune", "Frank Herbert", "Science Fiction", "Chilton Books"),
    ("Foundation", "Isaac Asimov", "Science Fiction", "Gnome Press"),
    ("Neuromancer", "William Gibson", "Science Fiction", "Ace"),
    ("The Hobbit", "J.R.R. Tolkien", "Fantasy", "George Allen & Unwin"),
    ("A Wizard of Earthsea", "Ursula K. Le Guin", "Fantasy", "Parnassus Press"),
    ("The Name of the Wind", "Patrick Rothfuss", "Fantasy", "DAW Books"),
    ("Gone Girl", "Gillian Flynn", "Mystery", "Crown"),
    ("The Big Sleep", "Raymond Chandler", "Mystery", "Alfred A. Knopf"),
    ("Sapiens", "Yuval Noah Harari", "History", "Harvill Secker"),
    ("The Guns of August", "Barbara W. Tuchman", "History", "Macmillan"),
    ("Thinking, Fast and Slow", "Daniel Kahneman", "Psychology", "Farrar, Straus and Giroux"),
    ("The Pragmatic Programmer", "Andrew Hunt", "Technology", "Addison-Wesley"),
    ("Structure and Interpretation of Computer Programs", "Harold Abelson", "Technology", "MIT Press"),
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Barbara", "Edsger", "Frances", "Donald", "Margaret", "Ken", "Radia",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Liskov", "Dijkstra", "Allen", "Knuth", "Hamilton", "Thompson",
    "Perlman",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./bookstore.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bookstore Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of books to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./bookstore.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let customer_count = (count / 4).max(1);

    println!("🌱 Bookstore Seed Data Generator");
    println!("================================");
    println!("Database:  {}", db_path);
    println!("Books:     {}", count);
    println!("Customers: {}", customer_count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating books...");

    let start = std::time::Instant::now();
    let mut books = 0;

    for seed in 0..count {
        let input = generate_book(seed);
        if let Err(e) = validate_book(&input) {
            eprintln!("Skipping invalid book {}: {}", input.isbn, e);
            continue;
        }

        if let Err(e) = db.books().insert(&input).await {
            eprintln!("Failed to insert {}: {}", input.isbn, e);
            continue;
        }

        books += 1;
        if books % 100 == 0 {
            println!("  Generated {} books...", books);
        }
    }

    println!("Generating customers...");

    let mut customers = 0;
    for seed in 0..customer_count {
        let input = generate_customer(seed);
        if let Err(e) = validate_customer(&input) {
            eprintln!("Skipping invalid customer {}: {}", input.email, e);
            continue;
        }

        if let Err(e) = db.customers().insert(&input).await {
            eprintln!("Failed to insert {}: {}", input.email, e);
            continue;
        }
        customers += 1;
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} books and {} customers in {:?}",
        books, customers, elapsed
    );

    let low = db.books().low_stock(5).await?;
    println!("  Low stock (<= 5): {} books", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single book with realistic data.
fn generate_book(seed: usize) -> BookInput {
    let (title, author, category, publisher) = CATALOG[seed % CATALOG.len()];
    let edition = seed / CATALOG.len();

    let title = if edition == 0 {
        title.to_string()
    } else {
        format!("{} ({} ed.)", title, edition + 1)
    };

    // $4.99 - $39.99 in 50 cent steps
    let price_cents = 499 + ((seed * 37) % 71) as i64 * 50;

    let publish_date = NaiveDate::from_ymd_opt(1950 + (seed % 70) as i32, 1 + (seed % 12) as u32, 1);

    BookInput {
        title,
        author: author.to_string(),
        isbn: format!("979{:010}", seed),
        publisher: Some(publisher.to_string()),
        publish_date,
        description: None,
        price_cents,
        stock: (seed % 41) as i64,
        category: category.to_string(),
    }
}

/// Generates a single customer with a unique email.
fn generate_customer(seed: usize) -> CustomerInput {
    let first = FIRST_NAMES[seed % FIRST_NAMES.len()];
    let last = LAST_NAMES[(seed / FIRST_NAMES.len()) % LAST_NAMES.len()];

    CustomerInput {
        name: format!("{} {}", first, last),
        email: format!("{}.{}{}@example.com", first, last, seed).to_lowercase(),
        phone: Some(format!("555-{:04}", seed % 10_000)),
        address: None,
    }
}
