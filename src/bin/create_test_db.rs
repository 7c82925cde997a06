use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;

use financas_rs::{
    AppConfig,
    models::{TransactionBuilder, TransactionType},
    services::{Registration, TransactionService, UserService},
    stores::sqlite::create_app_state,
};

/// A utility for creating a test database for the REST API server of financas_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let config = AppConfig::default();
    let state = create_app_state(conn, config)?;

    println!("Creating test user...");
    let mut user_service = UserService::new(state.user_store.clone(), config.password_hash_cost);
    let user = user_service.register(Registration {
        name: "Test User".to_string(),
        email: "test@test.com".to_string(),
        password: "test".to_string(),
    })?;

    println!("Creating test transactions...");
    let mut transaction_service =
        TransactionService::new(state.transaction_store.clone(), config.balance_policy);
    let samples = [
        ("Salário", Decimal::new(500000, 2), TransactionType::Income),
        ("Aluguel", Decimal::new(150000, 2), TransactionType::Expense),
        ("Mercado", Decimal::new(43215, 2), TransactionType::Expense),
        ("Freelance", Decimal::new(80000, 2), TransactionType::Income),
    ];

    for month in 1..=3 {
        for (description, amount, transaction_type) in samples {
            transaction_service.save(
                TransactionBuilder::new(description, amount)
                    .period(month, 2024)
                    .transaction_type(transaction_type)
                    .user_id(user.id()),
            )?;
        }
    }

    println!(
        "Success! Log in as test@test.com with the password 'test'. Balance: {}",
        transaction_service.balance_for_owner(user.id())?
    );

    Ok(())
}
