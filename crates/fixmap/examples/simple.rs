//! Decode a small people feed into plain string and float fields.
//!
//! Run with `RUST_LOG=fixmap_core=trace` to see each field being sliced.

use anyhow::{Context, Result};
use fixmap::Record;
use tracing_subscriber::EnvFilter;

const INPUT: &str = "
Olivia Parker       199703221112223331550.85   
Liam Evans          19891008444555666675.25   
Emma Ward           200307137778889991200.00  
Noah Scott          19910601333222555999.99   
Amelia Ross         19861127666555444400.45   
";

#[derive(Debug, Default, Record)]
struct Person {
    #[fixmap(range = "0,20")]
    full_name: String,
    #[fixmap(range = "20,28")]
    birth_date: String,
    #[fixmap(range = "28,37")]
    ssn: String,
    #[fixmap(range = "37,-1")]
    income: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    for (number, line) in INPUT.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let person: Person = fixmap::from_line(line)
            .with_context(|| format!("Failed to decode line {}", number + 1))?;
        println!("{:?}", person);
    }

    Ok(())
}
