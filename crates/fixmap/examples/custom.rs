//! Decode the birth date column through a custom decoder.

use anyhow::{bail, Context, Result};
use fixmap::{BoxError, Decoder, DecoderConfig, Record, Unmarshal};
use std::fmt;
use tracing::info;
use tracing_subscriber::EnvFilter;

const INPUT: &str = "
Olivia Parker       199703221112223331550.85   
Liam Evans          19891008444555666675.25   
Emma Ward           200307137778889991200.00  
Noah Scott          19910601333222555999.99   
Amelia Ross         19861127666555444400.45   
";

/// Calendar date stored as `YYYYMMDD`
#[derive(Debug, Default, Clone, Copy)]
struct BirthDate {
    year: u16,
    month: u8,
    day: u8,
}

impl Unmarshal for BirthDate {
    fn unmarshal(&mut self, raw: &[u8]) -> std::result::Result<(), BoxError> {
        let text = std::str::from_utf8(raw)?;
        if text.len() != 8 {
            return Err(format!("expected YYYYMMDD, got {:?}", text).into());
        }

        let date = BirthDate {
            year: text[0..4].parse()?,
            month: text[4..6].parse()?,
            day: text[6..8].parse()?,
        };
        if !(1..=12).contains(&date.month) || !(1..=31).contains(&date.day) {
            return Err(format!("date out of range: {}", text).into());
        }

        *self = date;
        Ok(())
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Default, Record)]
struct Person {
    #[fixmap(range = "0,20")]
    full_name: String,
    #[fixmap(range = "20,28", custom)]
    birth_date: BirthDate,
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

    let decoder = Decoder::with_config(DecoderConfig::new().trim_strings(true));
    decoder
        .prepare::<Person>()
        .context("Person layout is invalid")?;

    let mut decoded = 0;
    for (number, line) in INPUT.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let person: Person = decoder
            .decode_new(line)
            .with_context(|| format!("Failed to decode line {}", number + 1))?;
        println!(
            "{} born {} (ssn {}, income {:.2})",
            person.full_name, person.birth_date, person.ssn, person.income
        );
        decoded += 1;
    }

    if decoded == 0 {
        bail!("No records found in input");
    }
    info!("Decoded {} records", decoded);

    Ok(())
}
