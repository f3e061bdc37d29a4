//! Synthetic `ProductCode;Category` dataset generator.
//!
//! Row count and output path are read from the environment rather than
//! parsed from CLI flags — there are only two scalar knobs, not enough to
//! earn an argument parser.

use std::fs::File;
use std::io::{BufWriter, Write};

const CATEGORIES: [&str; 5] = ["Electronics", "Clothing", "Books", "Home", "Sports"];

fn main() -> std::io::Result<()> {
    let rows: usize = std::env::var("DATASET_ROWS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);
    let path = std::env::var("DATASET_PATH").unwrap_or_else(|_| "productos100000.csv".to_string());

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "ProductCode;Category")?;
    for n in 0..rows {
        let category = CATEGORIES[n % CATEGORIES.len()];
        writeln!(writer, "PROD{n:06};{category}")?;
    }
    writer.flush()?;

    eprintln!("wrote {rows} rows to {path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_cycle_in_order() {
        let expected = ["Electronics", "Clothing", "Books", "Home", "Sports", "Electronics"];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(CATEGORIES[n % CATEGORIES.len()], *want);
        }
    }
}
