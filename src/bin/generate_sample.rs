//! Writes a deterministic demo dataset (`bank-sample.csv`, semicolon
//! delimited) for exercising the dashboard by hand.

use anyhow::{Context, Result};

const JOBS: [&str; 6] = [
    "admin.",
    "blue-collar",
    "technician",
    "services",
    "management",
    "retired",
];
const MARITAL: [&str; 3] = ["married", "single", "divorced"];
const YES_NO_UNKNOWN: [&str; 3] = ["no", "yes", "unknown"];
const CONTACT: [&str; 2] = ["cellular", "telephone"];
const MONTHS: [&str; 10] = [
    "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const DAYS: [&str; 5] = ["mon", "tue", "wed", "thu", "fri"];

/// Minimal deterministic PRNG (xorshift64*), enough for sample data.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "bank-sample.csv";

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "age",
        "job",
        "marital",
        "default",
        "housing",
        "loan",
        "contact",
        "month",
        "day_of_week",
        "y",
    ])?;

    let n_rows = 500;
    for _ in 0..n_rows {
        let age = 18 + rng.below(70);
        // Retirees skew old, and acceptance is rarer than refusal.
        let job = if age > 65 { "retired" } else { rng.pick(&JOBS) };
        let y = if rng.below(10) == 0 { "yes" } else { "no" };

        writer.write_record([
            age.to_string().as_str(),
            job,
            rng.pick(&MARITAL),
            rng.pick(&YES_NO_UNKNOWN),
            rng.pick(&YES_NO_UNKNOWN),
            rng.pick(&YES_NO_UNKNOWN),
            rng.pick(&CONTACT),
            rng.pick(&MONTHS),
            rng.pick(&DAYS),
            y,
        ])?;
    }

    writer.flush().context("flushing sample file")?;
    println!("Wrote {n_rows} rows to {output_path}");
    Ok(())
}
