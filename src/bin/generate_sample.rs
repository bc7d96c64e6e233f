use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const SEED: u64 = 42;

#[derive(Debug, Serialize)]
struct SalaryRecord {
    rating: f64,
    company_name: &'static str,
    job_title: &'static str,
    salary: Option<f64>,
    salaries_reported: u32,
    location: &'static str,
    employment_status: &'static str,
    job_roles: &'static str,
}

#[derive(Debug, Serialize)]
struct MarketRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Region")]
    region: &'static str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Units Sold")]
    units_sold: u32,
    #[serde(rename = "Price")]
    price: f64,
}

const COMPANIES: [&str; 5] = ["Infosys", "TCS", "Wipro", "Accenture", "Mphasis"];
const LOCATIONS: [(&str, f64); 4] = [
    ("Bangalore", 1.15),
    ("Mumbai", 1.10),
    ("Pune", 1.0),
    ("Hyderabad", 0.95),
];
const ROLES: [(&str, &str, f64); 4] = [
    ("Software Engineer", "SDE", 900_000.0),
    ("Data Scientist", "Data Scientist", 1_100_000.0),
    ("Android Developer", "Android", 700_000.0),
    ("Web Developer", "Web", 550_000.0),
];
const STATUSES: [&str; 3] = ["Full Time", "Intern", "Contractor"];

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const CATEGORIES: [(&str, f64); 3] = [("Electronics", 250.0), ("Clothing", 40.0), ("Groceries", 8.0)];

fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}

fn salary_records(rng: &mut StdRng, n: usize) -> Vec<SalaryRecord> {
    (0..n)
        .map(|_| {
            let (location, loc_factor) = pick(rng, &LOCATIONS);
            let (job_title, job_roles, base) = pick(rng, &ROLES);
            let rating = (rng.random_range(2.5..5.0_f64) * 10.0).round() / 10.0;
            let noise = rng.random_range(-0.1..0.1);
            let salary = (base * loc_factor * (0.8 + 0.1 * rating) * (1.0 + noise)).round();
            SalaryRecord {
                rating,
                company_name: pick(rng, &COMPANIES),
                job_title,
                // roughly one in twenty salaries is unreported
                salary: (rng.random_range(0..20) != 0).then_some(salary),
                salaries_reported: rng.random_range(1..40),
                location,
                employment_status: pick(rng, &STATUSES),
                job_roles,
            }
        })
        .collect()
}

fn market_records(rng: &mut StdRng, days: u32) -> Vec<MarketRecord> {
    let mut out = Vec::new();
    for day in 0..days {
        // 2024 is a leap year; keep to January–March for simple date math.
        let (month, dom) = match day {
            0..=30 => (1, day + 1),
            31..=59 => (2, day - 30),
            _ => (3, day - 59),
        };
        let date = format!("2024-{month:02}-{dom:02}");
        for region in REGIONS {
            let (category, base_price) = pick(rng, &CATEGORIES);
            let price = (base_price * rng.random_range(0.85..1.15) * 100.0).round() / 100.0;
            let units_sold = (2_000.0 / price.sqrt() * rng.random_range(0.7..1.3)) as u32;
            out.push(MarketRecord {
                date: date.clone(),
                region,
                category,
                units_sold,
                price,
            });
        }
    }
    out
}

fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for record in records {
        writer.serialize(record).context("writing CSV record")?;
    }
    writer.flush().context("flushing CSV writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(SEED);

    let salaries = salary_records(&mut rng, 400);
    write_csv(Path::new("salary_sample.csv"), &salaries)?;
    log::info!("Wrote {} salary rows", salaries.len());

    let market = market_records(&mut rng, 90);
    write_csv(Path::new("market_sample.csv"), &market)?;
    log::info!("Wrote {} market rows", market.len());

    println!("Wrote salary_sample.csv and market_sample.csv");
    Ok(())
}
