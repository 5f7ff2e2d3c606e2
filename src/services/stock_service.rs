//! Mock stock prices: a seeded random walk per symbol

use chrono::{Duration, Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Days, SeriesTable, TimeSeriesRow};

/// Price units per unit-variance step
pub const STEP_SCALE: f64 = 5.0;
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Starting price for a symbol
pub fn base_price(symbol: &str) -> f64 {
    match symbol {
        "AAPL" => 180.0,
        "GOOGL" => 140.0,
        "MSFT" => 380.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

/// Standard normal sample (Box-Muller)
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // gen::<f64>() is in [0, 1); shift to (0, 1] so ln() stays finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Synthesizes price series; entropy-seeded unless a seed is given
#[derive(Debug, Clone, Default)]
pub struct MockStockGenerator {
    seed: Option<u64>,
}

impl MockStockGenerator {
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Reproducible output: equal seeds and inputs give equal tables
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn generate(&self, symbols: &[String], days: Days) -> SeriesTable {
        self.generate_at(symbols, days, Local::now().naive_local())
    }

    /// Generate `days` daily points per symbol, the last one at `now`
    pub fn generate_at(&self, symbols: &[String], days: Days, now: NaiveDateTime) -> SeriesTable {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let n = days.get() as i64;

        let mut rows = Vec::with_capacity(symbols.len() * n as usize);
        for symbol in symbols {
            let mut price = base_price(symbol);
            for i in 0..n {
                price += standard_normal(&mut rng) * STEP_SCALE;
                let timestamp = now - Duration::days(n - 1 - i);
                rows.push(TimeSeriesRow::new(timestamp, price, symbol.clone()));
            }
        }

        SeriesTable::from_rows(rows)
    }
}
