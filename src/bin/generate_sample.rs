//! Writes a pair of local floor feeds plus a config that points at them,
//! so the dashboard can run without network access:
//!
//! ```text
//! cargo run --bin generate_sample && cp sample/floor-tracker.json .
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::json;

const OUT_DIR: &str = "sample";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// One tag wandering around a floor plan.
struct Walker {
    tag: &'static str,
    x: f64,
    y: f64,
}

impl Walker {
    fn step(&mut self, rng: &mut SimpleRng) {
        self.x = (self.x + rng.uniform(-1.5, 1.5)).clamp(-9.0, 39.0);
        self.y = (self.y + rng.uniform(-1.5, 1.5)).clamp(1.0, 49.0);
    }
}

fn write_floor(
    path: &Path,
    walkers: &mut [Walker],
    start: NaiveDateTime,
    fixes: usize,
    rng: &mut SimpleRng,
) -> Result<usize> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Tag", "X", "Y", "Timestamp", "Anchor"])?;

    let mut written = 0;
    for i in 0..fixes {
        let ts = start + Duration::seconds(30 * i as i64);
        let walker = &mut walkers[i % walkers.len()];
        walker.step(rng);

        // Every so often emit the kinds of rows a live sheet accumulates.
        let (x, y, stamp) = match i % 97 {
            13 => ("n/a".to_string(), format!("{:.2}", walker.y), ts.to_string()),
            41 => (format!("{:.2}", walker.x), format!("{:.2}", walker.y), String::new()),
            67 => (format!("{:.2}", walker.x), String::new(), "not a time".to_string()),
            _ => (
                format!("{:.2}", walker.x),
                format!("{:.2}", walker.y),
                ts.format("%m/%d/%Y %H:%M:%S").to_string(),
            ),
        };
        let anchor = format!("A{}", rng.next_u64() % 4);
        writer.write_record([
            walker.tag,
            x.as_str(),
            y.as_str(),
            stamp.as_str(),
            anchor.as_str(),
        ])?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let out = Path::new(OUT_DIR);
    std::fs::create_dir_all(out).with_context(|| format!("creating {OUT_DIR}/"))?;

    let start = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .context("building start time")?;

    let mut second = [
        Walker { tag: "Tag1", x: 5.0, y: 10.0 },
        Walker { tag: "Tag2", x: 25.0, y: 30.0 },
        Walker { tag: "Cart-7", x: 0.0, y: 45.0 },
    ];
    let mut third = [
        Walker { tag: "Tag1", x: 30.0, y: 5.0 },
        Walker { tag: "Badge-12", x: 10.0, y: 20.0 },
    ];

    let n2 = write_floor(&out.join("2nd.csv"), &mut second, start, 600, &mut rng)?;
    let n3 = write_floor(
        &out.join("3rd.csv"),
        &mut third,
        start + Duration::minutes(7),
        400,
        &mut rng,
    )?;

    let config = json!({
        "feeds": {
            "2nd": { "file": format!("{OUT_DIR}/2nd.csv") },
            "3rd": { "file": format!("{OUT_DIR}/3rd.csv") },
        }
    });
    let config_path = out.join("floor-tracker.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", config_path.display()))?;

    println!(
        "Wrote {n2} rows to {OUT_DIR}/2nd.csv, {n3} rows to {OUT_DIR}/3rd.csv and {}",
        config_path.display()
    );
    Ok(())
}
