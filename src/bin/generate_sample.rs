use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const STAT_COLUMNS: [&str; 6] = ["HP", "Attack", "Defense", "Sp. Atk", "Sp. Def", "Speed"];

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Mean stats per archetype, in `STAT_COLUMNS` order.
const ARCHETYPES: [(&str, [f64; 6]); 4] = [
    ("Brute", [80.0, 110.0, 70.0, 45.0, 55.0, 60.0]),
    ("Wall", [90.0, 55.0, 120.0, 50.0, 110.0, 35.0]),
    ("Caster", [60.0, 45.0, 55.0, 110.0, 85.0, 80.0]),
    ("Runner", [55.0, 75.0, 50.0, 65.0, 55.0, 115.0]),
];

struct Creature {
    name: String,
    stats: [i64; 6],
}

impl Creature {
    fn total(&self) -> i64 {
        self.stats.iter().sum()
    }
}

fn generate(count_per_archetype: usize, rng: &mut SimpleRng) -> Vec<Creature> {
    let mut creatures = Vec::new();
    for (archetype, means) in &ARCHETYPES {
        for i in 0..count_per_archetype {
            // later evolutions get stronger
            let stage = 0.7 + 0.6 * (i % 3) as f64 / 2.0;
            let mut stats = [0i64; 6];
            for (slot, &mean) in stats.iter_mut().zip(means.iter()) {
                *slot = rng.gauss(mean * stage, mean * 0.15).round().clamp(5.0, 255.0) as i64;
            }
            creatures.push(Creature {
                name: format!("{archetype}{:03}", i + 1),
                stats,
            });
        }
    }
    creatures
}

fn write_csv(path: &str, creatures: &[Creature]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    let mut header = vec!["Name", "Total"];
    header.extend(STAT_COLUMNS);
    writer.write_record(&header)?;
    for c in creatures {
        let mut row = vec![c.name.clone(), c.total().to_string()];
        row.extend(c.stats.iter().map(|v| v.to_string()));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, creatures: &[Creature]) -> Result<()> {
    let mut fields = vec![
        Field::new("Name", DataType::Utf8, false),
        Field::new("Total", DataType::Int64, false),
    ];
    fields.extend(STAT_COLUMNS.iter().map(|c| Field::new(*c, DataType::Int64, false)));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<Arc<dyn arrow::array::Array>> = vec![
        Arc::new(StringArray::from(
            creatures.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            creatures.iter().map(Creature::total).collect::<Vec<_>>(),
        )),
    ];
    for idx in 0..STAT_COLUMNS.len() {
        columns.push(Arc::new(Int64Array::from(
            creatures.iter().map(|c| c.stats[idx]).collect::<Vec<_>>(),
        )));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let creatures = generate(60, &mut rng);

    write_csv("sample_creatures.csv", &creatures)?;
    write_parquet("sample_creatures.parquet", &creatures)?;

    println!(
        "Wrote {} creatures to sample_creatures.csv and sample_creatures.parquet",
        creatures.len()
    );
    Ok(())
}
