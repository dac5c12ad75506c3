use chrono::{Duration, NaiveDate};

use wafer_monitor::data::model::{
    ChannelId, CHANNEL_COUNT, POSITION_COUNT, SHEET_NAMES, TIMESTAMP_FORMAT,
};

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

/// Nominal signal for a channel: each group sits at its own level, the
/// edge positions read slightly lower than the centre.
fn nominal(channel: ChannelId, sheet_scale: f64) -> f64 {
    let group_level = [12_000.0, 8_500.0, 5_200.0][channel.group];
    let position_factor = [0.985, 0.99, 1.0, 0.988, 0.983, 0.9892][channel.position];
    group_level * position_factor * sheet_scale
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 1, 8)
        .and_then(|d| d.and_hms_opt(7, 30, 0))
        .ok_or("invalid start timestamp")?;
    let n_rows = 40;

    for (sheet_idx, sheet) in SHEET_NAMES.iter().enumerate() {
        let sheet_scale = 1.0 + 0.1 * sheet_idx as f64;
        let output_path = format!("{sheet}.csv");
        let mut writer = csv::Writer::from_path(&output_path)?;

        for row in 0..n_rows {
            let ts = start + Duration::hours(6 * row as i64);
            let stamp = ts.format(TIMESTAMP_FORMAT).to_string();
            let (date, time) = stamp.split_once(' ').ok_or("timestamp without time part")?;

            // Slow upward drift on the last rows so the outer band is crossed.
            let drift = if row >= n_rows - 8 {
                1.0 + 0.004 * (row + 8 - n_rows) as f64
            } else {
                1.0
            };

            let mut record = vec![date.to_string(), time.to_string()];
            record.extend((0..CHANNEL_COUNT).map(|i| {
                let channel = ChannelId::from_index(i);
                let mu = nominal(channel, sheet_scale) * drift;
                let noise = if channel.position == POSITION_COUNT - 1 { 0.001 } else { 0.002 };
                format!("{:.1}", rng.gauss(mu, mu * noise))
            }));
            writer.write_record(&record)?;
        }
        writer.flush()?;

        println!("Wrote {n_rows} rows x {CHANNEL_COUNT} channels to {output_path}");
    }
    Ok(())
}
