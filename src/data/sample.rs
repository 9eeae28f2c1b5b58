//! Synthetic GSS-like raw CSV generation.
//!
//! The generator emits a file in the *raw* layout (source headers, missing
//! tokens, the top-coded age bracket) so offline runs and tests go through the
//! exact same cleaning path as the real download.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{AGE_TOP_CODE, MISSING_TOKENS};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, ingest_str};

/// Share of attitude/numeric cells replaced by a missing-value token.
const MISSING_RATE: f64 = 0.08;

const REGIONS: [&str; 9] = [
    "new england",
    "middle atlantic",
    "e. nor. central",
    "w. nor. central",
    "south atlantic",
    "e. sou. central",
    "w. sou. central",
    "mountain",
    "pacific",
];

const AGREE_4: [&str; 4] = ["strongly agree", "agree", "disagree", "strongly disagree"];
const AGREE_5: [&str; 5] = [
    "strongly agree",
    "agree",
    "neither agree nor disagree",
    "disagree",
    "strongly disagree",
];
const AGREE_2: [&str; 2] = ["agree", "disagree"];
const SATJOB: [&str; 4] = ["very satisfied", "mod. satisfied", "a little dissat", "very dissatisfied"];

/// Raw header, in file order. `fehire` is present in the real file but unused.
const RAW_HEADER: [&str; 18] = [
    "id", "wtss", "sex", "educ", "region", "age", "coninc", "prestg10", "mapres10", "papres10", "sei10",
    "satjob", "fechld", "fefam", "fehire", "fepol", "fepresch", "meovrwrk",
];

/// Generate `count` raw rows as CSV text.
pub fn generate_sample_csv(count: usize, seed: u64) -> Result<String, AppError> {
    if count == 0 {
        return Err(AppError::usage("Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let dist = |mean: f64, sd: f64| {
        Normal::new(mean, sd).map_err(|e| AppError::runtime(format!("Sample distribution error: {e}")))
    };
    let educ_dist = dist(13.7, 2.9)?;
    let prestige_dist = dist(44.0, 13.0)?;
    let parent_dist = dist(42.0, 12.0)?;
    let noise = dist(0.0, 1.0)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(RAW_HEADER)
        .map_err(|e| AppError::runtime(format!("Failed to write sample header: {e}")))?;

    for i in 0..count {
        let male = rng.gen_bool(0.46);
        let sex = if male { "male" } else { "female" };
        let educ = educ_dist.sample(&mut rng).round().clamp(0.0, 20.0);
        let prestige = prestige_dist.sample(&mut rng).round().clamp(16.0, 80.0);
        let sei = (0.55 * prestige + 1.8 * educ + 6.0 * noise.sample(&mut rng)).clamp(9.0, 92.8);
        let gender_gap = if male { 7_500.0 } else { 0.0 };
        let income = (900.0 * prestige + 1_400.0 * educ + gender_gap + 14_000.0 * noise.sample(&mut rng))
            .clamp(383.0, 118_981.0)
            .round();
        let age = rng.gen_range(18..=95);
        let age = if age >= 89 { AGE_TOP_CODE.to_string() } else { age.to_string() };

        let weight = rng.gen_range(0.4..3.0);
        let region = REGIONS.choose(&mut rng).copied().unwrap_or("pacific").to_string();
        let mother_prestige = parent_dist.sample(&mut rng).round().clamp(16.0, 80.0);
        let father_prestige = parent_dist.sample(&mut rng).round().clamp(16.0, 80.0);
        let sei = (sei * 10.0).round() / 10.0;

        let record = vec![
            (i + 1).to_string(),
            format!("{weight:.4}"),
            sex.to_string(),
            maybe_missing(&mut rng, format_value(educ)),
            maybe_missing(&mut rng, region),
            maybe_missing(&mut rng, age),
            maybe_missing(&mut rng, format_value(income)),
            maybe_missing(&mut rng, format_value(prestige)),
            maybe_missing(&mut rng, format_value(mother_prestige)),
            maybe_missing(&mut rng, format_value(father_prestige)),
            maybe_missing(&mut rng, format_value(sei)),
            pick(&mut rng, &SATJOB),
            pick(&mut rng, &AGREE_4),
            pick(&mut rng, &AGREE_4),
            pick(&mut rng, &AGREE_2),
            pick(&mut rng, &AGREE_2),
            pick(&mut rng, &AGREE_4),
            pick(&mut rng, &AGREE_5),
        ];
        writer
            .write_record(&record)
            .map_err(|e| AppError::runtime(format!("Failed to write sample row: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::runtime(format!("Failed to finish sample CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::runtime(format!("Sample CSV is not UTF-8: {e}")))
}

/// Generate a synthetic file and run it through the normal cleaning pass.
pub fn sample_dataset(count: usize, seed: u64) -> Result<IngestedData, AppError> {
    let text = generate_sample_csv(count, seed)?;
    ingest_str(&text)
}

fn maybe_missing(rng: &mut StdRng, value: String) -> String {
    if rng.gen_bool(MISSING_RATE) {
        MISSING_TOKENS.choose(rng).copied().unwrap_or("DK").to_string()
    } else {
        value
    }
}

fn pick(rng: &mut StdRng, options: &[&str]) -> String {
    let value = options.choose(rng).copied().unwrap_or("agree").to_string();
    maybe_missing(rng, value)
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 { format!("{v:.0}") } else { format!("{v}") }
}
