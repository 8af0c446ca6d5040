// CSV persistence: one delimited file per target, header written once,
// later batches appended without repeating it.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::model::{Place, PlaceBatch};

#[async_trait]
pub trait BatchSink: Send + Sync {
    async fn append(&self, target: &str, batch: &PlaceBatch) -> Result<()>;
}

const SCALAR_COLUMNS: [&str; 14] = [
    "search_key",
    "name",
    "category",
    "price_tier",
    "address",
    "website",
    "phone",
    "review_count_label",
    "rating_label",
    "latitude",
    "longitude",
    "harvested_review_count",
    "reviews_of_interest",
    "reviews_other_language",
];

const REVIEW_COLUMNS: [&str; 7] = [
    "reviewer_name",
    "reviewer_info",
    "language",
    "date",
    "rating",
    "photo_count",
    "text",
];

pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Target identifiers are URL fragments; keep the filename tame.
    fn file_path(&self, target: &str) -> PathBuf {
        let safe: String = target
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '.' | ',' | '-' | '_' | '@') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.output_dir.join(format!("{safe}.csv"))
    }
}

/// Nested reviews are flattened with an underscore-joined path
/// (`reviews_0_rating`), wide enough for the largest record in the batch.
fn header(max_reviews: usize) -> Vec<String> {
    let mut columns: Vec<String> = SCALAR_COLUMNS.iter().map(|c| c.to_string()).collect();
    for i in 0..max_reviews {
        for field in REVIEW_COLUMNS {
            columns.push(format!("reviews_{i}_{field}"));
        }
    }
    columns
}

fn row(place: &Place, max_reviews: usize) -> Vec<String> {
    let mut out = vec![
        place.search_key.clone(),
        place.name.clone(),
        place.category.clone(),
        place.price_tier.to_string(),
        place.address.clone(),
        place.website.clone(),
        place.phone.clone(),
        place.review_count_label.clone(),
        place.rating_label.clone(),
        place.latitude.to_string(),
        place.longitude.to_string(),
        place.harvested_review_count.to_string(),
        place.reviews_of_interest.to_string(),
        place.reviews_other_language.to_string(),
    ];
    for i in 0..max_reviews {
        match place.reviews.get(i) {
            Some(review) => {
                out.push(review.reviewer_name.clone());
                out.push(review.reviewer_info.clone());
                out.push(review.language.clone());
                out.push(review.date.clone());
                out.push(review.rating.map(|r| r.to_string()).unwrap_or_default());
                out.push(review.photo_count.to_string());
                out.push(review.text.clone());
            }
            None => out.extend(std::iter::repeat_n(String::new(), REVIEW_COLUMNS.len())),
        }
    }
    out
}

#[async_trait]
impl BatchSink for CsvSink {
    async fn append(&self, target: &str, batch: &PlaceBatch) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output dir {}", self.output_dir.display())
        })?;

        let path = self.file_path(target);
        let fresh = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let max_reviews = batch.max_review_count();
        if fresh {
            writer.write_record(header(max_reviews))?;
        }
        for place in &batch.places {
            writer.write_record(row(place, max_reviews))?;
        }
        writer.flush()?;

        info!(
            path = %path.display(),
            places = batch.len(),
            "Batch persisted"
        );
        Ok(())
    }
}
