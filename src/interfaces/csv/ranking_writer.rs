use crate::application::ranker::RankedRestaurant;
use crate::error::Result;
use std::io::Write;

/// Writes ranked restaurants as `restaurant,name,distance_km` CSV.
pub struct RankingWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RankingWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// The header is written even when there is nothing to rank.
    pub fn write_ranking(&mut self, ranking: &[RankedRestaurant]) -> Result<()> {
        self.writer
            .write_record(["restaurant", "name", "distance_km"])?;
        for entry in ranking {
            self.writer.write_record([
                entry.restaurant.0.to_string(),
                entry.name.clone(),
                format!("{:.3}", entry.distance_km),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
