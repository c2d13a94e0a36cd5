use crate::config::toml_config::ClimateConfig;
use crate::core::climate::{self, AVERAGE_FILE, EXTREMES_FILE, JSON_FILE, RANGE_FILE};
use crate::core::{Pipeline, Storage};
use crate::domain::model::{ClimateReport, TemperatureData};
use crate::utils::error::Result;
use crate::utils::prompt::Notices;
use std::path::Path;

pub struct ClimatePipeline<S: Storage> {
    storage: S,
    config: ClimateConfig,
    notices: Notices,
}

impl<S: Storage> ClimatePipeline<S> {
    pub fn new(storage: S, config: ClimateConfig) -> Self {
        Self {
            storage,
            config,
            notices: Notices::new(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    fn join(dir: &str, file: &str) -> String {
        Path::new(dir).join(file).to_string_lossy().into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for ClimatePipeline<S> {
    type Input = TemperatureData;
    type Output = ClimateReport;

    async fn extract(&self) -> Result<TemperatureData> {
        let dir = &self.config.data_dir;
        let files = self.storage.list_files(dir).await?;

        let mut data = TemperatureData::new();
        let mut loaded = 0usize;
        for filename in files.iter().filter(|f| climate::is_csv_file(f)) {
            let year = climate::year_from_filename(filename);

            let parsed = match self.storage.read_file(&Self::join(dir, filename)).await {
                Ok(content) => climate::parse_station_csv(&content),
                Err(e) => Err(e),
            };

            // 單一檔案失敗只略過該檔
            match parsed {
                Ok(rows) => {
                    tracing::debug!("{}: {} stations for year {}", filename, rows.len(), year);
                    climate::merge_rows(&mut data, year, rows);
                    loaded += 1;
                }
                Err(e) => {
                    self.notices
                        .push(format!("Error reading {}: {}", filename, e));
                    tracing::warn!("Skipping {}: {}", filename, e);
                }
            }
        }

        tracing::info!(
            "📁 Loaded {} CSV file(s), {} station(s) from {}",
            loaded,
            data.len(),
            dir
        );
        Ok(data)
    }

    async fn transform(&self, data: TemperatureData) -> Result<ClimateReport> {
        climate::build_report(&data, &self.config.data_dir)
    }

    async fn load(&self, report: ClimateReport) -> Result<String> {
        let out = &self.config.output_dir;

        if self.config.wants_format("txt") {
            self.storage
                .write_file(
                    &Self::join(out, AVERAGE_FILE),
                    climate::format_averages(&report.season_averages).as_bytes(),
                )
                .await?;
            self.storage
                .write_file(
                    &Self::join(out, RANGE_FILE),
                    climate::format_largest_range(&report.largest_range).as_bytes(),
                )
                .await?;
            self.storage
                .write_file(
                    &Self::join(out, EXTREMES_FILE),
                    climate::format_extremes(&report.extremes).as_bytes(),
                )
                .await?;
        }

        if self.config.wants_format("json") {
            let json_data = serde_json::to_string_pretty(&report)?;
            self.storage
                .write_file(&Self::join(out, JSON_FILE), json_data.as_bytes())
                .await?;
        }

        self.notices.push("Results saved to files.");
        Ok(out.clone())
    }
}
