use crate::domain::model::{
    ClimateReport, LargestRange, MonthlyTemperatures, Season, SeasonAverage, StationExtremes,
    TemperatureData,
};
use crate::utils::error::{KitError, Result};
use serde::Deserialize;

pub const AVERAGE_FILE: &str = "average_temp.txt";
pub const RANGE_FILE: &str = "largest_temp_range_station.txt";
pub const EXTREMES_FILE: &str = "warmest_and_coolest_station.txt";
pub const JSON_FILE: &str = "climate_report.json";

#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "STATION_NAME")]
    station: String,
    #[serde(rename = "January")]
    january: f64,
    #[serde(rename = "February")]
    february: f64,
    #[serde(rename = "March")]
    march: f64,
    #[serde(rename = "April")]
    april: f64,
    #[serde(rename = "May")]
    may: f64,
    #[serde(rename = "June")]
    june: f64,
    #[serde(rename = "July")]
    july: f64,
    #[serde(rename = "August")]
    august: f64,
    #[serde(rename = "September")]
    september: f64,
    #[serde(rename = "October")]
    october: f64,
    #[serde(rename = "November")]
    november: f64,
    #[serde(rename = "December")]
    december: f64,
}

impl StationRow {
    fn temperatures(&self) -> MonthlyTemperatures {
        MonthlyTemperatures::new([
            self.january,
            self.february,
            self.march,
            self.april,
            self.may,
            self.june,
            self.july,
            self.august,
            self.september,
            self.october,
            self.november,
            self.december,
        ])
    }
}

/// 從檔名取出年份：最後一個 `_` 之後、第一個 `.` 之前。
///
/// `stations_group_1987.csv` → `1987`
pub fn year_from_filename(filename: &str) -> &str {
    let tail = filename.rsplit('_').next().unwrap_or(filename);
    tail.split('.').next().unwrap_or(tail)
}

pub fn is_csv_file(filename: &str) -> bool {
    filename.ends_with(".csv")
}

/// 解析單一 CSV 檔。任何一列無法解析時整個檔案視為失敗。
pub fn parse_station_csv(content: &[u8]) -> Result<Vec<(String, MonthlyTemperatures)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content);

    let mut rows = Vec::new();
    for row in reader.deserialize::<StationRow>() {
        let row = row?;
        let temperatures = row.temperatures();
        if temperatures.values().iter().any(|t| !t.is_finite()) {
            return Err(KitError::ProcessingError {
                message: format!("non-finite temperature for station {}", row.station),
            });
        }
        rows.push((row.station, temperatures));
    }
    Ok(rows)
}

/// 併入一個檔案的資料；同測站同年份以後者覆蓋。
pub fn merge_rows(data: &mut TemperatureData, year: &str, rows: Vec<(String, MonthlyTemperatures)>) {
    for (station, temperatures) in rows {
        data.entry(station)
            .or_default()
            .insert(year.to_string(), temperatures);
    }
}

fn station_years(data: &TemperatureData) -> impl Iterator<Item = &MonthlyTemperatures> {
    data.values().flat_map(|years| years.values())
}

/// 每季平均：所有測站年份的季平均之算術平均。
pub fn season_averages(data: &TemperatureData) -> Option<Vec<SeasonAverage>> {
    let count = station_years(data).count();
    if count == 0 {
        return None;
    }

    let averages = Season::ALL
        .iter()
        .map(|&season| {
            let months = season.months();
            let total: f64 = station_years(data)
                .map(|temps| months.iter().map(|&m| temps.get(m)).sum::<f64>() / months.len() as f64)
                .sum();
            SeasonAverage {
                season,
                average: total / count as f64,
            }
        })
        .collect();
    Some(averages)
}

/// 溫差最大的測站（可能多個並列）。
pub fn largest_temperature_range(data: &TemperatureData) -> Option<LargestRange> {
    let ranges: Vec<(&String, f64)> = data
        .iter()
        .filter_map(|(station, years)| {
            years
                .values()
                .map(|temps| temps.max() - temps.min())
                .reduce(f64::max)
                .map(|range| (station, range))
        })
        .collect();

    let max_range = ranges.iter().map(|(_, r)| *r).reduce(f64::max)?;
    let stations = ranges
        .into_iter()
        .filter(|(_, r)| *r == max_range)
        .map(|(s, _)| s.clone())
        .collect();

    Some(LargestRange {
        stations,
        range: max_range,
    })
}

/// 最熱 / 最冷測站；並列時取名稱排序在前者。
pub fn warmest_and_coolest(data: &TemperatureData) -> Option<StationExtremes> {
    let mut warmest: Option<(&String, f64)> = None;
    let mut coolest: Option<(&String, f64)> = None;

    for (station, years) in data {
        let Some(high) = years.values().map(|t| t.max()).reduce(f64::max) else {
            continue;
        };
        let Some(low) = years.values().map(|t| t.min()).reduce(f64::min) else {
            continue;
        };

        if warmest.map_or(true, |(_, w)| high > w) {
            warmest = Some((station, high));
        }
        if coolest.map_or(true, |(_, c)| low < c) {
            coolest = Some((station, low));
        }
    }

    let (warmest_station, warmest) = warmest?;
    let (coolest_station, coolest) = coolest?;
    Some(StationExtremes {
        warmest_station: warmest_station.clone(),
        warmest,
        coolest_station: coolest_station.clone(),
        coolest,
    })
}

pub fn build_report(data: &TemperatureData, location: &str) -> Result<ClimateReport> {
    let no_data = || KitError::NoDataError {
        location: location.to_string(),
    };

    Ok(ClimateReport {
        season_averages: season_averages(data).ok_or_else(no_data)?,
        largest_range: largest_temperature_range(data).ok_or_else(no_data)?,
        extremes: warmest_and_coolest(data).ok_or_else(no_data)?,
    })
}

pub fn format_averages(averages: &[SeasonAverage]) -> String {
    averages
        .iter()
        .map(|a| format!("{}: {:.2}°C\n", a.season, a.average))
        .collect()
}

pub fn format_largest_range(range: &LargestRange) -> String {
    format!(
        "Station(s) with largest temperature range: {}\nLargest temperature range: {:.2}°C\n",
        range.stations.join(", "),
        range.range
    )
}

pub fn format_extremes(extremes: &StationExtremes) -> String {
    format!(
        "Warmest station: {} with {:.2}°C\nCoolest station: {} with {:.2}°C\n",
        extremes.warmest_station, extremes.warmest, extremes.coolest_station, extremes.coolest
    )
}
