use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---- cipher ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherKey {
    pub n: i64,
    pub m: i64,
}

impl CipherKey {
    pub fn new(n: i64, m: i64) -> Self {
        Self { n, m }
    }
}

/// 位移的繞回範圍。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShiftScope {
    /// 在整個 26 個字母內繞回；字母可能跨到另一半，解密不保證還原
    Full,
    /// 只在字母所屬的半邊 (a-m / n-z) 內繞回，解密必定還原
    #[default]
    Half,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Match,
    Mismatch,
}

impl Verification {
    pub fn message(&self) -> &'static str {
        match self {
            Verification::Match => "Decryption is successful!",
            Verification::Mismatch => "Decryption failed. The texts do not match.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CipherOutcome {
    pub encrypted: String,
    pub decrypted: String,
    pub verification: Verification,
}

// ---- climate ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// CSV 標頭使用的月份名稱
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTemperatures([f64; 12]);

impl MonthlyTemperatures {
    pub fn new(values: [f64; 12]) -> Self {
        Self(values)
    }

    pub fn get(&self, month: Month) -> f64 {
        self.0[month.index()]
    }

    pub fn values(&self) -> &[f64; 12] {
        &self.0
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

/// 測站名稱 → 年份 → 十二個月的溫度
pub type TemperatureData = BTreeMap<String, BTreeMap<String, MonthlyTemperatures>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Summer, Season::Autumn, Season::Winter, Season::Spring];

    // 南半球季節
    pub fn months(&self) -> [Month; 3] {
        match self {
            Season::Summer => [Month::December, Month::January, Month::February],
            Season::Autumn => [Month::March, Month::April, Month::May],
            Season::Winter => [Month::June, Month::July, Month::August],
            Season::Spring => [Month::September, Month::October, Month::November],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonAverage {
    pub season: Season,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargestRange {
    pub stations: Vec<String>,
    pub range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationExtremes {
    pub warmest_station: String,
    pub warmest: f64,
    pub coolest_station: String,
    pub coolest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateReport {
    pub season_averages: Vec<SeasonAverage>,
    pub largest_range: LargestRange,
    pub extremes: StationExtremes,
}

// ---- tree ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub angle_left: f64,
    pub angle_right: f64,
    pub start_length: f64,
    pub depth: u32,
    pub reduction_factor: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            angle_left: 30.0,
            angle_right: 30.0,
            start_length: 100.0,
            depth: 6,
            reduction_factor: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PenColor {
    Brown,
    Green,
    DarkGreen,
}

impl PenColor {
    /// SVG 顏色名稱
    pub fn svg_name(&self) -> &'static str {
        match self {
            PenColor::Brown => "brown",
            PenColor::Green => "green",
            PenColor::DarkGreen => "darkgreen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: PenColor,
}

impl Segment {
    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }
}

#[derive(Debug, Clone)]
pub struct TreeDrawing {
    pub segments: Vec<Segment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_extremes() {
        let mut values = [10.0; 12];
        values[Month::January.index()] = 31.5;
        values[Month::July.index()] = -2.0;
        let temps = MonthlyTemperatures::new(values);

        assert_eq!(temps.max(), 31.5);
        assert_eq!(temps.min(), -2.0);
        assert_eq!(temps.get(Month::July), -2.0);
    }

    #[test]
    fn test_seasons_cover_every_month_once() {
        let mut months: Vec<Month> = Season::ALL.iter().flat_map(|s| s.months()).collect();
        months.sort();
        assert_eq!(months, Month::ALL.to_vec());
    }
}
