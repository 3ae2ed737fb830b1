//! CLI argument definitions using clap.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use slotwise::{
    Coordinates, GspRegion, JoinPolicy, MAX_WINDOW_HOURS, NightHours, RankConfig, ScoringMode,
    SlotwiseError, SystemPriceSource,
};

#[derive(Parser, Debug)]
#[command(name = "slotwise")]
#[command(author, version, about = "Score UK half-hour electricity slots by cheapness or preference")]
#[command(
    long_about = "Fetches Octopus Agile unit rates, Elexon system prices and (optionally)\n\
    Open-Meteo weather, merges them on a half-hour timeline and scores each slot.\n\
    \nExamples:\n  \
    slotwise run --region C                       # Cheapness for the next 48 hours\n  \
    slotwise run --top-k 6 --tz utc               # Six cheapest slots, times in UTC\n  \
    slotwise run --mode preference --lat 51.5 --lon -0.12\n  \
    slotwise --mock run --format csv -o out.csv   # Offline fixtures, CSV export"
)]
pub struct Cli {
    /// Serve every request from deterministic in-process fixtures instead of live APIs
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch inputs and score every half-hour slot of the coming window
    Run(RunArgs),

    /// List GSP region letters and their areas
    Regions,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Agile product code
    #[arg(long, default_value = "AGILE-24-10-01")]
    pub product: String,

    /// GSP region letter (A-P) used in the tariff code
    #[arg(long, default_value = "H", value_parser = parse_region)]
    pub region: GspRegion,

    /// Window length in hours, starting at the current half-hour
    #[arg(
        long,
        default_value_t = 48,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_HOURS))
    )]
    pub hours: u32,

    /// Scoring mode
    #[arg(long, value_enum, default_value_t = ModeArg::Cheapness)]
    pub mode: ModeArg,

    /// Forecast latitude (preference mode)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Forecast longitude (preference mode)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// How series are merged onto the half-hour timeline
    /// [default: bucket; nearest in preference mode]
    #[arg(long, value_enum)]
    pub join: Option<JoinArg>,

    /// Matching tolerance in minutes for `--join nearest`
    /// [default: 15; 30 in preference mode]
    #[arg(long)]
    pub tolerance_min: Option<u64>,

    /// Also select and summarise the K best slots
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Zone used to display slot times
    #[arg(long, value_enum, default_value_t = TzArg::London)]
    pub tz: TzArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Table)]
    pub format: FormatArg,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Upstream used for grid system prices
    #[arg(long, value_enum, default_value_t = SourceArg::Settlement)]
    pub system_source: SourceArg,

    /// Per-provider timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Bounded 0-100 index from tariff and system price; higher is cheaper
    Cheapness,
    /// Penalty from tariff and weather; lower is better
    Preference,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum JoinArg {
    /// Mean per slot, inner join
    Bucket,
    /// Nearest observation within the tolerance
    Nearest,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TzArg {
    Utc,
    London,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Table,
    Csv,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Settlement system sell price
    Settlement,
    /// APX market index price
    MarketIndex,
}

fn parse_region(s: &str) -> Result<GspRegion, String> {
    s.parse().map_err(|e: SlotwiseError| e.to_string())
}

impl TzArg {
    pub const fn zone(self) -> Tz {
        match self {
            Self::Utc => Tz::UTC,
            Self::London => chrono_tz::Europe::London,
        }
    }
}

impl RunArgs {
    pub fn scoring(&self) -> ScoringMode {
        match self.mode {
            ModeArg::Cheapness => ScoringMode::default(),
            ModeArg::Preference => ScoringMode::preference(),
        }
    }

    /// Hourly weather only meets `:00` slots under a bucket join, so
    /// preference mode defaults to a nearest match within half an hour.
    pub fn join_policy(&self) -> JoinPolicy {
        let (join, tolerance_min) = match self.mode {
            ModeArg::Cheapness => (JoinArg::Bucket, 15),
            ModeArg::Preference => (JoinArg::Nearest, 30),
        };
        match self.join.unwrap_or(join) {
            JoinArg::Bucket => JoinPolicy::BucketMean,
            JoinArg::Nearest => JoinPolicy::NearestWithin {
                tolerance: Duration::from_secs(
                    self.tolerance_min.unwrap_or(tolerance_min).saturating_mul(60),
                ),
            },
        }
    }

    pub fn ranking(&self) -> Option<RankConfig> {
        self.top_k.map(|k| RankConfig {
            k,
            night: NightHours::default(),
        })
    }

    pub const fn system_source(&self) -> SystemPriceSource {
        match self.system_source {
            SourceArg::Settlement => SystemPriceSource::SettlementSystemPrices,
            SourceArg::MarketIndex => SystemPriceSource::MarketIndex,
        }
    }

    /// Forecast location when both coordinates were given.
    pub fn location(&self) -> Result<Option<Coordinates>, SlotwiseError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    pub const fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
