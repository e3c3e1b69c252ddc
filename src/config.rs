use crate::algorithm::ClosePolicy;
use crate::common::Coordinate;
use crate::heuristic::HeuristicKind;

use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug, Default)]
#[command(
    name = "A* Maze",
    about = "A* search between a start and a goal cell on an 8-connected grid maze.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the map file")]
    pub map_path: Option<String>,

    #[arg(long, help = "Width of the generated grid when no map file is given")]
    pub width: Option<usize>,

    #[arg(long, help = "Height of the generated grid when no map file is given")]
    pub height: Option<usize>,

    #[arg(long, help = "Start cell as COL,ROW", value_parser = parse_coordinate)]
    pub start: Option<Coordinate>,

    #[arg(long, help = "Goal cell as COL,ROW", value_parser = parse_coordinate)]
    pub goal: Option<Coordinate>,

    #[arg(long, value_enum, help = "Heuristic guiding the search")]
    pub heuristic: Option<HeuristicKind>,

    #[arg(long, value_enum, help = "When a cell stops accepting new nodes")]
    pub close_policy: Option<ClosePolicy>,

    #[arg(long, help = "Probability of blocking each empty cell")]
    pub obstacle_density: Option<f64>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Nodes popped per search slice")]
    pub slice_budget: Option<usize>,

    #[arg(long, help = "Replay the found path on the grid", default_value_t = false)]
    pub playback: bool,

    #[arg(long, help = "Path to the JSON report")]
    pub output_path: Option<String>,

    #[arg(long, help = "Log filter used when RUST_LOG is unset")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub map_path: Option<String>,
    pub width: usize,
    pub height: usize,
    pub start: Option<Coordinate>,
    pub goal: Option<Coordinate>,
    pub heuristic: HeuristicKind,
    pub close_policy: ClosePolicy,
    pub obstacle_density: Option<f64>,
    pub seed: u64,
    pub slice_budget: Option<usize>,
    pub playback: bool,
    pub output_path: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: None,
            width: 40,
            height: 30,
            start: None,
            goal: None,
            heuristic: HeuristicKind::Manhattan,
            close_policy: ClosePolicy::OnGenerate,
            obstacle_density: None,
            seed: 0,
            slice_budget: None,
            playback: false,
            output_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Flags given on the command line win over the config file.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(map_path) = &cli.map_path {
            self.map_path = Some(map_path.clone());
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if cli.start.is_some() {
            self.start = cli.start;
        }
        if cli.goal.is_some() {
            self.goal = cli.goal;
        }
        if let Some(heuristic) = cli.heuristic {
            self.heuristic = heuristic;
        }
        if let Some(close_policy) = cli.close_policy {
            self.close_policy = close_policy;
        }
        if cli.obstacle_density.is_some() {
            self.obstacle_density = cli.obstacle_density;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if cli.slice_budget.is_some() {
            self.slice_budget = cli.slice_budget;
        }
        self.playback |= cli.playback;
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.map_path.is_none() && (self.width == 0 || self.height == 0) {
            return Err(anyhow!(
                "Generated grid needs a positive size, got {}x{}",
                self.width,
                self.height
            ));
        }

        if let Some(density) = self.obstacle_density {
            if !(0.0..=1.0).contains(&density) {
                return Err(anyhow!(
                    "Obstacle density must be between 0.0 and 1.0, got {}",
                    density
                ));
            }
        }

        if self.slice_budget == Some(0) {
            return Err(anyhow!("Slice budget must be at least 1"));
        }
        Ok(())
    }
}

pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (col, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COL,ROW, got '{value}'"))?;
    let col = col.trim().parse::<i32>().map_err(|err| format!("bad column '{col}': {err}"))?;
    let row = row.trim().parse::<i32>().map_err(|err| format!("bad row '{row}': {err}"))?;
    Ok(Coordinate::new(col, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("3,4"), Ok(Coordinate::new(3, 4)));
        assert_eq!(parse_coordinate(" 0 , 12 "), Ok(Coordinate::new(0, 12)));
        assert!(parse_coordinate("3").is_err());
        assert!(parse_coordinate("a,1").is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = "
map_path: map_file/test/test.map
heuristic: euclidean
close_policy: on-expand
start:
  col: 1
  row: 2
slice_budget: 50
";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.map_path.as_deref(), Some("map_file/test/test.map"));
        assert_eq!(config.heuristic, HeuristicKind::Euclidean);
        assert_eq!(config.close_policy, ClosePolicy::OnExpand);
        assert_eq!(config.start, Some(Coordinate::new(1, 2)));
        assert_eq!(config.goal, None);
        assert_eq!(config.slice_budget, Some(50));
        assert_eq!(config.width, 40);
        assert_eq!(config.log_level, "info");

        assert!(Config::from_yaml_str("heuristic: chebyshev").is_err());
        assert!(Config::from_yaml_str("colour: red").is_err());
    }

    #[test]
    fn test_command_line_overrides_file() {
        let config =
            Config::from_yaml_str("heuristic: euclidean\nseed: 3\nplayback: true").unwrap();
        let cli = Cli::try_parse_from([
            "astar-maze",
            "--heuristic",
            "manhattan",
            "--goal",
            "5,6",
            "--obstacle-density",
            "0.25",
        ])
        .unwrap();
        let config = config.override_from_command_line(&cli).unwrap();
        assert_eq!(config.heuristic, HeuristicKind::Manhattan);
        assert_eq!(config.goal, Some(Coordinate::new(5, 6)));
        assert_eq!(config.obstacle_density, Some(0.25));
        assert_eq!(config.seed, 3);
        assert!(config.playback);
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let config = Config {
            obstacle_density: Some(1.5),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            slice_budget: Some(0),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            width: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            width: 0,
            map_path: Some("map_file/test/test.map".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["astar-maze", "--heuristic", "octile"]).is_err());
        assert!(Cli::try_parse_from(["astar-maze", "--start", "1;2"]).is_err());
    }
}
