use anyhow::{Context, bail};
use log::debug;
use tokio::{net::TcpListener, task};

use linreg_sgd::{
    LinearModel, TrainerConfig,
    report::{PredictionReport, TrainingReport},
    server,
};

pub const USAGE: &str = "\
Usage:
  linreg train <comma_sep_X> <comma_sep_y> [learning_rate] [max_epochs] [batch_size] [--seed N] [--config PATH]
  linreg predict <slope> <intercept> <x_value>
  linreg serve [--addr HOST:PORT] [--seed N] [--config PATH]";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Train {
        xs: Vec<f64>,
        ys: Vec<f64>,
        config: TrainerConfig,
    },
    Predict {
        slope: f64,
        intercept: f64,
        x: f64,
    },
    Serve {
        addr: String,
        config: TrainerConfig,
    },
}

/// Parses the arguments that follow the program name.
///
/// Positional hyperparameters override values loaded through `--config`.
pub fn parse_args<I>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut seed = None;
    let mut config_path = None;
    let mut addr = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().context("--seed requires a value")?;
                let value = value
                    .parse::<u64>()
                    .with_context(|| format!("invalid seed '{value}'"))?;
                seed = Some(value);
            }
            "--config" => {
                config_path = Some(args.next().context("--config requires a path")?);
            }
            "--addr" => {
                addr = Some(args.next().context("--addr requires HOST:PORT")?);
            }
            _ => positional.push(arg),
        }
    }

    let Some((operation, rest)) = positional.split_first() else {
        bail!("operation mode required ('train', 'predict' or 'serve')");
    };

    if addr.is_some() && operation.as_str() != "serve" {
        bail!("--addr is only valid with 'serve'");
    }

    let load_config = || -> anyhow::Result<TrainerConfig> {
        let mut config = match &config_path {
            Some(path) => TrainerConfig::load(path)?,
            None => TrainerConfig::default(),
        };
        if seed.is_some() {
            config.seed = seed;
        }
        Ok(config)
    };

    match (operation.as_str(), rest) {
        ("train", [xs, ys, hyper @ ..]) if hyper.len() <= 3 => {
            let mut config = load_config()?;

            if let Some(lr) = hyper.first() {
                config.learning_rate = parse_number(lr, "learning rate")?;
            }
            if let Some(epochs) = hyper.get(1) {
                config.max_epochs = parse_number(epochs, "max epochs")?;
            }
            if let Some(batch_size) = hyper.get(2) {
                config.batch_size = parse_number(batch_size, "batch size")?;
            }

            Ok(Command::Train {
                xs: parse_values(xs).context("cannot parse X")?,
                ys: parse_values(ys).context("cannot parse y")?,
                config,
            })
        }
        ("predict", [slope, intercept, x]) => Ok(Command::Predict {
            slope: parse_number(slope, "slope")?,
            intercept: parse_number(intercept, "intercept")?,
            x: parse_number(x, "x value")?,
        }),
        ("serve", []) => Ok(Command::Serve {
            addr: addr.unwrap_or_else(|| server::DEFAULT_ADDR.to_string()),
            config: load_config()?,
        }),
        (operation, _) => bail!("invalid arguments for operation '{operation}'"),
    }
}

/// Parses a comma-separated list of numbers. An empty string is an empty list.
pub fn parse_values(s: &str) -> anyhow::Result<Vec<f64>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }

    s.split(',')
        .map(|item| {
            item.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid value '{item}'"))
        })
        .collect()
}

fn parse_number<T>(s: &str, what: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.trim()
        .parse::<T>()
        .with_context(|| format!("invalid {what} '{s}'"))
}

/// Runs a parsed command and returns the text to print on stdout.
///
/// `Serve` only returns once the server has shut down.
pub async fn execute(command: Command) -> anyhow::Result<String> {
    match command {
        Command::Train { xs, ys, config } => {
            debug!(samples = xs.len(); "training requested");

            let report = task::spawn_blocking(move || TrainingReport::run(&xs, &ys, &config))
                .await
                .context("training task panicked")?
                .context("training failed")?;
            Ok(report.to_string())
        }
        Command::Predict { slope, intercept, x } => {
            let prediction = LinearModel::new(slope, intercept).predict(x);
            Ok(PredictionReport { prediction }.to_string())
        }
        Command::Serve { addr, config } => {
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("cannot bind {addr}"))?;
            server::serve(listener, config)
                .await
                .context("server failed")?;
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_values_accepts_spaces_and_signs() {
        assert_eq!(
            parse_values("1, -2.5,3e2").unwrap(),
            vec![1.0, -2.5, 300.0]
        );
        assert!(parse_values("").unwrap().is_empty());
    }

    #[test]
    fn parse_values_rejects_garbage() {
        let err = parse_values("1,two,3").unwrap_err();
        assert!(err.to_string().contains("'two'"));
    }

    #[test]
    fn train_with_defaults() {
        let cmd = parse_args(args(&["train", "1,2,3", "2,4,6"])).unwrap();

        assert_eq!(
            cmd,
            Command::Train {
                xs: vec![1.0, 2.0, 3.0],
                ys: vec![2.0, 4.0, 6.0],
                config: TrainerConfig::default(),
            }
        );
    }

    #[test]
    fn train_with_positional_hyperparameters_and_seed() {
        let cmd = parse_args(args(&[
            "train", "1,2", "3,4", "0.1", "50", "8", "--seed", "42",
        ]))
        .unwrap();

        let Command::Train { config, .. } = cmd else {
            panic!("expected a train command");
        };
        assert_eq!(
            config,
            TrainerConfig {
                learning_rate: 0.1,
                max_epochs: 50,
                batch_size: 8,
                seed: Some(42),
            }
        );
    }

    #[test]
    fn serve_command_defaults_and_flags() {
        assert_eq!(
            parse_args(args(&["serve"])).unwrap(),
            Command::Serve {
                addr: server::DEFAULT_ADDR.to_string(),
                config: TrainerConfig::default(),
            }
        );

        let cmd = parse_args(args(&["serve", "--addr", "0.0.0.0:8080", "--seed", "5"])).unwrap();
        let Command::Serve { addr, config } = cmd else {
            panic!("expected a serve command");
        };
        assert_eq!(addr, "0.0.0.0:8080");
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn predict_command() {
        let cmd = parse_args(args(&["predict", "2", "1", "3"])).unwrap();
        assert_eq!(
            cmd,
            Command::Predict {
                slope: 2.0,
                intercept: 1.0,
                x: 3.0
            }
        );
    }

    #[test]
    fn malformed_command_lines_are_rejected() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["fit", "1", "2"])).is_err());
        assert!(parse_args(args(&["train", "1,2"])).is_err());
        assert!(parse_args(args(&["train", "1", "2", "0.1", "10", "2", "extra"])).is_err());
        assert!(parse_args(args(&["train", "1", "2", "fast"])).is_err());
        assert!(parse_args(args(&["train", "1", "2", "0.1", "-5"])).is_err());
        assert!(parse_args(args(&["predict", "1", "2"])).is_err());
        assert!(parse_args(args(&["train", "1", "2", "--seed"])).is_err());
        assert!(parse_args(args(&["serve", "extra"])).is_err());
        assert!(parse_args(args(&["serve", "--addr"])).is_err());
        assert!(parse_args(args(&["train", "1", "2", "--addr", "127.0.0.1:1"])).is_err());
    }

    #[tokio::test]
    async fn execute_predict() {
        let out = execute(Command::Predict {
            slope: 0.5,
            intercept: 1.0,
            x: 6.0,
        })
        .await
        .unwrap();

        assert_eq!(out, "prediction=4\n");
    }

    #[tokio::test]
    async fn execute_train_prints_every_key() {
        let cmd = parse_args(args(&[
            "train",
            "1,2,3,4,5",
            "3,5,7,9,11",
            "0.05",
            "2000",
            "32",
            "--seed",
            "1",
        ]))
        .unwrap();

        let out = execute(cmd).await.unwrap();
        let keys: Vec<&str> = out
            .lines()
            .map(|line| line.split_once('=').unwrap().0)
            .collect();

        assert_eq!(
            keys,
            ["slope", "intercept", "training_time_ms", "mse", "r_squared"]
        );
    }

    #[tokio::test]
    async fn execute_train_reports_mismatched_data() {
        let cmd = parse_args(args(&["train", "1,2,3", "1,2"])).unwrap();
        let err = execute(cmd).await.unwrap_err();

        assert!(format!("{err:#}").contains("dimension mismatch"));
    }

    #[tokio::test]
    async fn execute_train_reports_empty_data() {
        let cmd = parse_args(args(&["train", "", ""])).unwrap();
        let err = execute(cmd).await.unwrap_err();

        assert!(format!("{err:#}").contains("empty input"));
    }
}
