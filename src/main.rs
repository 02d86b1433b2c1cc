/// Scenario replay tool for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use basic_dropdown::replay;
    use clap::Parser;

    #[derive(Parser)]
    #[command(name = "dropdown-replay")]
    #[command(about = "Replay a dropdown scenario and print one JSON report per step")]
    #[command(version)]
    struct Cli {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Override the scenario's log level (error, warn, info, debug, trace)
        #[arg(long, short = 'l')]
        log_level: Option<basic_dropdown::LogLevel>,

        /// Pretty-print each report
        #[arg(long)]
        pretty: bool,
    }

    let cli = Cli::parse();

    let scenario = match replay::load(&cli.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Failed to load {}: {}", cli.scenario.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let level = cli.log_level.unwrap_or(scenario.log_level);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    let reports = match replay::run(&scenario) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Replay failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for report in &reports {
        let line = if cli.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        match line {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Failed to encode report {}: {}", report.step, e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
