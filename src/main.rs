use clap::Parser;
use kml_joiner::core::prompt::{print_listing, prompt_selection};
use kml_joiner::core::ConfigProvider;
use kml_joiner::utils::error::ErrorSeverity;
use kml_joiner::utils::logger::{self, LogFormat};
use kml_joiner::utils::validation::Validate;
use kml_joiner::{
    discover_sources, select_sources, CliConfig, JoinEngine, JoinPipeline, KmlError, LocalStorage,
    Result, TomlConfig,
};
use std::io::{self, Write};

fn run<C: ConfigProvider + Validate>(config: C, selection: Option<&str>) -> Result<()> {
    config.validate()?;

    let sources = discover_sources(
        config.search_dir(),
        config.pattern(),
        config.ignored_files(),
    )?;
    if sources.is_empty() {
        println!(
            "No files matching '{}' found in {}",
            config.pattern(),
            config.search_dir()
        );
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_listing(&mut out, &sources, config.ignored_files())?;

    let selected = match selection {
        Some(input) => select_sources(&sources, input, config.ignored_files())?,
        None => {
            let stdin = io::stdin();
            match prompt_selection(
                &mut stdin.lock(),
                &mut out,
                &sources,
                config.ignored_files(),
                config.max_attempts(),
            )? {
                Some(selected) => selected,
                None => return Ok(()),
            }
        }
    };

    let names: Vec<String> = selected.iter().map(|source| source.file_name()).collect();
    writeln!(out, "{}", names.join(", "))?;
    drop(out);

    let storage = LocalStorage::new(config.search_dir().to_string());
    let engine = JoinEngine::new(JoinPipeline::new(storage, config));
    let output_path = engine.run(&selected)?;
    println!("Joined file written to {}", output_path);

    Ok(())
}

fn main() {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, LogFormat::from_flag(cli.log_json));
    tracing::debug!("CLI config: {:?}", cli);

    let selection = cli.select.clone();
    let config_path = cli.config.clone();
    let result = match config_path.as_deref() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            TomlConfig::from_file(path).and_then(|config| run(config, selection.as_deref()))
        }
        None => run(cli, selection.as_deref()),
    };

    if let Err(e) = result {
        report(&e);
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

fn report(e: &KmlError) {
    tracing::error!(
        "Join failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
}
