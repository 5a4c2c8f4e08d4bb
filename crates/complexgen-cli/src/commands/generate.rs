use crate::cli::GenerateArgs;
use crate::config::PartialRuleFile;
use crate::error::Result;
use crate::report;
use crate::utils::progress::CliProgressHandler;
use complexgen::{engine::progress::ProgressReporter, workflows};
use tracing::info;

pub fn run(args: GenerateArgs) -> Result<()> {
    info!("Loading rule file {:?}", &args.input);
    let partial_config = PartialRuleFile::from_file(&args.input)?;
    info!("Merging configuration from rule file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting complex generation...");
    info!("Invoking the core generation workflow...");
    let result = workflows::generate::run(&config, &reporter)?;

    println!(
        "Generation complete: {} species, {} reactions.",
        result.registry.len(),
        result.reaction_count()
    );

    let rendered = report::render_generation(&result);
    match &args.output {
        Some(path) => {
            info!("Writing report to {:?}", path);
            std::fs::write(path, rendered)?;
            println!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
