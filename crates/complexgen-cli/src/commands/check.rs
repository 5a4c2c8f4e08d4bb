use crate::cli::CheckArgs;
use crate::config::PartialRuleFile;
use crate::error::Result;
use crate::report;
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    info!("Validating rule file {:?}", &args.input);
    let config = PartialRuleFile::from_file(&args.input)?.into_config()?;

    print!("{}", report::render_check(&config));
    println!("Rule file is valid.");
    Ok(())
}
