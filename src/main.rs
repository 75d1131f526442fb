use anyhow::bail;
use plotkit::{init_logging, run_config_file, BUILD_DATE, VERSION};
use std::path::PathBuf;

const USAGE: &str = "Usage: plotkit <config.json|config.toml> [out-dir]";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("-V" | "--version") => {
            println!("plotkit {VERSION} (built {BUILD_DATE})");
            return Ok(());
        }
        Some("-h" | "--help") => {
            println!("{USAGE}");
            return Ok(());
        }
        None => bail!("{USAGE}"),
        Some(_) => {}
    }
    if args.len() > 2 {
        bail!("{USAGE}");
    }

    init_logging()?;

    let config_path = PathBuf::from(&args[0]);
    let out_dir = args.get(1).map_or_else(|| PathBuf::from("."), PathBuf::from);
    let summary = run_config_file(&config_path, &out_dir)?;
    if summary.skipped_steps > 0 {
        eprintln!("{} step(s) skipped, see log for details", summary.skipped_steps);
    }
    Ok(())
}
