use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crossword_csp::{find_fill, render_grid, save_image, Crossword, Error, FillFailure, RenderOptions};

/// Fill a crossword grid with words from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid structure file: '_' marks a fillable cell, anything else a block
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Also draw the filled grid to this image file (e.g. output.png)
    output: Option<PathBuf>,
}

/// Entry point of the crossword filler.
///
/// Argument errors are reported by clap before anything is loaded. Failing to find a fill is an
/// ordinary outcome and exits successfully; load or render errors exit with code 1.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug_enabled = std::env::var("CROSSWORD_DEBUG").is_ok();
    crossword_csp::log::init_logger(debug_enabled);

    if let Err(e) = try_main(&cli) {
        eprintln!("Error: {}", e.display_detailed());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main(cli: &Cli) -> Result<(), Error> {
    let crossword = Crossword::load(&cli.structure, &cli.words)?;

    log::info!(
        "Loaded {} slots and {} words",
        crossword.slot_count(),
        crossword.words().len(),
    );

    let result = match find_fill(&crossword) {
        Ok(result) => result,
        Err(FillFailure::EmptyDomain { slot_id }) => {
            log::debug!("No candidates left for {:?}", crossword.slot(slot_id));
            println!("No solution.");
            return Ok(());
        }
        Err(FillFailure::Exhausted) => {
            println!("No solution.");
            return Ok(());
        }
    };

    println!("{}", render_grid(&crossword, &result.assignment));

    if let Some(output) = &cli.output {
        save_image(&crossword, &result.assignment, output, &RenderOptions::default())?;
        log::info!("Saved image to {}", output.display());
    }

    Ok(())
}
