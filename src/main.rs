//! scale-curator binary entry point

use anyhow::Result;

fn main() -> Result<()> {
    scale_curator::cli::run()
}
