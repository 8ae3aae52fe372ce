//! Build the static site

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Run a full build: clear output, copy static assets, render pages and
/// blog. Any error propagates to the caller so the process can exit
/// non-zero.
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site);
    generator.generate()?;

    let duration = start.elapsed();
    tracing::info!("Built in {:.2}s", duration.as_secs_f64());

    Ok(())
}
