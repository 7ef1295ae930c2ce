//! Generate static files

use anyhow::Result;

use crate::cms::CmsClient;
use crate::generator::Generator;
use crate::Kitchen;

/// Export every post from the CMS into the public directory
pub async fn run(kitchen: &Kitchen) -> Result<()> {
    let start = std::time::Instant::now();

    let source = CmsClient::new(&kitchen.config.cms)?;
    let generator = Generator::new(&kitchen.public_dir, kitchen.config.clone())?;
    let stats = generator.generate(&source).await?;

    if stats.skipped > 0 {
        tracing::warn!("Skipped {} posts with unusable slugs", stats.skipped);
    }
    tracing::info!(
        "Generated {} posts into {:?} in {:.2?}",
        stats.posts,
        kitchen.public_dir,
        start.elapsed()
    );

    Ok(())
}
