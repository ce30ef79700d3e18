use anyhow::anyhow;
use shiori::{
    domain::services::reconcile::ReconcileService,
    infrastructure::{config::Config, repositories::source::SourceRepositoryImpl},
};
use shiori_source::mangadex;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .ok_or_else(|| anyhow!("usage: next_chapter <mangadex title url> [progress]"))?;
    let progress = args
        .next()
        .map(|progress| progress.parse::<f64>())
        .transpose()?
        .unwrap_or(0.0);

    let config = Config::open(std::env::var("SHIORI_CONFIG").ok())?;
    let svc = ReconcileService::new(SourceRepositoryImpl::from_config(&config)?);

    let series_id = svc.resolve_series_id(mangadex::NAME, &url)?;

    let latest = svc.get_latest_chapter(mangadex::NAME, &series_id).await?;
    println!("latest chapter: {}", latest.as_deref().unwrap_or("none"));

    let next = svc
        .find_next_unread_url(mangadex::NAME, &series_id, progress)
        .await?;
    println!("continue reading: {next}");

    Ok(())
}
