use crate::error::AcquireError;
use crate::extract::{extract_links, extract_lyric_block};
use crate::fetch::PageSource;
use crate::filter::{dedup_preserving_order, SongFilter};
use crate::output;
use crate::pacer::{NextRequest, Pacer};
use crate::retry::{fetch_with_retry, RetryPolicy};
use crate::strip::strip_tags;
use indicatif::{ProgressBar, ProgressStyle};
use lyrics_model::{AlbumReport, AlbumSource, CollectConfig, RunReport, SongFailure};
use std::path::Path;

/// Collect lyrics for every configured album into the corpus file.
///
/// For each album: wait, fetch the listing page, keep the distinct song links
/// matching the album marker, then for each song wait, fetch, take the first
/// lyric paragraph, strip its tags and append it to `config.output`.
///
/// A failed album or song page is recorded in the report and skipped unless
/// `config.fail_fast` is set. Write errors always abort.
pub async fn collect<S: PageSource>(
    source: &S,
    config: &CollectConfig,
) -> Result<RunReport, AcquireError> {
    let policy = RetryPolicy::from(&config.retry);
    let mut pacer = Pacer::new(config.pacer_delay());
    let mut report = RunReport::new(config.output.display().to_string());

    for album in &config.albums {
        let album_report = collect_album(source, config, &policy, &mut pacer, album).await?;
        report.albums.push(album_report);
    }

    report.finish();
    tracing::info!(
        albums = report.albums.len(),
        found = report.songs_found(),
        written = report.songs_written(),
        failures = report.failure_count(),
        requests = pacer.waits(),
        path = %config.output.display(),
        "Collection finished"
    );
    Ok(report)
}

async fn collect_album<S: PageSource>(
    source: &S,
    config: &CollectConfig,
    policy: &RetryPolicy,
    pacer: &mut Pacer,
    album: &AlbumSource,
) -> Result<AlbumReport, AcquireError> {
    let mut album_report = AlbumReport::new(&album.url, &album.marker);
    let filter = SongFilter::new(&album.marker)?;

    pacer.wait(NextRequest::Album).await;
    tracing::info!(url = %album.url, "Current album");

    let html = match fetch_with_retry(source, policy, &album.url).await {
        Ok(html) => html,
        Err(e) => {
            let err = AcquireError::from(e);
            if config.fail_fast {
                return Err(err);
            }
            tracing::warn!(url = %album.url, error = %err, "Skipping album");
            album_report.error = Some(err.to_string());
            return Ok(album_report);
        }
    };

    let links = extract_links(&html);
    let link_count = links.len();
    let songs = dedup_preserving_order(filter.filter(links));
    tracing::info!(links = link_count, songs = songs.len(), marker = %album.marker, "Found songs");

    let progress = song_progress(config.show_progress, songs.len());
    for song in &songs {
        pacer.wait(NextRequest::Song).await;
        progress.set_message(song.clone());

        match collect_song(source, policy, &config.output, song).await {
            Ok(()) => album_report.written.push(song.clone()),
            Err(e) if e.is_per_item() && !config.fail_fast => {
                tracing::warn!(url = %song, error = %e, "Skipping song");
                album_report.failures.push(SongFailure {
                    url: song.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    album_report.songs = songs;
    Ok(album_report)
}

async fn collect_song<S: PageSource>(
    source: &S,
    policy: &RetryPolicy,
    output_path: &Path,
    url: &str,
) -> Result<(), AcquireError> {
    tracing::info!(url = %url, "Writing lyrics");
    let html = fetch_with_retry(source, policy, url).await?;
    let block = extract_lyric_block(&html, url)?;
    let lyrics = strip_tags(&block);
    output::append_lyrics(output_path, &lyrics)
}

fn song_progress(enabled: bool, total: usize) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid progress template")
            .progress_chars("#>-"),
    );
    pb
}
