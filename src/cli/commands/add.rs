//! Barcode commands: add to the library, or resolve only.

use std::sync::Arc;

use futures::StreamExt;
use tokio::runtime::Runtime;

use crate::catalog::MusicBrainzClient;
use crate::config::Config;
use crate::domain::{BarcodeQuery, ResolvedRelease};
use crate::reconcile::{EventKind, ProgressEvent, Reconciler};

/// Reconcile every barcode concurrently, printing events as they arrive.
pub fn cmd_add(
    rt: &Runtime,
    config: &Config,
    barcodes: &[String],
    json: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let reconciler = Arc::new(Reconciler::from_config(config)?);

        // One task per barcode; tag each stream so output stays attributable
        let runs = barcodes.iter().map(|barcode| {
            let tag = barcode.clone();
            reconciler
                .spawn(barcode.clone())
                .map(move |event| (tag.clone(), event))
        });
        let mut events = futures::stream::select_all(runs);

        let mut succeeded = 0usize;
        while let Some((barcode, event)) = events.next().await {
            if json {
                print!("{}", event.to_sse_frame()?);
            } else {
                println!("{}", format_event(&barcode, &event));
            }
            if event.kind == EventKind::Success {
                succeeded += 1;
            }
        }

        let failed = barcodes.len() - succeeded;
        if failed > 0 {
            anyhow::bail!("{} of {} barcode(s) failed", failed, barcodes.len());
        }
        Ok(())
    })
}

/// Resolve a barcode and print the release it belongs to.
pub fn cmd_resolve(rt: &Runtime, config: &Config, barcode: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let client = MusicBrainzClient::new(config.catalog.base_url.clone())?;
        let barcode = BarcodeQuery::parse(barcode)?;
        let release = client.resolve(&barcode).await?;

        print!("{}", format_release(&barcode, &release));
        Ok(())
    })
}

fn format_release(barcode: &BarcodeQuery, release: &ResolvedRelease) -> String {
    format!(
        "✓ Barcode {}\n\n  \
         Title:         {}\n  \
         Artist:        {}\n  \
         Release:       https://musicbrainz.org/release/{}\n  \
         Release group: https://musicbrainz.org/release-group/{}\n  \
         Artist page:   https://musicbrainz.org/artist/{}\n",
        barcode,
        release.title,
        release.artist_name,
        release.release_id,
        release.release_group_id,
        release.artist_external_id
    )
}

fn format_event(barcode: &str, event: &ProgressEvent) -> String {
    let marker = match event.kind {
        EventKind::Progress => " ",
        EventKind::Success => "✓",
        EventKind::Error => "✗",
    };
    format!("[{}] {} {:>3}% {}", barcode, marker, event.progress, event.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_event() {
        let event = ProgressEvent {
            status: "Found release 'Example Album' by Example Band".to_string(),
            progress: 15,
            kind: EventKind::Progress,
        };
        assert_eq!(
            format_event("602537350413", &event),
            "[602537350413]    15% Found release 'Example Album' by Example Band"
        );

        let done = ProgressEvent {
            status: "done".to_string(),
            progress: 100,
            kind: EventKind::Success,
        };
        assert_eq!(format_event("1", &done), "[1] ✓ 100% done");
    }

    #[test]
    fn test_format_release_labels_are_distinct() {
        let barcode = BarcodeQuery::parse("602537350413").unwrap();
        let release = ResolvedRelease {
            release_id: "r-123".to_string(),
            release_group_id: "g-456".to_string(),
            title: "Example Album".to_string(),
            artist_name: "Example Band".to_string(),
            artist_external_id: "a-789".to_string(),
        };

        let text = format_release(&barcode, &release);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "✓ Barcode 602537350413");
        assert_eq!(lines[3], "  Artist:        Example Band");
        assert_eq!(lines[6], "  Artist page:   https://musicbrainz.org/artist/a-789");
        let labels: Vec<&str> = lines[2..]
            .iter()
            .filter_map(|l| l.trim().split(':').next())
            .collect();
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(labels.len(), unique.len());
    }
}
