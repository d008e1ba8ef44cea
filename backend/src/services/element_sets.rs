//! Ingestion of orbital element set listings.
//!
//! Listings use the common three-line layout (name, line 1, line 2). A set
//! whose name line is missing is accepted when its two element lines follow
//! each other directly. Sets failing validation are reported and skipped so
//! they never reach the pass detector.

use crate::error::AdvisorError;
use crate::models::ElementSet;

/// Parsed listing: accepted sets in file order plus one error per rejected set.
#[derive(Debug, Default)]
pub struct ElementSetListing {
    pub accepted: Vec<ElementSet>,
    pub rejected: Vec<AdvisorError>,
}

pub fn parse_element_sets(text: &str) -> ElementSetListing {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();

    let mut listing = ElementSetListing::default();
    let mut i = 0;
    while i < lines.len() {
        let unnamed = lines[i].starts_with("1 ")
            && lines.get(i + 1).is_some_and(|l| l.starts_with("2 "));
        let (name, line1, line2, consumed) = if unnamed {
            ("", lines[i], lines[i + 1], 2)
        } else {
            (
                lines[i],
                lines.get(i + 1).copied().unwrap_or(""),
                lines.get(i + 2).copied().unwrap_or(""),
                3,
            )
        };

        match ElementSet::parse(name, line1, line2) {
            Ok(set) => listing.accepted.push(set),
            Err(e) => {
                log::warn!("Rejected element set: {}", e);
                listing.rejected.push(e);
            }
        }
        i += consumed;
    }

    log::info!(
        "Parsed {} element sets ({} rejected)",
        listing.accepted.len(),
        listing.rejected.len()
    );
    listing
}
