use std::path::Path;

use tracing::debug;

const REMOTE_MARKERS: [&str; 2] = ["http", "ftp"];

/// Tells whether a local path or remote resource exists.
pub trait ExistenceProbe {
    fn exists(&self, location: &str) -> bool;
}

#[must_use]
pub fn is_remote(location: &str) -> bool {
    REMOTE_MARKERS
        .iter()
        .any(|marker| location.starts_with(marker))
}

/// Filesystem probe; remote locations are reported as missing and left to a
/// host probe that can issue requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalPathProbe;

impl ExistenceProbe for LocalPathProbe {
    fn exists(&self, location: &str) -> bool {
        if is_remote(location) {
            debug!(location, "remote location not checked by local probe");
            return false;
        }
        Path::new(location).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_locations_are_not_probed() {
        assert!(is_remote("https://example.org/bounds.geojson"));
        assert!(is_remote("ftp://example.org/bounds.geojson"));
        assert!(!LocalPathProbe.exists("https://example.org/bounds.geojson"));
        assert!(!is_remote("/data/bounds.geojson"));
    }
}
