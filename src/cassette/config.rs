//! Locating the cassettes a replaying run is served from.

use std::path::Path;

use super::replayer::CassetteReplayer;
use super::Cassette;

/// File name of the host cassette inside a recording directory.
pub const HOST_CASSETTE: &str = "host.cassette.yaml";
/// File name of the tracker cassette inside a recording directory.
pub const TRACKER_CASSETTE: &str = "tracker.cassette.yaml";

/// One replayer per port.
#[derive(Debug)]
pub struct PortReplayers {
    /// Replayer for the host port.
    pub host: CassetteReplayer,
    /// Replayer for the tracker port.
    pub tracker: CassetteReplayer,
}

/// Loads replayers from a cassette file or a recording directory.
///
/// A file is shared by both ports, each with its own cursor. A directory must
/// hold [`HOST_CASSETTE`] and [`TRACKER_CASSETTE`].
///
/// # Errors
///
/// Returns an error if a cassette is missing, unreadable, or malformed.
pub fn load_replayers(path: &Path) -> Result<PortReplayers, String> {
    if path.is_dir() {
        let host = Cassette::load(&path.join(HOST_CASSETTE))?;
        let tracker = Cassette::load(&path.join(TRACKER_CASSETTE))?;
        Ok(PortReplayers {
            host: CassetteReplayer::new(&host),
            tracker: CassetteReplayer::new(&tracker),
        })
    } else {
        let cassette = Cassette::load(path)?;
        Ok(PortReplayers {
            host: CassetteReplayer::new(&cassette),
            tracker: CassetteReplayer::new(&cassette),
        })
    }
}
