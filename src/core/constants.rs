//! Defaults carried over from the node map page.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Zoom the map opens at before focus or bounds fitting kicks in.
pub const DEFAULT_ZOOM: u8 = 5;

/// Lowest zoom the view may reach; keeps the scroll wheel from running away.
pub const MIN_ZOOM: u8 = 2;

/// Highest zoom at which the clusterer still groups markers.
pub const MAX_CLUSTER_ZOOM: u8 = 17;

/// Highest zoom the headless engine supports.
pub const ENGINE_MAX_ZOOM: u8 = 21;

/// Image prefix handed to the clustering layer.
pub const CLUSTER_IMAGE_PATH: &str = "mapcluster.d/m";

/// Channel tag that marks an observation heard on the voice channel.
pub const VOICE_CHANNEL: &str = "V-CH";

/// Second line of the reference node's popup.
pub const NODE_SUBTITLE: &str = "This Node";

/// Default viewport size in pixels.
pub const VIEWPORT_SIZE: (f64, f64) = (1200.0, 800.0);

/// Padding applied around bounds when fitting the view.
pub const FIT_PADDING: f64 = 20.0;

/// Square tile size the projection is expressed in.
pub const TILE_SIZE: f64 = 256.0;

pub const SECONDS_PER_DAY: i64 = 60 * 60 * 24;
