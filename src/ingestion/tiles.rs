//! Tile discovery and concurrent loading
//!
//! Candidate files are decoded on a bounded worker pool, one task per file. Results
//! are drained in completion order, so tile ids follow whichever decode finished first
//! unless deterministic ordering is requested. A failed decode or an orientation
//! mismatch only drops that file; it never aborts the batch.

use crate::io::configuration::RESERVED_SUMMARY_MARKER;
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::progress::ProgressManager;
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Normalised tile dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    width: u32,
    height: u32,
}

impl TileSize {
    /// Create a tile size, rejecting zero dimensions
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 {
            return Err(invalid_parameter("tile width", &width, &"must be positive"));
        }
        if height == 0 {
            return Err(invalid_parameter(
                "tile height",
                &height,
                &"must be positive",
            ));
        }
        Ok(Self { width, height })
    }

    /// Tile size from a width:height ratio scaled by an integer multiplier
    ///
    /// # Errors
    ///
    /// Returns an error if any factor is zero or the product overflows
    pub fn from_ratio(ratio_width: u32, ratio_height: u32, multiplier: u32) -> Result<Self> {
        if multiplier == 0 {
            return Err(invalid_parameter(
                "tile multiplier",
                &multiplier,
                &"must be positive",
            ));
        }
        let width = ratio_width.checked_mul(multiplier).ok_or_else(|| {
            invalid_parameter("ratio width", &ratio_width, &"tile width overflows")
        })?;
        let height = ratio_height.checked_mul(multiplier).ok_or_else(|| {
            invalid_parameter("ratio height", &ratio_height, &"tile height overflows")
        })?;
        Self::new(width, height)
    }

    /// Tile width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Tile height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Rule excluding tiles whose aspect contradicts the configured tile orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationFilter {
    /// Tiles are taller than wide; landscape images are dropped
    PortraitRequired,
    /// Tiles are not taller than wide; portrait images are dropped
    NonPortraitRequired,
}

impl OrientationFilter {
    /// Derive the filter from a tile ratio: portrait iff the ratio is taller than wide
    pub const fn from_ratio(ratio_width: u32, ratio_height: u32) -> Self {
        if ratio_height > ratio_width {
            Self::PortraitRequired
        } else {
            Self::NonPortraitRequired
        }
    }

    /// Whether an image of the given dimensions passes the filter
    ///
    /// Square images pass either way.
    pub const fn admits(self, width: u32, height: u32) -> bool {
        match self {
            Self::PortraitRequired => width <= height,
            Self::NonPortraitRequired => height <= width,
        }
    }
}

/// A normalised candidate image usable as one mosaic cell
#[derive(Debug, Clone)]
pub struct Tile {
    id: usize,
    image: RgbImage,
    source: PathBuf,
    rotated: bool,
}

impl Tile {
    /// Create a tile from an already normalised bitmap
    pub const fn new(id: usize, image: RgbImage, source: PathBuf, rotated: bool) -> Self {
        Self {
            id,
            image,
            source,
            rotated,
        }
    }

    pub(crate) const fn renumbered(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    /// Stable id, equal to the tile's position in its collection
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Normalised bitmap
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// File the tile was decoded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Whether this is the 180° rotated variant of its source
    pub const fn is_rotated(&self) -> bool {
        self.rotated
    }
}

/// Directory pattern naming the candidate tile files
///
/// Either a plain directory (every regular file in it) or a directory followed by a
/// file-name pattern in which `*` matches any run of characters, e.g. `tiles/*.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    directory: PathBuf,
    file_pattern: Option<String>,
}

impl TileSource {
    /// Split a pattern into its directory and optional file-name wildcard
    pub fn parse(pattern: &str) -> Self {
        let path = Path::new(pattern);
        let wildcard = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .filter(|name| name.contains('*'));

        match wildcard {
            Some(file_pattern) => {
                let directory = path
                    .parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
                Self {
                    directory,
                    file_pattern: Some(file_pattern),
                }
            }
            None => Self {
                directory: path.to_path_buf(),
                file_pattern: None,
            },
        }
    }

    /// Directory that is scanned
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Whether a file name is a candidate tile
    ///
    /// Names carrying the reserved summary marker never match.
    pub fn matches(&self, file_name: &str) -> bool {
        if file_name.contains(RESERVED_SUMMARY_MARKER) {
            return false;
        }
        self.file_pattern
            .as_deref()
            .is_none_or(|pattern| wildcard_match(pattern, file_name))
    }

    /// List matching regular files, sorted by path
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let read_error = |source| MosaicError::FileSystem {
            path: self.directory.clone(),
            operation: "read tile directory",
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.directory).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if !path.is_file() {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if self.matches(&name) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl std::fmt::Display for TileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file_pattern {
            Some(pattern) => write!(f, "{}", self.directory.join(pattern).display()),
            None => write!(f, "{}", self.directory.display()),
        }
    }
}

fn wildcard_match(pattern: &str, name: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let remaining: Vec<&str> = parts.collect();
    let Some((last, middle)) = remaining.split_last() else {
        // No wildcard at all: exact match
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(position) => rest = rest.get(position + part.len()..).unwrap_or_default(),
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

/// Per-file result of a loading task
#[derive(Debug)]
pub enum TileOutcome {
    /// Decoded and normalised; one bitmap, or two when mirroring is enabled
    Accepted(Vec<RgbImage>),
    /// Orientation contradicts the configured tiles; silently dropped
    Filtered {
        /// Width after resizing
        width: u32,
        /// Height after resizing
        height: u32,
    },
    /// Decoding failed; the file produces no tile
    Failed(MosaicError),
}

/// Decode, filter and normalise a single candidate file
///
/// The orientation check is made on the resized bitmap, so a source of either
/// aspect passes whenever the configured tile shape agrees with the filter.
pub fn load_tile(
    path: &Path,
    size: TileSize,
    filter: OrientationFilter,
    mirror: bool,
) -> TileOutcome {
    let decoded = match image::open(path) {
        Ok(decoded) => decoded.to_rgb8(),
        Err(source) => {
            return TileOutcome::Failed(MosaicError::TileDecode {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let resized = imageops::resize(&decoded, size.width(), size.height(), FilterType::CatmullRom);
    if !filter.admits(resized.width(), resized.height()) {
        return TileOutcome::Filtered {
            width: resized.width(),
            height: resized.height(),
        };
    }

    let mut variants = Vec::with_capacity(if mirror { 2 } else { 1 });
    if mirror {
        let rotated = imageops::rotate180(&resized);
        variants.push(resized);
        variants.push(rotated);
    } else {
        variants.push(resized);
    }
    TileOutcome::Accepted(variants)
}

/// Loads candidate tile files on a bounded worker pool
#[derive(Debug, Clone)]
pub struct TileIngestor {
    tile_size: TileSize,
    filter: OrientationFilter,
    mirror: bool,
    workers: usize,
    deterministic: bool,
}

impl TileIngestor {
    /// Create an ingestor with one worker per available core
    pub fn new(tile_size: TileSize, filter: OrientationFilter) -> Self {
        let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self {
            tile_size,
            filter,
            mirror: false,
            workers,
            deterministic: false,
        }
    }

    /// Also emit a 180° rotated variant of every accepted tile
    pub const fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Bound the worker pool to `workers` threads (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Assign tile ids by source path instead of completion order
    pub const fn with_deterministic_order(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Number of worker threads used for loading
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Discover and load every tile named by `source`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tile directory cannot be read
    /// - The worker pool cannot be created
    /// - No tile survives decoding and orientation filtering
    pub fn ingest_source(
        &self,
        source: &TileSource,
        progress: Option<&ProgressManager>,
    ) -> Result<Vec<Tile>> {
        let paths = source.discover()?;
        log::info!(
            "Discovered {} candidate tile files in {source}",
            paths.len()
        );

        let tiles = self.ingest(&paths, progress)?;
        if tiles.is_empty() {
            return Err(MosaicError::EmptyTileSet {
                source_pattern: source.to_string(),
                discovered: paths.len(),
            });
        }
        Ok(tiles)
    }

    /// Load `paths` concurrently, collecting tiles in completion order
    ///
    /// Blocks until every submitted task has reported. Per-file failures are logged
    /// and skipped, so the result may be empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be created
    pub fn ingest(
        &self,
        paths: &[PathBuf],
        progress: Option<&ProgressManager>,
    ) -> Result<Vec<Tile>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|index| format!("tile-loader-{index}"))
            .build()
            .map_err(|e| MosaicError::WorkerPool {
                reason: e.to_string(),
            })?;

        if let Some(pm) = progress {
            pm.start_ingestion(paths.len());
        }

        let (sender, receiver) = mpsc::channel();
        for path in paths {
            let sender = sender.clone();
            let path = path.clone();
            let (size, filter, mirror) = (self.tile_size, self.filter, self.mirror);
            pool.spawn(move || {
                let outcome = load_tile(&path, size, filter, mirror);
                // The receiver outlives every task
                let _ = sender.send((path, outcome));
            });
        }
        drop(sender);

        let mut completed = Vec::with_capacity(paths.len());
        for (path, outcome) in receiver {
            if let Some(pm) = progress {
                pm.file_loaded();
            }
            match outcome {
                TileOutcome::Accepted(variants) => completed.push((path, variants)),
                TileOutcome::Filtered { width, height } => {
                    log::debug!(
                        "Skipping {} ({width}x{height} contradicts {:?})",
                        path.display(),
                        self.filter
                    );
                }
                TileOutcome::Failed(error) => log::warn!("{error}"),
            }
        }

        if let Some(pm) = progress {
            pm.finish_ingestion();
        }

        if self.deterministic {
            completed.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let mut tiles = Vec::new();
        for (path, variants) in completed {
            for (variant, image) in variants.into_iter().enumerate() {
                tiles.push(Tile::new(tiles.len(), image, path.clone(), variant > 0));
            }
        }
        log::info!("Loaded {} tiles from {} files", tiles.len(), paths.len());
        Ok(tiles)
    }
}
