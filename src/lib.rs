//! pubcharts
//!
//! A small Rust library for turning a publication feed into pixel-exact bar charts. Pairs with
//! the `pubcharts` CLI.
//!
//! ### Features
//! - Load the feed (`{ "items": [...] }`) from a URL or file, tolerating malformed fields
//! - Aggregate: works per year, top cited works, citation histogram (citable vs published)
//! - DPI-aware geometry with style-specific padding and automatic label rotation
//! - Bar and grouped-bar renderers over a small [`surface::Surface`] trait
//!   (in-memory RGB canvas, PNG and SVG via plotters)
//! - Debounced redraw on viewport resize
//! - Site statistics (h-index, collaborators) and CSV/JSON export
//!
//! ### Example
//! ```no_run
//! use pubcharts::viz::{self, ChartKind, RenderOptions};
//!
//! let client = pubcharts::Client::default();
//! let records = pubcharts::api::load_records_or_empty(&client, "data/publications.json");
//! let opts = RenderOptions { container_width: Some(640.0), device_pixel_ratio: 2.0, ..Default::default() };
//! viz::render_to_file("citations.png", ChartKind::CitationHistogram, &records, &opts)?;
//! println!("{:#?}", pubcharts::stats::site_stats(&records));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod api;
pub mod error;
pub mod geometry;
pub mod models;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod surface;
pub mod theme;
pub mod viz;

pub use api::Client;
pub use error::ChartError;
pub use models::{ChartSeries, HistogramBin, PairedSeries, PublicationsDocument, Record, SiteStats};
