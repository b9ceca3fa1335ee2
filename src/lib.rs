//! A transport catalogue: ingest stops, interstop road distances and bus
//! routes, then answer per-route statistics, per-stop route listings and
//! fastest multi-leg routes between stops.
//!
//! JSON (de)serialisation, SVG map rendering and the CLI entry point are
//! external collaborators — this crate exposes only the data and query
//! surface they consume ([`Catalogue`] and [`TransportRouter`]).

pub mod geo;

pub mod catalogue;
pub use catalogue::{BusId, BusStatistics, Catalogue, StopId, StopQuery};

pub mod graph;

pub mod oracle;

pub mod transport_router;
pub use transport_router::{Item, Itinerary, RouterSettings, TransportRouter};

pub mod error;
pub use error::RouterSettingsError;
