//! Annotation primitives for vehicle inspection diagrams.
//!
//! Everything in this crate is pure and synchronous: the UI layer owns the
//! annotation collections and passes them in, receiving new collections back.
//!
//! # Modules
//!
//! - [`model`]: damage points on the body diagram and per-wheel tire readings
//! - [`severity`]: tread-depth classification into severity bands
//! - [`geometry`]: leader-line placement for measurement labels
//!
//! # Example
//!
//! ```
//! use vi_annotate::{
//!     add_damage_point, classify, upsert_tire_measurement, SeverityBand, TirePosition,
//! };
//!
//! let points = add_damage_point(&[], 0.4, 0.5, "Rayón", None);
//! assert_eq!(points[0].sequence, 1);
//!
//! let tires = upsert_tire_measurement(&[], TirePosition::FrontLeft, 3.2).unwrap();
//! assert_eq!(classify(Some(tires[0].value)), SeverityBand::Regular);
//! ```

pub mod error;
pub mod geometry;
pub mod model;
pub mod severity;

pub use error::{Result, ValidationError};
pub use geometry::{leader_line, measurement_leader, DiagramFrame, LabelOffset, LeaderLine};
pub use model::{
    add_damage_point, remove_damage_point, remove_tire_measurement, upsert_tire_measurement,
    DamagePoint, TireMeasurement, TirePosition, MAX_TREAD_DEPTH_MM, MIN_TREAD_DEPTH_MM,
};
pub use severity::{classify, SeverityBand};
