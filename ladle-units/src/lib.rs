//! Ladle Units - Kitchen Measurement Units and Conversion
//!
//! A fixed, ordered table of kitchen units and pure conversion functions
//! over it. Every unit has a measurement system (metric, imperial, neutral)
//! and a kind (volume, mass, count); conversions go through the base unit
//! of the kind:
//! - Mass: g, kg, oz, lb (base g)
//! - Volume: ml, L, tsp, tbsp, floz, cup, pint, quart, gallon (base ml)
//! - Count: piece, pinch, clove, slice, bunch, can (base piece)
//!
//! The table is read-only for the life of the process, so every function
//! here is safe to call from any thread.

mod kind;
mod unit;
mod units;
mod quantity;
mod convert;

pub use kind::{MeasurementSystem, UnitKind, ParseKindError};
pub use unit::{Unit, UnitError};
pub use units::{UNITS, get_unit, units, units_where, unit_names};
pub use quantity::{Quantity, format_amount};
pub use convert::{to_base, from_base, convert, convert_amount_to_system, select_nicest};
