//! Input validation
//!
//! This module turns loosely-typed caller input into checked values.

mod input;

pub use input::{
    parse_date_part, parse_flag, parse_instant, parse_wall_clock, require_field,
};
