//! Domain types for the ticket search.
//!
//! Tickets are validated at construction time, so code that receives them
//! can trust their invariants (positive price, at least one segment). The
//! filter, sort and window types describe the consumer's view selection.

mod error;
mod filter;
mod sort;
mod ticket;
mod window;

pub use error::DomainError;
pub use filter::{InvalidStopFlag, StopFilter, StopFlag};
pub use sort::{InvalidSortMode, SortMode};
pub use ticket::{Carrier, Segment, Ticket};
pub use window::DisplayWindow;
