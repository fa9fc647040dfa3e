//! Data models for AMiner records, index entries and query results.
//!
//! Stored models use short field tags (`af`, `pc`, `hi`, ...) matching the
//! AMiner record tags so stored entries stay compact and self-describing.

mod author;
mod coauthor;
mod enums;
mod inputs;
mod results;

pub use author::{AuthorProfile, INTEREST_DELIMITER};
pub use coauthor::{Adjacency, AuthorId, CoauthorEdge, SubjectEntry};
pub use enums::ResponseFormat;
pub use inputs::{AuthorDetailInput, SubjectSearchInput};
pub use results::{AuthorDetail, RankedAuthor, RankedCoauthor, SubjectHit};
