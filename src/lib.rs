#![warn(rust_2018_idioms)]

//! # CFF to CID-keyed CFF conversion
//!
//! `cff_cid` parses Compact Font Format (CFF) font sets, as found embedded in PDF and OpenType
//! files, and rewrites a single font from the set as a standalone CID-keyed CFF.
//!
//! ```no_run
//! use cff_cid::binary::read::ReadScope;
//! use cff_cid::cff::CFF;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("font.cff")?;
//! let cff = ReadScope::new(&data).read::<CFF<'_>>()?;
//! if let Some(cid) = cff.to_cid("MyFont-Regular")? {
//!     std::fs::write("font-cid.cff", cid)?;
//! }
//! # Ok(())
//! # }
//! ```

/// Reading and writing of binary data.
pub mod binary;
pub mod cff;
pub mod error;
pub mod size;
