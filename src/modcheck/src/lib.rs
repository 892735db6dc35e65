//! # modcheck
//!
//! Minecraft mod metadata extraction and dependency validation.
//!
//! This library provides functionality to:
//! - Detect which of the four loader metadata formats a file carries
//! - Parse Forge/NeoForge TOML-like configs and Fabric/Quilt JSON
//!   manifests, tolerating the malformed input found in real mod folders
//! - Read metadata straight out of jar containers
//! - Check version/loader compatibility for a single mod
//! - Validate a whole mods folder: missing dependencies, cycles,
//!   duplicate ids, explicit incompatibilities
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Parse one mod and inspect its metadata
//! if let Some(record) = modcheck::parse(Path::new("mods/sodium.jar")) {
//!     println!("{:?} requires {:?}", record.mod_id, record.required_dependencies);
//! }
//!
//! // Validate a whole folder
//! let findings = modcheck::validate_folder_path(Path::new("mods"))?;
//! for finding in findings {
//!     println!("{finding}");
//! }
//! # Ok::<(), modcheck::ScanError>(())
//! ```

pub mod archive;
pub mod detect;
pub mod fabric;
pub mod forge;
pub mod record;
pub mod scan;
pub mod validate;
pub mod version;

// Re-export commonly used items
#[doc(inline)]
pub use archive::{ArchiveError, ArchiveSource, JarArchive};
#[doc(inline)]
pub use detect::{detect, Format};
#[doc(inline)]
pub use record::{Loader, ModRecord};
#[doc(inline)]
pub use scan::{
    is_compatible, list_incompatibilities, list_optional, list_required, mods_supporting,
    parse, parse_container, scan_folder, validate_folder_path, ScanError,
};
#[doc(inline)]
pub use validate::{validate_folder, validate_record};
#[doc(inline)]
pub use version::compatible;
