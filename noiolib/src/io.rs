use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;
use crate::config::Geometry;
use crate::error::{Error, Result};
use crate::trace::Trace;

// 4096 is the standard block size (or a multiple of it) on most systems
const BUFFER_SIZE: usize = 16 * 4096;

/// Gets a buffered reader over a whole trace file
pub fn get_reader(file: File) -> Result<Box<dyn BufRead>> {
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)))
    }
    // Memory map the file for speed on unix systems
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        if file.metadata()?.len() == 0 {
            return Ok(Box::new(BufReader::with_capacity(BUFFER_SIZE, file)));
        }
        // SAFETY: the map is only read, a trace being modified underneath us isn't supported
        unsafe {
            let m = Mmap::map(&file)?;
            m.advise(Advice::Sequential)?;
            Ok(Box::new(Cursor::new(m)))
        }
    }
}

/// Reads a geometry file, JSON if the extension is `.json` and the `cache.org` text format
/// otherwise
pub fn load_geometry(path: impl AsRef<Path>) -> Result<Geometry> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let geometry = if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
        Geometry::from_json_str(&text)?
    } else {
        Geometry::from_org_str(&text)?
    };
    debug!(?geometry, path = %path.display(), "Loaded geometry");
    Ok(geometry)
}

/// Reads and validates a trace file against the geometry's address width
pub fn load_trace(path: impl AsRef<Path>, geometry: &Geometry) -> Result<Trace> {
    let address_bits = usize::try_from(geometry.address_bits)
        .map_err(|_| Error::InvalidGeometry(format!("address width {} is too large", geometry.address_bits)))?;
    let trace = Trace::from_reader(get_reader(File::open(path.as_ref())?)?, address_bits)?;
    debug!(references = trace.len(), benchmark = trace.benchmark(), "Loaded trace");
    Ok(trace)
}
